//! Plan execution against an in-memory remote.

use vulcan_cli::error::CliError;
use vulcan_cli::plan::{execute, plan, plan_prune};
use vulcan_cli::snapshot::{Asset, Group, Member, Role};
use vulcan_core::AssetType;

mod common;
use common::{test_resolver, FakeRemote};

fn remote_with_web_group() -> FakeRemote {
    let remote = FakeRemote::new("security");
    remote.add_member("alice@example.com", Role::Owner);
    let web = remote.add_group("web");
    let ip = remote.add_asset("10.0.0.1", AssetType::Ip);
    remote.associate(web, ip);
    remote
}

#[tokio::test]
async fn test_push_converges_and_replanning_is_empty() {
    let remote = remote_with_web_group();
    let mut local = remote.snapshot().await;
    local.info.tag = "prod".to_string();
    local.members.push(Member {
        id: None,
        email: "bob@example.com".to_string(),
        role: Role::Member,
    });
    let mut api = Group::new("api");
    api.assets.push(Asset::new("example.com", None));
    api.assets.push(Asset::new("10.0.0.1", Some(AssetType::Ip)));
    local.groups.push(api);

    let actual = remote.snapshot().await;
    let first = plan(&local, &actual, &test_resolver()).await.unwrap();
    let report = execute(&first, &remote).await;
    assert!(report.is_success(), "{:?}", report.failed);
    assert_eq!(report.applied.len(), first.len());

    // The same local snapshot now matches the remote state.
    let converged = remote.snapshot().await;
    let second = plan(&local, &converged, &test_resolver()).await.unwrap();
    assert!(second.is_empty(), "unexpected operations: {:?}", second.stages);

    // And so does the re-pulled snapshot.
    let third = plan(&converged, &converged, &test_resolver()).await.unwrap();
    assert!(third.is_empty());

    let api = converged.find_group_by_name("api").unwrap();
    assert_eq!(api.assets.len(), 3);
    assert_eq!(converged.info.tag, "prod");
}

#[tokio::test]
async fn test_pending_group_and_assets_are_bound_during_execution() {
    let remote = remote_with_web_group();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    let mut api = Group::new("api");
    api.assets.push(Asset::new("10.0.0.5", Some(AssetType::Ip)));
    local.groups.push(api);

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();
    let report = execute(&plan, &remote).await;

    assert!(report.is_success());
    let calls = remote.calls();
    assert!(calls[0].starts_with("create_group api"));
    assert!(calls[1].starts_with("create_asset 10.0.0.5"));
    assert!(calls[2].starts_with("associate_asset"));
}

#[tokio::test]
async fn test_first_failure_aborts_without_rollback() {
    let remote = remote_with_web_group();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.info.description = "changed".to_string();
    let mut api = Group::new("api");
    api.assets.push(Asset::new("10.0.0.5", Some(AssetType::Ip)));
    local.groups.push(api);
    remote.fail_on("create_group");

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();
    let report = execute(&plan, &remote).await;

    assert_eq!(report.applied.len(), 1);
    let failed = report.failed.as_ref().unwrap();
    assert!(failed.operation.contains("group 'api'"));
    // The team info update stays applied; nothing after the failure ran.
    assert_eq!(remote.calls().len(), 1);
    assert_eq!(remote.asset_count(), 1);

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, CliError::ApplyFailed { applied: 1, .. }));
}

#[tokio::test]
async fn test_prune_removes_orphans() {
    let remote = remote_with_web_group();
    remote.add_orphan("10.0.0.99", AssetType::Ip);

    let plan = plan_prune(&remote.snapshot().await).unwrap();
    let report = execute(&plan, &remote).await;

    assert!(report.is_success());
    assert_eq!(remote.asset_count(), 1);
    assert!(plan_prune(&remote.snapshot().await).unwrap().is_empty());
}
