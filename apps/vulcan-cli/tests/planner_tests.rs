//! Planner behaviour against an in-memory remote.

use vulcan_cli::api::Remote;
use vulcan_cli::error::CliError;
use vulcan_cli::plan::{plan, plan_prune, Operation, Stage};
use vulcan_cli::snapshot::{read_team, write_team, Asset, Group, Member, Program, Role, TeamInfo};
use vulcan_core::{AssetId, AssetType, MemberId, Rolfp};

mod common;
use common::{test_resolver, FakeRemote};

fn seeded_remote() -> FakeRemote {
    let remote = FakeRemote::new("security");
    remote.add_member("alice@example.com", Role::Owner);
    remote.add_member("bob@example.com", Role::Member);
    let web = remote.add_group("web");
    let ip = remote.add_asset("10.0.0.1", AssetType::Ip);
    remote.add_asset("www.example.com", AssetType::Hostname);
    remote.associate(web, ip);
    remote.add_program("nightly", "0 2 * * *");
    remote
}

fn ops_in(plan: &vulcan_cli::plan::Plan, stage: Stage) -> Vec<Operation> {
    plan.stages.get(&stage).cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_pulled_snapshot_plans_nothing() {
    let remote = seeded_remote();
    let snapshot = remote.snapshot().await;

    let plan = plan(&snapshot, &snapshot, &test_resolver()).await.unwrap();

    assert!(plan.is_empty(), "unexpected operations: {:?}", plan.stages);
    assert!(plan.warnings.is_empty());
}

#[tokio::test]
async fn test_stored_snapshot_with_padded_values_plans_nothing() {
    let remote = seeded_remote();
    let gateway = remote.add_asset("10.0.0.9", AssetType::Ip);
    remote
        .update_team_info(
            remote.team_id,
            &TeamInfo {
                description: "Platform security ".to_string(),
                tag: " prod".to_string(),
            },
        )
        .await
        .unwrap();
    remote
        .update_asset(remote.team_id, gateway, Rolfp::Empty, " gateway")
        .await
        .unwrap();
    let actual = remote.snapshot().await;

    let dir = tempfile::tempdir().unwrap();
    write_team(dir.path(), &actual).unwrap();
    let local = read_team(dir.path()).unwrap();
    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(plan.is_empty(), "unexpected operations: {:?}", plan.stages);
}

#[tokio::test]
async fn test_members_are_created_updated_and_deleted() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.members.retain(|m| m.email != "bob@example.com");
    local.members[0].role = Role::Member;
    local.members.push(Member {
        id: None,
        email: "carol@example.com".to_string(),
        role: Role::Owner,
    });

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::CreateMembers).as_slice(),
        [Operation::CreateMember { email, role: Role::Owner }] if email == "carol@example.com"
    ));
    assert!(matches!(
        ops_in(&plan, Stage::DeleteMembers).as_slice(),
        [Operation::DeleteMember { email, .. }] if email == "bob@example.com"
    ));
    assert!(matches!(
        ops_in(&plan, Stage::UpdateMembers).as_slice(),
        [Operation::UpdateMember { email, role: Role::Member, .. }] if email == "alice@example.com"
    ));
}

#[tokio::test]
async fn test_member_id_mismatch_is_identity_conflict() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.members[0].id = Some(MemberId::new());

    let err = plan(&local, &actual, &test_resolver()).await.unwrap_err();

    assert!(matches!(err, CliError::IdentityConflict(_)));
}

#[tokio::test]
async fn test_new_group_is_created_before_association() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    let mut api = Group::new("api");
    api.assets.push(Asset::new("10.0.0.9", Some(AssetType::Ip)));
    local.groups.push(api);

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    let stages: Vec<Stage> = plan.operations().map(Operation::stage).collect();
    assert_eq!(
        stages,
        vec![Stage::CreateGroups, Stage::CreateAssets, Stage::AssociateAssets]
    );
}

#[tokio::test]
async fn test_default_group_is_never_touched() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    // Emptying Default locally must not deassociate anything.
    for group in &mut local.groups {
        if group.name == "Default" {
            group.assets.clear();
        }
    }

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();
    assert!(plan.is_empty());

    // Nor is a missing Default ever created.
    let mut without_default = actual.clone();
    without_default.groups.retain(|g| g.name != "Default");
    let plan = vulcan_cli::plan::plan(&actual, &without_default, &test_resolver())
        .await
        .unwrap();
    assert!(ops_in(&plan, Stage::CreateGroups).is_empty());
}

#[tokio::test]
async fn test_removed_group_member_is_deassociated() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    for group in &mut local.groups {
        if group.name == "web" {
            group.assets.clear();
        }
    }

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::DeassociateAssets).as_slice(),
        [Operation::DeassociateAsset { target, group_name, .. }]
            if target == "10.0.0.1" && group_name == "web"
    ));
    assert_eq!(plan.len(), 1);
}

#[tokio::test]
async fn test_untyped_asset_expands_to_every_candidate() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.assets.push(Asset::new("example.com", None));

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    let created: Vec<AssetType> = ops_in(&plan, Stage::CreateAssets)
        .into_iter()
        .filter_map(|op| match op {
            Operation::CreateAsset { key, .. } => Some(key.asset_type),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec![AssetType::Hostname, AssetType::DomainName]);
}

#[tokio::test]
async fn test_untyped_asset_binds_to_existing_remote_asset() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.assets.push(Asset::new("10.0.0.1", None));

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(plan.is_empty());
}

#[tokio::test]
async fn test_unresolvable_and_invalid_assets_are_skipped_with_warning() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.assets.push(Asset::new("not a target", None));
    local.assets.push(Asset::new("999.1.1.1", Some(AssetType::Ip)));

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.warnings.len(), 2);
}

#[tokio::test]
async fn test_account_alias_is_looked_up_on_create() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    let arn = "arn:aws:iam::123456789012:root";
    local.assets.push(Asset::new(arn, Some(AssetType::AwsAccount)));

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::CreateAssets).as_slice(),
        [Operation::CreateAsset { alias, .. }] if *alias == format!("account-{arn}")
    ));
}

#[tokio::test]
async fn test_changed_rolfp_updates_asset() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    let rolfp: Rolfp = "R:1/O:1/L:0/F:0/P:0+S:2".parse().unwrap();
    local.assets[0].rolfp = rolfp;

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::UpdateAssets).as_slice(),
        [Operation::UpdateAsset { rolfp: r, .. }] if *r == rolfp
    ));
}

#[tokio::test]
async fn test_unknown_asset_id_aborts() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.assets.push(Asset {
        id: Some(AssetId::new()),
        ..Asset::new("10.0.0.7", Some(AssetType::Ip))
    });

    let err = plan(&local, &actual, &test_resolver()).await.unwrap_err();

    assert!(matches!(err, CliError::Validation(_)));
}

#[tokio::test]
async fn test_target_change_aborts() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.assets[0].target = "10.0.0.2".to_string();

    let err = plan(&local, &actual, &test_resolver()).await.unwrap_err();

    assert!(matches!(err, CliError::Validation(_)));
}

#[tokio::test]
async fn test_programs() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.programs[0].cron = "0 3 * * *".to_string();
    local.programs.push(Program {
        id: None,
        name: "weekly".to_string(),
        cron: "0 0 * * 0".to_string(),
        disabled: false,
    });

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::UpdatePrograms).as_slice(),
        [Operation::UpdateProgram { cron, .. }] if cron == "0 3 * * *"
    ));
    assert_eq!(plan.warnings.len(), 1);
    assert!(plan.warnings[0].contains("program creation is not supported"));
}

#[tokio::test]
async fn test_team_info_and_recipients() {
    let remote = seeded_remote();
    let actual = remote.snapshot().await;
    let mut local = actual.clone();
    local.info.description = "Platform security".to_string();
    local.recipients.insert("sec@example.com".to_string());

    let plan = plan(&local, &actual, &test_resolver()).await.unwrap();

    assert_eq!(ops_in(&plan, Stage::TeamInfo).len(), 1);
    assert_eq!(ops_in(&plan, Stage::Recipients).len(), 1);
}

#[tokio::test]
async fn test_prune_deletes_only_orphans() {
    let remote = seeded_remote();
    remote.add_orphan("10.0.0.99", AssetType::Ip);
    let actual = remote.snapshot().await;

    let plan = plan_prune(&actual).unwrap();

    assert!(matches!(
        ops_in(&plan, Stage::DeleteAssets).as_slice(),
        [Operation::DeleteAsset { target, .. }] if target == "10.0.0.99"
    ));
    assert_eq!(plan.len(), 1);
}
