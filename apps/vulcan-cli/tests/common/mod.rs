//! Integration test helpers for vulcan-cli.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, Once};
use vulcan_cli::api::{GroupSummary, Remote, TeamSummary};
use vulcan_cli::error::{CliError, CliResult};
use vulcan_cli::snapshot::{
    fetch_team, Asset, AssetKey, Member, Policy, Program, Role, Team, TeamInfo,
};
use vulcan_core::{
    AccountNameLookup, AssetId, AssetResolver, AssetType, GroupId, MemberId, NameResolver,
    ProgramId, Rolfp, TeamId, VulcanError,
};

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

#[derive(Default)]
struct FakeState {
    recipients: BTreeSet<String>,
    info: TeamInfo,
    members: Vec<Member>,
    groups: Vec<(GroupSummary, Vec<AssetId>)>,
    assets: Vec<Asset>,
    policies: Vec<Policy>,
    programs: Vec<Program>,
    calls: Vec<String>,
    fail_on: Option<String>,
}

/// In-memory remote holding a single team.
pub struct FakeRemote {
    pub team_id: TeamId,
    pub name: String,
    state: Mutex<FakeState>,
}

impl FakeRemote {
    /// A remote team that already owns the `Default` group.
    pub fn new(name: &str) -> Self {
        let remote = Self {
            team_id: TeamId::new(),
            name: name.to_string(),
            state: Mutex::new(FakeState::default()),
        };
        remote.add_group("Default");
        remote
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Make the named call (e.g. "create_group") fail with a 500.
    pub fn fail_on(&self, call: &str) {
        self.state().fail_on = Some(call.to_string());
    }

    /// Mutating calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn add_member(&self, email: &str, role: Role) -> MemberId {
        let id = MemberId::new();
        self.state().members.push(Member {
            id: Some(id),
            email: email.to_string(),
            role,
        });
        id
    }

    pub fn add_group(&self, name: &str) -> GroupId {
        let id = GroupId::new();
        self.state().groups.push((
            GroupSummary {
                id,
                name: name.to_string(),
            },
            Vec::new(),
        ));
        id
    }

    /// Add an asset to the inventory and the Default group.
    pub fn add_asset(&self, target: &str, asset_type: AssetType) -> AssetId {
        let id = AssetId::new();
        let mut state = self.state();
        state.assets.push(Asset {
            id: Some(id),
            ..Asset::new(target, Some(asset_type))
        });
        if let Some((_, members)) = state.groups.iter_mut().find(|(g, _)| g.name == "Default") {
            members.push(id);
        }
        id
    }

    /// Add an asset that belongs to no group.
    pub fn add_orphan(&self, target: &str, asset_type: AssetType) -> AssetId {
        let id = AssetId::new();
        self.state().assets.push(Asset {
            id: Some(id),
            ..Asset::new(target, Some(asset_type))
        });
        id
    }

    pub fn associate(&self, group_id: GroupId, asset_id: AssetId) {
        let mut state = self.state();
        if let Some((_, members)) = state.groups.iter_mut().find(|(g, _)| g.id == group_id) {
            members.push(asset_id);
        }
    }

    pub fn add_program(&self, name: &str, cron: &str) -> ProgramId {
        let id = ProgramId::new();
        self.state().programs.push(Program {
            id: Some(id),
            name: name.to_string(),
            cron: cron.to_string(),
            disabled: false,
        });
        id
    }

    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            id: self.team_id,
            name: self.name.clone(),
            info: self.state().info.clone(),
        }
    }

    /// Current remote snapshot.
    pub async fn snapshot(&self) -> Team {
        fetch_team(self, &self.summary()).await.unwrap()
    }

    pub fn asset_count(&self) -> usize {
        self.state().assets.len()
    }

    fn record(&self, call: &str, detail: String) -> CliResult<()> {
        let mut state = self.state();
        if state.fail_on.as_deref() == Some(call) {
            return Err(CliError::Api {
                status: 500,
                message: format!("{call} failed"),
            });
        }
        state.calls.push(format!("{call} {detail}"));
        Ok(())
    }

    fn check_team(&self, team_id: TeamId) -> CliResult<()> {
        if team_id == self.team_id {
            Ok(())
        } else {
            Err(CliError::Api {
                status: 404,
                message: "team not found".to_string(),
            })
        }
    }
}

#[async_trait]
impl Remote for FakeRemote {
    async fn list_teams(&self) -> CliResult<Vec<TeamSummary>> {
        Ok(vec![self.summary()])
    }

    async fn get_team(&self, team_id: TeamId) -> CliResult<TeamSummary> {
        self.check_team(team_id)?;
        Ok(self.summary())
    }

    async fn update_team_info(&self, team_id: TeamId, info: &TeamInfo) -> CliResult<()> {
        self.check_team(team_id)?;
        self.record("update_team_info", info.description.clone())?;
        self.state().info = info.clone();
        Ok(())
    }

    async fn list_recipients(&self, _team_id: TeamId) -> CliResult<BTreeSet<String>> {
        Ok(self.state().recipients.clone())
    }

    async fn update_recipients(&self, _team_id: TeamId, emails: &BTreeSet<String>) -> CliResult<()> {
        self.record("update_recipients", emails.len().to_string())?;
        self.state().recipients = emails.clone();
        Ok(())
    }

    async fn list_members(&self, _team_id: TeamId) -> CliResult<Vec<Member>> {
        Ok(self.state().members.clone())
    }

    async fn create_member(&self, _team_id: TeamId, email: &str, role: Role) -> CliResult<MemberId> {
        self.record("create_member", email.to_string())?;
        let id = MemberId::new();
        self.state().members.push(Member {
            id: Some(id),
            email: email.to_string(),
            role,
        });
        Ok(id)
    }

    async fn update_member(&self, _team_id: TeamId, member_id: MemberId, role: Role) -> CliResult<()> {
        self.record("update_member", member_id.to_string())?;
        let mut state = self.state();
        let member = state
            .members
            .iter_mut()
            .find(|m| m.id == Some(member_id))
            .ok_or_else(|| CliError::NotFound("member".to_string()))?;
        member.role = role;
        Ok(())
    }

    async fn delete_member(&self, _team_id: TeamId, member_id: MemberId) -> CliResult<()> {
        self.record("delete_member", member_id.to_string())?;
        self.state().members.retain(|m| m.id != Some(member_id));
        Ok(())
    }

    async fn list_groups(&self, _team_id: TeamId) -> CliResult<Vec<GroupSummary>> {
        Ok(self.state().groups.iter().map(|(g, _)| g.clone()).collect())
    }

    async fn create_group(&self, _team_id: TeamId, name: &str) -> CliResult<GroupId> {
        self.record("create_group", name.to_string())?;
        Ok(self.add_group(name))
    }

    async fn list_group_assets(&self, _team_id: TeamId, group_id: GroupId) -> CliResult<Vec<Asset>> {
        let state = self.state();
        let (_, members) = state
            .groups
            .iter()
            .find(|(g, _)| g.id == group_id)
            .ok_or_else(|| CliError::NotFound("group".to_string()))?;
        Ok(state
            .assets
            .iter()
            .filter(|a| a.id.is_some_and(|id| members.contains(&id)))
            .cloned()
            .collect())
    }

    async fn associate_asset(&self, _team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()> {
        self.record("associate_asset", asset_id.to_string())?;
        let mut state = self.state();
        if !state.assets.iter().any(|a| a.id == Some(asset_id)) {
            return Err(CliError::NotFound("asset".to_string()));
        }
        let (_, members) = state
            .groups
            .iter_mut()
            .find(|(g, _)| g.id == group_id)
            .ok_or_else(|| CliError::NotFound("group".to_string()))?;
        if !members.contains(&asset_id) {
            members.push(asset_id);
        }
        Ok(())
    }

    async fn deassociate_asset(&self, _team_id: TeamId, group_id: GroupId, asset_id: AssetId) -> CliResult<()> {
        self.record("deassociate_asset", asset_id.to_string())?;
        let mut state = self.state();
        if let Some((_, members)) = state.groups.iter_mut().find(|(g, _)| g.id == group_id) {
            members.retain(|id| *id != asset_id);
        }
        Ok(())
    }

    async fn list_assets(&self, _team_id: TeamId) -> CliResult<Vec<Asset>> {
        Ok(self.state().assets.clone())
    }

    async fn create_asset(&self, _team_id: TeamId, key: &AssetKey, rolfp: Rolfp, alias: &str) -> CliResult<AssetId> {
        self.record("create_asset", key.to_string())?;
        let id = AssetId::new();
        let mut state = self.state();
        state.assets.push(Asset {
            id: Some(id),
            target: key.target.clone(),
            asset_type: Some(key.asset_type),
            rolfp,
            alias: alias.to_string(),
        });
        if let Some((_, members)) = state.groups.iter_mut().find(|(g, _)| g.name == "Default") {
            members.push(id);
        }
        Ok(id)
    }

    async fn update_asset(&self, _team_id: TeamId, asset_id: AssetId, rolfp: Rolfp, alias: &str) -> CliResult<()> {
        self.record("update_asset", asset_id.to_string())?;
        let mut state = self.state();
        let asset = state
            .assets
            .iter_mut()
            .find(|a| a.id == Some(asset_id))
            .ok_or_else(|| CliError::NotFound("asset".to_string()))?;
        asset.rolfp = rolfp;
        asset.alias = alias.to_string();
        Ok(())
    }

    async fn delete_asset(&self, _team_id: TeamId, asset_id: AssetId) -> CliResult<()> {
        self.record("delete_asset", asset_id.to_string())?;
        let mut state = self.state();
        state.assets.retain(|a| a.id != Some(asset_id));
        for (_, members) in state.groups.iter_mut() {
            members.retain(|id| *id != asset_id);
        }
        Ok(())
    }

    async fn list_policies(&self, _team_id: TeamId) -> CliResult<Vec<Policy>> {
        Ok(self.state().policies.clone())
    }

    async fn list_programs(&self, _team_id: TeamId) -> CliResult<Vec<Program>> {
        Ok(self.state().programs.clone())
    }

    async fn update_program(&self, _team_id: TeamId, program_id: ProgramId, cron: &str) -> CliResult<()> {
        self.record("update_program", cron.to_string())?;
        let mut state = self.state();
        let program = state
            .programs
            .iter_mut()
            .find(|p| p.id == Some(program_id))
            .ok_or_else(|| CliError::NotFound("program".to_string()))?;
        program.cron = cron.to_string();
        Ok(())
    }
}

/// Deterministic DNS: only the listed names resolve or are zone apexes.
#[derive(Default)]
pub struct StubNames {
    pub resolvable: HashSet<String>,
    pub apexes: HashSet<String>,
}

#[async_trait]
impl NameResolver for StubNames {
    async fn resolves(&self, hostname: &str) -> bool {
        self.resolvable.contains(hostname)
    }

    async fn is_zone_apex(&self, name: &str) -> bool {
        self.apexes.contains(name)
    }
}

/// Account lookup that names every account `account-<identifier>`, or
/// always fails.
pub struct StubAccounts {
    pub fail: bool,
}

#[async_trait]
impl AccountNameLookup for StubAccounts {
    async fn account_name(&self, _asset_type: AssetType, identifier: &str) -> vulcan_core::Result<String> {
        if self.fail {
            Err(VulcanError::Collaborator {
                collaborator: "account lookup".to_string(),
                message: "unavailable".to_string(),
            })
        } else {
            Ok(format!("account-{identifier}"))
        }
    }
}

/// Resolver where `example.com` is both a live hostname and a zone apex and
/// `www.example.com` is a live hostname.
pub fn test_resolver() -> AssetResolver {
    init_test_logging();
    let names = StubNames {
        resolvable: ["example.com", "www.example.com"]
            .into_iter()
            .map(String::from)
            .collect(),
        apexes: ["example.com"].into_iter().map(String::from).collect(),
    };
    AssetResolver::new(Arc::new(names), Arc::new(StubAccounts { fail: false }))
}
