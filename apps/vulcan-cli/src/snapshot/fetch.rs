//! Building the remote snapshot.

use vulcan_core::TeamId;

use super::model::{Group, Team};
use crate::api::{Remote, TeamSummary};
use crate::error::{CliError, CliResult};

/// Find the remote team a local snapshot refers to: by ID when the snapshot
/// has one, otherwise by exact name.
pub async fn resolve_team(
    remote: &dyn Remote,
    id: Option<TeamId>,
    name: &str,
) -> CliResult<TeamSummary> {
    if let Some(id) = id {
        return match remote.get_team(id).await {
            Ok(team) => Ok(team),
            Err(CliError::Api { status: 404, .. }) => {
                Err(CliError::NotFound(format!("team '{name}' ({id})")))
            }
            Err(e) => Err(e),
        };
    }

    remote
        .list_teams()
        .await?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| CliError::NotFound(format!("team '{name}'")))
}

/// Pull every category of `team` into a canonically sorted snapshot.
pub async fn fetch_team(remote: &dyn Remote, team: &TeamSummary) -> CliResult<Team> {
    let team_id = team.id;
    let mut snapshot = Team {
        id: Some(team_id),
        name: team.name.clone(),
        info: team.info.clone(),
        ..Team::default()
    };

    snapshot.recipients = remote.list_recipients(team_id).await?;
    snapshot.members = remote.list_members(team_id).await?;
    snapshot.assets = remote.list_assets(team_id).await?;
    for group in remote.list_groups(team_id).await? {
        let assets = remote.list_group_assets(team_id, group.id).await?;
        snapshot.groups.push(Group {
            id: Some(group.id),
            name: group.name,
            assets,
        });
    }
    snapshot.policies = remote.list_policies(team_id).await?;
    snapshot.programs = remote.list_programs(team_id).await?;
    snapshot.sort();

    tracing::info!(
        team = %snapshot.name,
        team_id = %team_id,
        members = snapshot.members.len(),
        groups = snapshot.groups.len(),
        assets = snapshot.assets.len(),
        "Fetched remote snapshot"
    );
    Ok(snapshot)
}
