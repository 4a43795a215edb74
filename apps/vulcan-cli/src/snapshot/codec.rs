//! On-disk snapshot format.
//!
//! One directory per team, semicolon-delimited line records:
//!
//! ```text
//! <team>/info                  id;name;description;tag
//! <team>/recipients            one email per line
//! <team>/members               email;role;id
//! <team>/assets                target;type;rolfp;alias;id
//! <team>/groups/<name>;<id>    asset records as in `assets`
//! <team>/policies/<name>;<id>  description line, then check_type;options_json;id
//! <team>/programs              id;name;cron;disabled
//! ```
//!
//! Blank lines are ignored (except the policy description line, which is
//! always the first line) and empty columns mean "unset". Free-text columns
//! are kept verbatim, surrounding whitespace included; only IDs, roles,
//! types and flags tolerate padding.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use vulcan_core::{parse_optional, AssetType, Rolfp};

use super::model::{Asset, Group, Member, Policy, PolicySetting, Program, Role, Team, TeamInfo};
use crate::error::{CliError, CliResult};

const INFO_FILE: &str = "info";
const RECIPIENTS_FILE: &str = "recipients";
const MEMBERS_FILE: &str = "members";
const ASSETS_FILE: &str = "assets";
const PROGRAMS_FILE: &str = "programs";
const GROUPS_DIR: &str = "groups";
const POLICIES_DIR: &str = "policies";

/// Directory holding the snapshot of `team_name` under `root`.
pub fn team_dir(root: &Path, team_name: &str) -> PathBuf {
    root.join(team_name)
}

/// Every team directory under `root`, sorted by name.
pub fn list_team_dirs(root: &Path) -> CliResult<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Read the snapshot stored in `dir`. Missing files mean empty collections.
///
/// Groups and policies come back ordered by name, as after [`Team::sort`].
pub fn read_team(dir: &Path) -> CliResult<Team> {
    let fallback_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut team = Team::new(fallback_name);

    let info_path = dir.join(INFO_FILE);
    if let Some((line_no, line)) = records(&info_path)?.into_iter().next() {
        let [id, name, description, tag] = fields::<4>(&info_path, line_no, &line)?;
        team.id = parse_optional(id.trim()).map_err(|e| snapshot_error(&info_path, line_no, e))?;
        if !name.is_empty() {
            team.name = name.to_string();
        }
        team.info = TeamInfo {
            description: description.to_string(),
            tag: tag.to_string(),
        };
    }

    team.recipients = records(&dir.join(RECIPIENTS_FILE))?
        .into_iter()
        .map(|(_, line)| line)
        .collect();

    let members_path = dir.join(MEMBERS_FILE);
    for (line_no, line) in records(&members_path)? {
        let [email, role, id] = fields::<3>(&members_path, line_no, &line)?;
        team.members.push(Member {
            id: parse_optional(id.trim()).map_err(|e| snapshot_error(&members_path, line_no, e))?,
            email: email.to_string(),
            role: role
                .trim()
                .parse::<Role>()
                .map_err(|e| snapshot_error(&members_path, line_no, e))?,
        });
    }

    team.assets = read_assets(&dir.join(ASSETS_FILE))?;
    team.groups = read_groups(&dir.join(GROUPS_DIR))?;
    team.policies = read_policies(&dir.join(POLICIES_DIR))?;

    let programs_path = dir.join(PROGRAMS_FILE);
    for (line_no, line) in records(&programs_path)? {
        let [id, name, cron, disabled] = fields::<4>(&programs_path, line_no, &line)?;
        team.programs.push(Program {
            id: parse_optional(id.trim()).map_err(|e| snapshot_error(&programs_path, line_no, e))?,
            name: name.to_string(),
            cron: cron.to_string(),
            disabled: parse_bool(disabled.trim())
                .ok_or_else(|| snapshot_error(&programs_path, line_no, "disabled must be true or false"))?,
        });
    }

    tracing::debug!(
        team = %team.name,
        path = %dir.display(),
        assets = team.assets.len(),
        groups = team.groups.len(),
        "Read local snapshot"
    );
    Ok(team)
}

/// Write `team` into `dir`, replacing the previous snapshot.
///
/// Values containing `;` or a line break cannot be represented and are
/// rejected before anything is written.
pub fn write_team(dir: &Path, team: &Team) -> CliResult<()> {
    check_team(team)?;
    fs::create_dir_all(dir)?;

    write_lines(
        &dir.join(INFO_FILE),
        std::iter::once(join(&[
            &opt_id(team.id),
            &team.name,
            &team.info.description,
            &team.info.tag,
        ])),
    )?;
    write_lines(&dir.join(RECIPIENTS_FILE), team.recipients.iter().cloned())?;
    write_lines(
        &dir.join(MEMBERS_FILE),
        team.members
            .iter()
            .map(|m| join(&[&m.email, m.role.as_str(), &opt_id(m.id)])),
    )?;
    write_lines(&dir.join(ASSETS_FILE), team.assets.iter().map(asset_line))?;
    write_lines(
        &dir.join(PROGRAMS_FILE),
        team.programs.iter().map(|p| {
            join(&[
                &opt_id(p.id),
                &p.name,
                &p.cron,
                if p.disabled { "true" } else { "false" },
            ])
        }),
    )?;

    let groups_dir = reset_dir(&dir.join(GROUPS_DIR))?;
    for group in &team.groups {
        let path = groups_dir.join(format!("{};{}", group.name, opt_id(group.id)));
        write_lines(&path, group.assets.iter().map(asset_line))?;
    }

    let policies_dir = reset_dir(&dir.join(POLICIES_DIR))?;
    for policy in &team.policies {
        let path = policies_dir.join(format!("{};{}", policy.name, opt_id(policy.id)));
        let settings = policy
            .settings
            .iter()
            .map(|s| join(&[&s.check_type, &s.options, &opt_id(s.id)]));
        write_lines(&path, std::iter::once(policy.description.clone()).chain(settings))?;
    }

    tracing::debug!(team = %team.name, path = %dir.display(), "Wrote local snapshot");
    Ok(())
}

fn read_assets(path: &Path) -> CliResult<Vec<Asset>> {
    records(path)?
        .into_iter()
        .map(|(line_no, line)| parse_asset(path, line_no, &line))
        .collect()
}

fn parse_asset(path: &Path, line_no: usize, line: &str) -> CliResult<Asset> {
    let [target, asset_type, rolfp, alias, id] = fields::<5>(path, line_no, line)?;
    if target.trim().is_empty() {
        return Err(snapshot_error(path, line_no, "asset target is empty"));
    }
    let asset_type = asset_type.trim();
    let asset_type = if asset_type.is_empty() {
        None
    } else {
        Some(
            asset_type
                .parse::<AssetType>()
                .map_err(|e| snapshot_error(path, line_no, e))?,
        )
    };
    Ok(Asset {
        id: parse_optional(id.trim()).map_err(|e| snapshot_error(path, line_no, e))?,
        target: target.to_string(),
        asset_type,
        rolfp: rolfp
            .parse::<Rolfp>()
            .map_err(|e| snapshot_error(path, line_no, e))?,
        alias: alias.to_string(),
    })
}

fn read_groups(dir: &Path) -> CliResult<Vec<Group>> {
    let mut groups = Vec::new();
    let mut seen = HashSet::new();
    for path in list_files(dir)? {
        let (name, id) = split_file_name(&path)?;
        if !seen.insert(name.clone()) {
            return Err(snapshot_error(&path, 0, format!("duplicate group '{name}'")));
        }
        groups.push(Group {
            id: parse_optional(&id).map_err(|e| snapshot_error(&path, 0, e))?,
            name,
            assets: read_assets(&path)?,
        });
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

fn read_policies(dir: &Path) -> CliResult<Vec<Policy>> {
    let mut policies = Vec::new();
    for path in list_files(dir)? {
        let (name, id) = split_file_name(&path)?;
        let content = fs::read_to_string(&path)?;
        let mut lines = content.lines().enumerate();
        let description = lines
            .next()
            .map(|(_, l)| l.trim_end_matches('\r').to_string())
            .unwrap_or_default();

        let mut settings = Vec::new();
        for (idx, line) in lines {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            // Options are JSON and may contain ';', so split from both ends.
            let (check_type, rest) = line
                .split_once(';')
                .ok_or_else(|| snapshot_error(&path, line_no, "expected check_type;options;id"))?;
            let (options, setting_id) = rest
                .rsplit_once(';')
                .ok_or_else(|| snapshot_error(&path, line_no, "expected check_type;options;id"))?;
            settings.push(PolicySetting {
                id: parse_optional(setting_id.trim())
                    .map_err(|e| snapshot_error(&path, line_no, e))?,
                check_type: check_type.to_string(),
                options: options.to_string(),
            });
        }

        policies.push(Policy {
            id: parse_optional(&id).map_err(|e| snapshot_error(&path, 0, e))?,
            name,
            description,
            settings,
        });
    }
    policies.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(policies)
}

/// Non-blank lines with their 1-based line numbers. A missing file is empty.
fn records(path: &Path) -> CliResult<Vec<(usize, String)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r').to_string()))
        .collect())
}

fn fields<'a, const N: usize>(path: &Path, line_no: usize, line: &'a str) -> CliResult<[&'a str; N]> {
    let parts: Vec<&str> = line.split(';').collect();
    parts.try_into().map_err(|parts: Vec<&str>| {
        snapshot_error(
            path,
            line_no,
            format!("expected {N} fields, found {}", parts.len()),
        )
    })
}

fn list_files(dir: &Path) -> CliResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// `<name>;<id>` file names; a missing `;` means no ID.
fn split_file_name(path: &Path) -> CliResult<(String, String)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| snapshot_error(path, 0, "missing file name"))?;
    Ok(match file_name.rsplit_once(';') {
        Some((name, id)) => (name.to_string(), id.to_string()),
        None => (file_name, String::new()),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "" | "false" => Some(false),
        "true" => Some(true),
        _ => None,
    }
}

fn check_team(team: &Team) -> CliResult<()> {
    let mut values: Vec<(&str, &str)> = vec![
        ("team name", team.name.as_str()),
        ("team description", team.info.description.as_str()),
        ("team tag", team.info.tag.as_str()),
    ];
    if team.recipients.iter().any(|r| r.trim().is_empty()) {
        return Err(CliError::Validation(
            "recipient cannot be stored: value is blank".to_string(),
        ));
    }
    values.extend(team.recipients.iter().map(|r| ("recipient", r.as_str())));
    values.extend(team.members.iter().map(|m| ("member email", m.email.as_str())));
    for group in &team.groups {
        values.push(("group name", group.name.as_str()));
        if group.name.contains('/') {
            return Err(CliError::Validation(format!(
                "group name '{}' must not contain '/'",
                group.name
            )));
        }
    }
    for asset in team.assets.iter().chain(team.groups.iter().flat_map(|g| &g.assets)) {
        values.push(("asset target", asset.target.as_str()));
        values.push(("asset alias", asset.alias.as_str()));
    }
    for policy in &team.policies {
        values.push(("policy name", policy.name.as_str()));
        for setting in &policy.settings {
            values.push(("policy check type", setting.check_type.as_str()));
        }
    }
    for program in &team.programs {
        values.push(("program name", program.name.as_str()));
        values.push(("program cron", program.cron.as_str()));
    }

    if let Some((field, value)) = values.into_iter().find(|(_, v)| v.contains(';') || has_line_break(v)) {
        return Err(CliError::Validation(format!(
            "{field} '{value}' cannot be stored: values must not contain ';' or line breaks"
        )));
    }
    for policy in &team.policies {
        if has_line_break(&policy.description)
            || policy.settings.iter().any(|s| has_line_break(&s.options))
        {
            return Err(CliError::Validation(format!(
                "policy '{}' cannot be stored: values must not contain line breaks",
                policy.name
            )));
        }
    }
    Ok(())
}

fn has_line_break(value: &str) -> bool {
    value.contains('\n') || value.contains('\r')
}

fn asset_line(asset: &Asset) -> String {
    join(&[
        &asset.target,
        asset.asset_type.map(|t| t.as_str()).unwrap_or_default(),
        &asset.rolfp.to_string(),
        &asset.alias,
        &opt_id(asset.id),
    ])
}

fn opt_id<T: ToString>(id: Option<T>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

fn join(values: &[&str]) -> String {
    values.join(";")
}

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> CliResult<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}

fn reset_dir(dir: &Path) -> CliResult<PathBuf> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

fn snapshot_error(path: &Path, line_no: usize, message: impl ToString) -> CliError {
    let path = if line_no == 0 {
        path.display().to_string()
    } else {
        format!("{}:{}", path.display(), line_no)
    };
    CliError::Snapshot {
        path,
        message: message.to_string(),
    }
}
