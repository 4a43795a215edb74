//! Team snapshots: the in-memory model shared by the local (desired) and
//! remote (actual) side, its on-disk codec, and consistency diagnostics.

pub mod codec;
pub mod consistency;
pub mod fetch;
pub mod matcher;
pub mod model;

pub use codec::{list_team_dirs, read_team, team_dir, write_team};
pub use consistency::{classify, ConsistencyReport};
pub use fetch::{fetch_team, resolve_team};
pub use model::{
    Asset, AssetKey, Group, Member, Policy, PolicySetting, Program, Role, Team, TeamInfo,
};
