//! CSV import of asset inventories
//!
//! CSV format is designed for bulk inventory edits via spreadsheets:
//! `target,type,rolfp,alias,groups` where only `target` is required, an
//! empty `type` asks `push` to detect it, and `groups` is a `|`-separated
//! list of group names.

use serde::Deserialize;
use std::collections::HashSet;
use vulcan_core::{AssetType, Rolfp};

use crate::snapshot::{Asset, Group, Team};

/// CSV record for asset data
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CsvAssetRecord {
    /// Asset identifier (hostname, IP, ARN, URL, ...)
    pub target: String,
    /// Asset type; empty means detect on push
    #[serde(rename = "type", default)]
    pub asset_type: String,
    /// ROLFP vector in canonical text form (optional)
    #[serde(default)]
    pub rolfp: String,
    /// Human-readable alias (optional)
    #[serde(default)]
    pub alias: String,
    /// Groups to add the asset to, separated by `|` (optional)
    #[serde(default)]
    pub groups: String,
}

/// A validated CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedAsset {
    pub asset: Asset,
    pub groups: Vec<String>,
}

impl TryFrom<CsvAssetRecord> for ImportedAsset {
    type Error = String;

    fn try_from(record: CsvAssetRecord) -> Result<Self, Self::Error> {
        if record.target.is_empty() {
            return Err("target is required".to_string());
        }
        let asset_type = if record.asset_type.is_empty() {
            None
        } else {
            Some(
                record
                    .asset_type
                    .parse::<AssetType>()
                    .map_err(|e| e.to_string())?,
            )
        };
        let rolfp = record.rolfp.parse::<Rolfp>().map_err(|e| e.to_string())?;

        Ok(Self {
            asset: Asset {
                id: None,
                target: record.target,
                asset_type,
                rolfp,
                alias: record.alias,
            },
            groups: record
                .groups
                .split('|')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Result of importing assets from CSV
pub struct CsvAssetImportResult {
    /// Successfully parsed assets
    pub assets: Vec<ImportedAsset>,
    /// Errors encountered during parsing (line number, error message)
    pub errors: Vec<(usize, String)>,
}

/// Import assets from CSV content
///
/// Processes all rows and collects errors for reporting.
pub fn import_assets_csv(content: &str) -> CsvAssetImportResult {
    let mut assets = Vec::new();
    let mut errors = Vec::new();

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // Check headers
    if let Ok(headers) = rdr.headers() {
        if !headers.iter().any(|h| h == "target") {
            errors.push((1, "CSV missing required columns: target".to_string()));
            return CsvAssetImportResult { assets, errors };
        }
    }

    for (idx, result) in rdr.deserialize::<CsvAssetRecord>().enumerate() {
        let line_num = idx + 2; // +1 for 0-index, +1 for header
        match result {
            Ok(record) => match ImportedAsset::try_from(record) {
                Ok(asset) => assets.push(asset),
                Err(e) => errors.push((line_num, e)),
            },
            Err(e) => {
                errors.push((line_num, format!("CSV parse error: {}", e)));
            }
        }
    }

    CsvAssetImportResult { assets, errors }
}

/// Counts of a merge into a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub memberships: usize,
}

/// Merge imported assets into `team`.
///
/// Rows matching an inventory line with the same target and type update its
/// ROLFP and alias when those columns are set; other rows are appended.
/// Missing groups are added to the snapshot.
pub fn merge_into(team: &mut Team, imported: Vec<ImportedAsset>) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for ImportedAsset { asset, groups } in imported {
        match team
            .assets
            .iter_mut()
            .find(|a| a.target == asset.target && a.asset_type == asset.asset_type)
        {
            Some(existing) => {
                let mut changed = false;
                if !asset.rolfp.is_empty() && existing.rolfp != asset.rolfp {
                    existing.rolfp = asset.rolfp;
                    changed = true;
                }
                if !asset.alias.is_empty() && existing.alias != asset.alias {
                    existing.alias = asset.alias.clone();
                    changed = true;
                }
                if changed {
                    summary.updated += 1;
                }
            }
            None => {
                team.assets.push(asset.clone());
                summary.added += 1;
            }
        }

        let mut seen = HashSet::new();
        for name in groups.into_iter().filter(|g| seen.insert(g.clone())) {
            let index = match team.groups.iter().position(|g| g.name == name) {
                Some(index) => index,
                None => {
                    team.groups.push(Group::new(name));
                    team.groups.len() - 1
                }
            };
            let group = &mut team.groups[index];
            let present = group
                .assets
                .iter()
                .any(|a| a.target == asset.target && a.asset_type == asset.asset_type);
            if !present {
                group.assets.push(asset.clone());
                summary.memberships += 1;
            }
        }
    }

    summary
}
