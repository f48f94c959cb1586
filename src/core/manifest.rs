//! Asset manifest: the JSON inventory describing which assets belong to
//! which unit, with titles and placement hints.
//!
//! ```json
//! {
//!   "lessons": {
//!     "lesson_01": {
//!       "assets": [
//!         {
//!           "asset_id": "mm_l01_a01",
//!           "title": "The Margin Flow",
//!           "placement": "After 'Intro' section"
//!         }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level manifest document.
///
/// Unit keys are `lesson_01`-style; `BTreeMap` keeps iteration in unit
/// order so reports are stable between runs.
#[derive(Debug, Default, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub lessons: BTreeMap<String, UnitAssets>,
    #[serde(default)]
    pub exercises: BTreeMap<String, UnitAssets>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnitAssets {
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetSpec {
    pub asset_id: String,
    pub title: String,
    /// Free-text placement hint; empty when the author left it out.
    #[serde(default)]
    pub placement: String,
}

impl AssetManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read asset manifest: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid asset manifest: {}", path.display()))
    }

    /// Total asset count across all units.
    pub fn asset_count(&self) -> usize {
        self.lessons
            .values()
            .chain(self.exercises.values())
            .map(|unit| unit.assets.len())
            .sum()
    }
}

/// Unit number from a manifest key: `lesson_01` -> 1, `exercise-3` -> 3.
pub fn unit_number(key: &str) -> Option<u32> {
    key.rsplit(['_', '-']).next()?.parse().ok()
}

/// Find the rendered image for an asset in `dir`.
///
/// Infographics are exported as `<asset_id>_<descriptive-name>.png`; the
/// first match in sorted order wins.
pub fn find_asset_image(dir: &Path, asset_id: &str) -> Option<PathBuf> {
    let prefix = format!("{asset_id}_");
    let entries = fs::read_dir(dir).ok()?;

    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".png"))
        })
        .collect();

    if matches.is_empty() {
        None
    } else {
        matches.sort();
        matches.into_iter().next()
    }
}
