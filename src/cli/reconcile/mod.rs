//! Reconcile command: drive manifest assets through the reconciler.

mod report;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::cli::ReconcileArgs;
use crate::config::Config;
use crate::core::manifest::{self, AssetManifest, UnitAssets};
use crate::core::{AssetRef, MediaKind, lesson, reconcile};
use crate::log;
use crate::store;
use crate::utils::plural::{plural_count, plural_s};

use report::ReconcileReport;

/// Reconcile every manifest asset against its unit's document.
pub fn run(config: &Config, args: &ReconcileArgs) -> Result<()> {
    let manifest = AssetManifest::load(&config.content.manifest)?;
    log!(
        "reconcile";
        "loaded {} from {}",
        plural_count(manifest.asset_count(), "asset"),
        config.root_relative(&config.content.manifest).display()
    );
    if args.dry_run {
        log!("reconcile"; "dry run, no files will be written");
    }

    let mut report = ReconcileReport::default();

    if args.exercise.is_none() {
        reconcile_units(
            config,
            &manifest.lessons,
            "lessons",
            &config.content.unit_prefix,
            &config.content.lessons,
            args.lesson,
            args.dry_run,
            &mut report,
        );
    }
    if args.lesson.is_none() {
        reconcile_units(
            config,
            &manifest.exercises,
            "exercises",
            &config.content.exercise_prefix,
            &config.content.exercises,
            args.exercise,
            args.dry_run,
            &mut report,
        );
    }

    report.print();
    log!("reconcile"; "{report}");

    if report.has_failures() {
        let count = report.failure_count();
        anyhow::bail!("reconcile finished with {} failure{}", count, plural_s(count));
    }
    Ok(())
}

/// Reconcile one manifest group (lessons or exercises).
///
/// Image files live under `{images}/{group}/{unit key}/` and uploaded
/// object keys mirror that layout, so the constructed URL matches what
/// the image upload published.
#[allow(clippy::too_many_arguments)]
fn reconcile_units(
    config: &Config,
    units: &BTreeMap<String, UnitAssets>,
    group: &str,
    prefix: &str,
    docs_dir: &Path,
    only: Option<u32>,
    dry_run: bool,
    report: &mut ReconcileReport,
) {
    for (key, unit) in units {
        let Some(number) = manifest::unit_number(key) else {
            log!("warning"; "manifest key '{}' carries no unit number, skipping", key);
            continue;
        };
        if let Some(n) = only
            && number != n
        {
            continue;
        }

        let slug = lesson::slug(prefix, number);
        let Some(doc) = lesson::find_unit_doc(docs_dir, &slug) else {
            report.add_failure(&slug, "*", "no matching document");
            continue;
        };
        let doc_name = config.root_relative(&doc).display().to_string();

        let mut text = match fs::read_to_string(&doc) {
            Ok(text) => text,
            Err(e) => {
                report.add_failure(&doc_name, "*", format!("read failed: {e}"));
                continue;
            }
        };
        let mut changed = false;

        let image_dir = config.content.images.join(group).join(key);
        for asset in &unit.assets {
            let Some(image) = manifest::find_asset_image(&image_dir, &asset.asset_id) else {
                report.add_failure(&doc_name, &asset.asset_id, "no exported image");
                continue;
            };
            let filename = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let url = store::public_url(
                &config.store.host,
                config.store.bucket_for_images(),
                &format!("{group}/{key}/{filename}"),
            );

            let asset_ref = AssetRef {
                id: &asset.asset_id,
                title: &asset.title,
                placement: &asset.placement,
                url: &url,
                kind: MediaKind::Image,
            };
            let (next, outcome) = reconcile(&text, &asset_ref, dry_run);
            report.add_outcome(&doc_name, &asset.asset_id, &outcome);
            if outcome.changed() {
                changed = true;
                text = next;
            }
        }

        if changed && !dry_run {
            if let Err(e) = fs::write(&doc, &text) {
                report.add_failure(&doc_name, "*", format!("write failed: {e}"));
            } else {
                crate::debug!("reconcile"; "wrote {}", doc_name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::AssetSpec;
    use tempfile::tempdir;

    #[test]
    fn test_reconcile_units_builds_nested_image_urls() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.root = dir.path().to_path_buf();
        config.content.lessons = dir.path().join("content/lessons");
        config.content.images = dir.path().join("images");
        config.store.image_bucket = "imgs".to_string();

        fs::create_dir_all(&config.content.lessons).unwrap();
        let doc = config.content.lessons.join("lesson-01-intro.md");
        fs::write(&doc, "# Intro\ntext\n\n# Risks\nbody\n").unwrap();

        let image_dir = config.content.images.join("lessons/lesson_01");
        fs::create_dir_all(&image_dir).unwrap();
        fs::write(image_dir.join("mm_l01_a01_flow.png"), b"").unwrap();

        let mut units = BTreeMap::new();
        units.insert(
            "lesson_01".to_string(),
            UnitAssets {
                assets: vec![AssetSpec {
                    asset_id: "mm_l01_a01".to_string(),
                    title: "Flow".to_string(),
                    placement: "After 'Intro' section".to_string(),
                }],
            },
        );

        let mut report = ReconcileReport::default();
        reconcile_units(
            &config,
            &units,
            "lessons",
            "lesson",
            &config.content.lessons,
            None,
            false,
            &mut report,
        );

        assert!(!report.has_failures());
        // The emitted URL mirrors the images directory layout
        let text = fs::read_to_string(&doc).unwrap();
        assert!(text.contains(
            "![Flow](https://storage.googleapis.com/imgs/lessons/lesson_01/mm_l01_a01_flow.png)"
        ));
    }
}
