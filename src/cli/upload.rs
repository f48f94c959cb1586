//! Upload command: push media files to the object store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::UploadArgs;
use crate::cli::common::walk_files;
use crate::config::Config;
use crate::core::{MediaKind, lesson};
use crate::logger::ProgressLine;
use crate::store::{self, GcsStore, ObjectStore};
use crate::utils::mime;
use crate::utils::path::resolve_path;
use crate::utils::plural::plural_count;
use crate::{debug, log};

pub fn run(config: &Config, args: &UploadArgs) -> Result<()> {
    let files = collect_upload_files(config, args)?;
    if files.is_empty() {
        log!("upload"; "nothing to upload");
        return Ok(());
    }

    if args.dry_run {
        log!("upload"; "would upload {}:", plural_count(files.len(), "file"));
        for file in &files {
            let (bucket, key) = destination(config, args, file);
            eprintln!("- {}", store::public_url(&config.store.host, bucket, &key));
        }
        return Ok(());
    }

    let store = GcsStore::connect(&config.store.project, &config.store.credentials)?;
    log!("upload"; "uploading {}", plural_count(files.len(), "file"));

    // Per-kind counters; folder names double as counter labels
    let count = |kind: MediaKind| {
        files
            .iter()
            .filter(|f| MediaKind::from_path(f) == kind)
            .count()
    };
    let progress = ProgressLine::new(&[
        ("audio", count(MediaKind::Audio)),
        ("video", count(MediaKind::Video)),
        ("images", count(MediaKind::Image)),
        ("files", count(MediaKind::Other)),
    ]);

    let mut failures = 0;
    for file in &files {
        let (bucket, key) = destination(config, args, file);
        let result = fs::read(file)
            .map_err(anyhow::Error::from)
            .and_then(|body| {
                store
                    .put_object(bucket, &key, body, mime::from_path(file))
                    .map_err(anyhow::Error::from)
            });
        match result {
            Ok(()) => {
                debug!(
                    "upload";
                    "{} -> {}",
                    config.root_relative(file).display(),
                    store::public_url(&config.store.host, bucket, &key)
                );
                progress.inc(MediaKind::from_path(file).folder());
            }
            Err(e) => {
                log!("error"; "{}: {:#}", config.root_relative(file).display(), e);
                failures += 1;
            }
        }
    }
    progress.finish();

    let uploaded = files.len() - failures;
    log!("upload"; "uploaded {}", plural_count(uploaded, "file"));
    if failures > 0 {
        anyhow::bail!("upload finished with {}", plural_count(failures, "failure"));
    }
    Ok(())
}

/// Bucket and object key for one file.
///
/// Media keys nest per unit: `lesson-01/audio/lesson1 intro.m4a`, with
/// `general/` for files carrying no unit number. Image keys mirror the
/// images directory layout (`lessons/lesson_01/mm_l01_a01_flow.png`), so
/// published URLs line up with what the reconciler emits.
fn destination<'a>(config: &'a Config, args: &UploadArgs, file: &Path) -> (&'a str, String) {
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if args.images {
        let key = file
            .strip_prefix(&config.content.images)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or(filename);
        (config.store.bucket_for_images(), key)
    } else {
        let kind = MediaKind::from_path(file);
        let prefix = &config.content.unit_prefix;
        let slug = lesson::extract_number(&filename, prefix)
            .map(|n| lesson::slug(prefix, n))
            .unwrap_or_else(|| "general".to_string());
        (
            config.store.media_bucket.as_str(),
            format!("{}/{}/{}", slug, kind.folder(), filename),
        )
    }
}

fn collect_upload_files(config: &Config, args: &UploadArgs) -> Result<Vec<PathBuf>> {
    let content = &config.content;

    if !args.paths.is_empty() {
        let fallback = if args.images {
            content.images.as_path()
        } else {
            content.audio.as_path()
        };
        let mut files = Vec::new();
        for path in &args.paths {
            let resolved = resolve_path(path, fallback);
            if !resolved.is_file() {
                anyhow::bail!("File not found: {}", path.display());
            }
            files.push(resolved);
        }
        return Ok(files);
    }

    if args.images {
        return Ok(walk_files(&content.images, is_image));
    }

    if !args.all {
        anyhow::bail!("specify media files, or --all to upload every recording");
    }

    let mut files = walk_files(&content.audio, is_media);
    files.extend(walk_files(&content.videos, is_media));
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    MediaKind::from_path(path) == MediaKind::Image
}

fn is_media(path: &Path) -> bool {
    matches!(
        MediaKind::from_path(path),
        MediaKind::Audio | MediaKind::Video
    )
}
