//! Embed command: prepend audio/video embed blocks to lesson documents.

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::cli::EmbedArgs;
use crate::cli::common::collect_markdown_files;
use crate::config::Config;
use crate::core::reference::{embed_block, embed_directive, has_leading_embeds};
use crate::core::{MediaKind, lesson};
use crate::store;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Prepend the recorded audio/video block to each lesson that has media
/// but no embeds yet.
pub fn run(config: &Config, args: &EmbedArgs) -> Result<()> {
    let files = collect_markdown_files(&args.paths, &[&config.content.lessons])?;
    if files.is_empty() {
        log!("embed"; "no lesson documents found");
        return Ok(());
    }
    log!("embed"; "checking {}", plural_count(files.len(), "document"));
    if args.dry_run {
        log!("embed"; "dry run, no files will be written");
    }

    let mut updated = 0;
    let mut failures = 0;
    for file in &files {
        match process_lesson(config, file, args.dry_run) {
            Ok(true) => updated += 1,
            Ok(false) => {}
            Err(e) => {
                log!("error"; "{}: {}", config.root_relative(file).display(), e);
                failures += 1;
            }
        }
    }

    let verb = if args.dry_run { "would update" } else { "updated" };
    log!("embed"; "{} {}", verb, plural_count(updated, "document"));
    if failures > 0 {
        anyhow::bail!("embed finished with {}", plural_count(failures, "failure"));
    }
    Ok(())
}

/// Returns true when the document was (or would be) updated.
fn process_lesson(config: &Config, file: &Path, dry_run: bool) -> Result<bool> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(number) = lesson::extract_number(&name, &config.content.unit_prefix) else {
        debug!("embed"; "{} carries no unit number, skipping", name);
        return Ok(false);
    };

    let directives = media_directives(config, number);
    if directives.is_empty() {
        debug!("embed"; "no media recorded for unit {}, skipping {}", number, name);
        return Ok(false);
    }

    let text = fs::read_to_string(file)?;
    if has_leading_embeds(&text) {
        debug!("embed"; "{} already starts with embeds, skipping", name);
        return Ok(false);
    }

    if dry_run {
        log!("embed"; "would prepend {} to {}", plural_count(directives.len(), "embed"), name);
        return Ok(true);
    }

    let mut out = embed_block(&directives);
    out.push_str(&text);
    fs::write(file, out)?;
    debug!("embed"; "prepended {} to {}", plural_count(directives.len(), "embed"), name);
    Ok(true)
}

/// Embed directives for a unit's recorded media, audio first.
///
/// URLs follow the upload key layout: `{unit-slug}/{kind}/{filename}`.
fn media_directives(config: &Config, number: u32) -> Vec<String> {
    let content = &config.content;
    let slug = lesson::slug(&content.unit_prefix, number);
    let mut directives = Vec::new();

    let media = [
        (&content.audio, &content.audio_ext, MediaKind::Audio),
        (&content.videos, &content.video_ext, MediaKind::Video),
    ];
    for (dir, ext, kind) in media {
        if let Some(file) = lesson::find_media_file(dir, &content.unit_prefix, number, ext)
            && let Some(filename) = file.file_name().and_then(|n| n.to_str())
        {
            let key = format!("{}/{}/{}", slug, kind.folder(), filename);
            let url = store::public_url(&config.store.host, &config.store.media_bucket, &key);
            directives.push(embed_directive(&url));
        }
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_media_directives_nest_keys_by_unit() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.content.audio = dir.path().join("audio");
        config.content.videos = dir.path().join("videos");
        config.store.media_bucket = "media".to_string();
        fs::create_dir_all(&config.content.audio).unwrap();
        File::create(config.content.audio.join("lesson1 intro.m4a")).unwrap();

        let directives = media_directives(&config, 1);
        assert_eq!(directives.len(), 1);
        assert_eq!(
            directives[0],
            "{% embed url=\"https://storage.googleapis.com/media/lesson-01/audio/lesson1%20intro.m4a\" %}"
        );
    }
}
