//! Fix command: repair formatting damage in published documents.
//!
//! Two independent passes, both enabled by default:
//!
//! - spacing: embed directives need exactly one blank line on each side
//!   or the downstream renderer shows them as literal text
//! - encoding: collapse double percent-encoding in store URLs
//!   (`%2520` back to `%20`) left behind by earlier publishing runs

use std::fs;

use anyhow::Result;
use regex::Regex;

use crate::cli::FixArgs;
use crate::cli::common::collect_markdown_files;
use crate::config::Config;
use crate::store;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Bound on nested decode passes; real damage is at most double-encoded.
const MAX_DECODE_PASSES: usize = 5;

pub fn run(config: &Config, args: &FixArgs) -> Result<()> {
    let spacing = args.spacing.unwrap_or(true);
    let encoding = args.encoding.unwrap_or(true);
    if !spacing && !encoding {
        log!("fix"; "no passes enabled");
        return Ok(());
    }

    let files = collect_markdown_files(
        &args.paths,
        &[&config.content.lessons, &config.content.exercises],
    )?;
    if files.is_empty() {
        log!("fix"; "no documents found");
        return Ok(());
    }
    log!("fix"; "checking {}", plural_count(files.len(), "document"));

    let mut fixed = 0;
    for file in &files {
        let text = match fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                log!("error"; "{}: {}", config.root_relative(file).display(), e);
                continue;
            }
        };

        let mut out = text.clone();
        if spacing {
            out = normalize_embed_spacing(&out);
        }
        if encoding {
            out = fix_url_encoding(&out, &config.store.host);
        }

        if out != text {
            fixed += 1;
            if args.dry_run {
                log!("fix"; "would fix {}", config.root_relative(file).display());
            } else {
                fs::write(file, out)?;
                debug!("fix"; "fixed {}", config.root_relative(file).display());
            }
        }
    }

    let verb = if args.dry_run { "would fix" } else { "fixed" };
    log!("fix"; "{} {}", verb, plural_count(fixed, "document"));
    Ok(())
}

/// Rebuild the line stream so every embed directive has exactly one blank
/// line before and after it.
fn normalize_embed_spacing(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut skip_blanks = false;

    for line in text.split('\n') {
        if line.trim_start().starts_with("{% embed") {
            while out.last().is_some_and(|l| l.trim().is_empty()) {
                out.pop();
            }
            if !out.is_empty() {
                out.push(String::new());
            }
            out.push(line.trim_end().to_string());
            out.push(String::new());
            skip_blanks = true;
            continue;
        }

        if line.trim().is_empty() {
            if !skip_blanks {
                out.push(line.to_string());
            }
            continue;
        }

        skip_blanks = false;
        out.push(line.to_string());
    }

    out.join("\n")
}

/// Re-encode every store URL in the document, collapsing any level of
/// double percent-encoding down to canonical single encoding.
fn fix_url_encoding(text: &str, host: &str) -> String {
    let host = host.trim_end_matches('/');
    let Ok(re) = Regex::new(&format!(r#"{}/[^\s<>()"']+"#, regex::escape(host))) else {
        return text.to_string();
    };

    re.replace_all(text, |caps: &regex::Captures| {
        let url = &caps[0];
        let rest = &url[host.len() + 1..];
        format!("{}/{}", host, store::encode_key(&decode_fully(rest)))
    })
    .into_owned()
}

/// Percent-decode until the string stops changing.
fn decode_fully(s: &str) -> String {
    let mut current = s.to_string();
    for _ in 0..MAX_DECODE_PASSES {
        let decoded = store::decode_key(&current);
        if decoded == current {
            break;
        }
        current = decoded;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://storage.googleapis.com";

    #[test]
    fn test_spacing_inserts_blank_lines() {
        let text = "# Title\n{% embed url=\"u\" %}\nbody\n";
        assert_eq!(
            normalize_embed_spacing(text),
            "# Title\n\n{% embed url=\"u\" %}\n\nbody\n"
        );
    }

    #[test]
    fn test_spacing_collapses_extra_blanks() {
        let text = "# Title\n\n\n\n{% embed url=\"u\" %}\n\n\n\nbody\n";
        assert_eq!(
            normalize_embed_spacing(text),
            "# Title\n\n{% embed url=\"u\" %}\n\nbody\n"
        );
    }

    #[test]
    fn test_spacing_adjacent_embeds() {
        let text = "{% embed url=\"a\" %}\n{% embed url=\"b\" %}\n# T\n";
        assert_eq!(
            normalize_embed_spacing(text),
            "{% embed url=\"a\" %}\n\n{% embed url=\"b\" %}\n\n# T\n"
        );
    }

    #[test]
    fn test_spacing_is_idempotent() {
        let text = "# Title\n\n\n{% embed url=\"u\" %}\nbody\n";
        let once = normalize_embed_spacing(text);
        assert_eq!(normalize_embed_spacing(&once), once);
    }

    #[test]
    fn test_spacing_leaves_clean_document_alone() {
        let text = "{% embed url=\"a\" %}\n\n# Title\n\nbody text\n\nmore\n";
        assert_eq!(normalize_embed_spacing(text), text);
    }

    #[test]
    fn test_spacing_preserves_non_embed_blank_runs() {
        // Blank runs away from embeds are none of our business
        let text = "para one\n\n\n\npara two\n";
        assert_eq!(normalize_embed_spacing(text), text);
    }

    #[test]
    fn test_encoding_collapses_double_encoding() {
        let text = format!("![t]({HOST}/b/audio/lesson1%2520intro.m4a)");
        assert_eq!(
            fix_url_encoding(&text, HOST),
            format!("![t]({HOST}/b/audio/lesson1%20intro.m4a)")
        );
    }

    #[test]
    fn test_encoding_leaves_correct_urls_alone() {
        let text = format!("![t]({HOST}/b/audio/lesson1%20intro.m4a)\n");
        assert_eq!(fix_url_encoding(&text, HOST), text);
    }

    #[test]
    fn test_encoding_preserves_non_ascii_encoding() {
        let text = format!("{HOST}/b/le%C3%A7on.m4a");
        assert_eq!(fix_url_encoding(&text, HOST), text);
    }

    #[test]
    fn test_encoding_ignores_other_hosts() {
        let text = "https://example.com/a%2520b\n";
        assert_eq!(fix_url_encoding(text, HOST), text);
    }

    #[test]
    fn test_decode_fully() {
        assert_eq!(decode_fully("a%2520b"), "a b");
        assert_eq!(decode_fully("a%20b"), "a b");
        assert_eq!(decode_fully("plain"), "plain");
    }
}
