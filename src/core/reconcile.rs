//! Reference reconciliation: give each asset exactly one up-to-date
//! reference in a document.
//!
//! The pass is idempotent. Running it again over its own output always
//! reports [`Outcome::Skipped`] and returns the text unchanged.

use crate::core::placement::find_insertion_point;
use crate::core::reference::{self, MediaKind};

/// What the reconciler did (or would do) for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A stale reference carried this asset's id with a different URL and
    /// was rewritten in place.
    Replaced,
    /// The document already carries the resolved URL; nothing to do.
    Skipped,
    /// No reference existed; a new one was spliced in at `offset`.
    Inserted { offset: usize },
    /// Dry-run variant of `Inserted`: reports where the reference would
    /// land without touching the text.
    WouldInsert { offset: usize },
    /// No existing reference and the placement hint matched nothing.
    InsertionFailed,
}

impl Outcome {
    /// True when the outcome carries modified text.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Replaced | Self::Inserted { .. })
    }
}

/// One asset to reconcile against a document.
#[derive(Debug, Clone, Copy)]
pub struct AssetRef<'a> {
    /// Stable asset id, matched exact-case inside URLs.
    pub id: &'a str,
    /// Human title, used as alt/link text.
    pub title: &'a str,
    /// Free-text placement hint from the asset manifest.
    pub placement: &'a str,
    /// Resolved public URL for the uploaded object.
    pub url: &'a str,
    pub kind: MediaKind,
}

/// Reconcile one asset against `text`.
///
/// Three steps, stopping at the first that applies:
///
/// 1. An existing reference (markdown image or embed directive) whose URL
///    carries the asset id: equal URL means [`Outcome::Skipped`], a stale
///    URL is rewritten in place ([`Outcome::Replaced`]). Only the first
///    such reference is considered; duplicates are left alone.
/// 2. The resolved URL appears anywhere else in the document: skip.
/// 3. Otherwise run placement discovery and splice in a fresh reference,
///    padded with blank lines on both sides.
///
/// With `dry_run` the text is never modified; a would-be insertion is
/// reported as [`Outcome::WouldInsert`].
pub fn reconcile(text: &str, asset: &AssetRef<'_>, dry_run: bool) -> (String, Outcome) {
    // Step 1: rewrite a stale reference in place
    if let Some((start, end, current_url)) = find_existing(text, asset.id) {
        if current_url == asset.url {
            return (text.to_string(), Outcome::Skipped);
        }
        if dry_run {
            return (text.to_string(), Outcome::Replaced);
        }
        let canonical = reference::canonical(asset.kind, asset.title, asset.url);
        let mut out = String::with_capacity(text.len() + canonical.len());
        out.push_str(&text[..start]);
        out.push_str(&canonical);
        out.push_str(&text[end..]);
        return (out, Outcome::Replaced);
    }

    // Step 2: URL already present in some other form (bare link, html img)
    if text.contains(asset.url) {
        return (text.to_string(), Outcome::Skipped);
    }

    // Step 3: fresh insertion
    let Some(offset) = find_insertion_point(text, asset.placement) else {
        return (text.to_string(), Outcome::InsertionFailed);
    };
    if dry_run {
        return (text.to_string(), Outcome::WouldInsert { offset });
    }

    let canonical = reference::canonical(asset.kind, asset.title, asset.url);
    let insertion = format!("\n\n{canonical}\n\n");
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..offset]);
    out.push_str(&insertion);
    out.push_str(&text[offset..]);
    (out, Outcome::Inserted { offset })
}

/// First reference in `text` whose URL carries `asset_id`, as
/// `(match_start, match_end, url)`.
///
/// Markdown image syntax is checked before embed directives; whichever
/// matches earliest in the document wins.
fn find_existing(text: &str, asset_id: &str) -> Option<(usize, usize, String)> {
    let image = reference::existing_reference(asset_id)
        .captures(text)
        .map(|cap| {
            let m = cap.get(0).unwrap();
            (m.start(), m.end(), cap[1].to_string())
        });
    let embed = reference::existing_embed(asset_id).captures(text).map(|cap| {
        let m = cap.get(0).unwrap();
        (m.start(), m.end(), cap[1].to_string())
    });

    match (image, embed) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Intro\ntext\n\n# Risks\nbody\n";

    fn image_asset<'a>(url: &'a str) -> AssetRef<'a> {
        AssetRef {
            id: "mm_l01_a01",
            title: "Margin Flow",
            placement: "After 'Intro' section",
            url,
            kind: MediaKind::Image,
        }
    }

    #[test]
    fn test_insert_fresh_reference() {
        let asset = image_asset("https://h/b/images/mm_l01_a01_flow.png");
        let (out, outcome) = reconcile(DOC, &asset, false);
        assert_eq!(outcome, Outcome::Inserted { offset: 13 });
        assert_eq!(
            out,
            "# Intro\ntext\n\n\n![Margin Flow](https://h/b/images/mm_l01_a01_flow.png)\n\n\n# Risks\nbody\n"
        );
    }

    #[test]
    fn test_skip_when_url_present() {
        let asset = image_asset("https://h/b/images/mm_l01_a01_flow.png");
        let (inserted, _) = reconcile(DOC, &asset, false);
        let (again, outcome) = reconcile(&inserted, &asset, false);
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(again, inserted);
    }

    #[test]
    fn test_idempotent_over_many_runs() {
        let asset = image_asset("https://h/b/images/mm_l01_a01_flow.png");
        let (mut text, _) = reconcile(DOC, &asset, false);
        for _ in 0..3 {
            let (next, outcome) = reconcile(&text, &asset, false);
            assert_eq!(outcome, Outcome::Skipped);
            assert_eq!(next, text);
            text = next;
        }
    }

    #[test]
    fn test_replace_stale_reference_span_exact() {
        let text = "before\n![old alt](https://h/b/images/mm_l01_a01_v1.png)\nafter\n";
        let asset = image_asset("https://h/b/images/mm_l01_a01_v2.png");
        let (out, outcome) = reconcile(text, &asset, false);
        assert_eq!(outcome, Outcome::Replaced);
        assert_eq!(
            out,
            "before\n![Margin Flow](https://h/b/images/mm_l01_a01_v2.png)\nafter\n"
        );
    }

    #[test]
    fn test_replace_only_first_stale_reference() {
        let text = "![a](images/mm_l01_a01_x.png)\n\n![b](images/mm_l01_a01_x.png)\n";
        let asset = image_asset("https://h/b/images/mm_l01_a01_x.png");
        let (out, outcome) = reconcile(text, &asset, false);
        assert_eq!(outcome, Outcome::Replaced);
        // Second (duplicate) reference is untouched
        assert_eq!(
            out,
            "![Margin Flow](https://h/b/images/mm_l01_a01_x.png)\n\n![b](images/mm_l01_a01_x.png)\n"
        );
    }

    #[test]
    fn test_replace_stale_embed() {
        let text = "{% embed url=\"https://h/b/audio/lesson1_intro_old.m4a\" %}\n\n# T\n";
        let asset = AssetRef {
            id: "lesson1_intro",
            title: "",
            placement: "",
            url: "https://h/b/audio/lesson1_intro.m4a",
            kind: MediaKind::Audio,
        };
        let (out, outcome) = reconcile(text, &asset, false);
        assert_eq!(outcome, Outcome::Replaced);
        assert_eq!(
            out,
            "{% embed url=\"https://h/b/audio/lesson1_intro.m4a\" %}\n\n# T\n"
        );
    }

    #[test]
    fn test_skip_identical_embed() {
        let text = "{% embed url=\"https://h/b/audio/lesson1_intro.m4a\" %}\n\n# T\n";
        let asset = AssetRef {
            id: "lesson1_intro",
            title: "",
            placement: "",
            url: "https://h/b/audio/lesson1_intro.m4a",
            kind: MediaKind::Audio,
        };
        let (out, outcome) = reconcile(text, &asset, false);
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(out, text);
    }

    #[test]
    fn test_skip_url_in_other_syntax() {
        // URL present as a bare link, not a matching image reference
        let text = "see <https://h/b/docs/mm_l01_a01.pdf>\n";
        let asset = AssetRef {
            id: "mm_l01_a01_pdf",
            title: "Notes",
            placement: "top",
            url: "https://h/b/docs/mm_l01_a01.pdf",
            kind: MediaKind::Other,
        };
        let (out, outcome) = reconcile(text, &asset, false);
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(out, text);
    }

    #[test]
    fn test_insertion_failed_when_hint_misses() {
        let asset = AssetRef {
            placement: "After 'Nonexistent' zone",
            ..image_asset("https://h/b/images/mm_l01_a01_flow.png")
        };
        let (out, outcome) = reconcile(DOC, &asset, false);
        assert_eq!(outcome, Outcome::InsertionFailed);
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_dry_run_reports_without_modifying() {
        let asset = image_asset("https://h/b/images/mm_l01_a01_flow.png");
        let (out, outcome) = reconcile(DOC, &asset, true);
        assert_eq!(outcome, Outcome::WouldInsert { offset: 13 });
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_dry_run_replacement_leaves_text() {
        let text = "![old](images/mm_l01_a01_v1.png)\n";
        let asset = image_asset("https://h/b/images/mm_l01_a01_v2.png");
        let (out, outcome) = reconcile(text, &asset, true);
        assert_eq!(outcome, Outcome::Replaced);
        assert_eq!(out, text);
    }

    #[test]
    fn test_other_assets_do_not_interfere() {
        let text = "![other](images/mm_l01_a02_chart.png)\n\n# Intro\ntext\n\n# Risks\nbody\n";
        let asset = image_asset("https://h/b/images/mm_l01_a01_flow.png");
        let (_, outcome) = reconcile(text, &asset, false);
        assert!(matches!(outcome, Outcome::Inserted { .. }));
    }
}
