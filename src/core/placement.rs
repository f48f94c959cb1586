//! Insertion-point discovery for markdown documents.
//!
//! Placement hints are free text written by content authors
//! (e.g. `After 'The Two Architectural Philosophies' section`), so the
//! parser is heuristic. Three tiers, tried in order:
//!
//! 1. Structural: find the named section heading and insert at its end
//! 2. Textual: find the hint text itself and insert after the paragraph
//! 3. Keyword: find any long-enough word of the hint in the document
//!
//! All tiers are pure text functions returning byte offsets, so the policy
//! is unit-testable without touching the filesystem.

use std::sync::LazyLock;

use regex::Regex;

/// Lines scanned past a matched heading when no bounding heading exists.
const LOOKAHEAD_LINES: usize = 20;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());

/// Compute the byte offset where a new reference should be spliced in,
/// or `None` when the hint matches nothing in the document.
pub fn find_insertion_point(text: &str, hint: &str) -> Option<usize> {
    let candidate = section_candidate(hint);

    if !candidate.is_empty() {
        if let Some(offset) = find_after_section(text, &candidate) {
            return Some(offset);
        }
        if let Some(offset) = find_after_match(text, &candidate) {
            return Some(offset);
        }
    }

    find_by_keywords(text, hint)
}

/// Extract the section name from a placement hint.
///
/// Prefers quoted text (`After 'Risks' section` -> `Risks`); otherwise
/// strips the `After`/`section` filler tokens and surrounding quotes.
fn section_candidate(hint: &str) -> String {
    if let Some(cap) = QUOTED.captures(hint) {
        return cap[1].to_string();
    }

    hint.replace("After", "")
        .replace("section", "")
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

/// Tier 1: locate a heading containing `section` and return the offset at
/// the end of that section.
///
/// The section ends at the next heading of the same or a higher level. When
/// no such heading exists anywhere below, the insertion point lands after
/// the second paragraph line within a bounded look-ahead window, or right
/// after the heading when the section is shorter than that.
fn find_after_section(text: &str, section: &str) -> Option<usize> {
    let section_lower = section.to_lowercase();
    let lines: Vec<&str> = text.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.starts_with('#') || !line.to_lowercase().contains(&section_lower) {
            continue;
        }
        let level = heading_level(line);

        // Bounding heading: same or higher level further down
        for (j, next) in lines.iter().enumerate().skip(i + 1) {
            if !next.trim().is_empty() && next.starts_with('#') && heading_level(next) <= level {
                return Some(join_len(&lines, j));
            }
        }

        // Degenerate document: no bounding heading at all. Count paragraph
        // lines (non-heading, non-list) within the look-ahead window.
        let mut insert_idx = i + 1;
        let mut paragraphs = 0;
        let window_end = (i + LOOKAHEAD_LINES).min(lines.len());
        for (j, candidate) in lines.iter().enumerate().take(window_end).skip(i + 1) {
            let trimmed = candidate.trim();
            if trimmed.is_empty() || candidate.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('-') || trimmed.starts_with('*') {
                continue;
            }
            paragraphs += 1;
            if paragraphs >= 2 {
                insert_idx = j + 1;
                break;
            }
        }

        let mut offset = join_len(&lines, insert_idx);
        if insert_idx < lines.len() {
            offset += 1;
        }
        return Some(offset);
    }

    None
}

/// Tier 2: find `needle` anywhere in the document (case-insensitive) and
/// insert past the next paragraph break.
fn find_after_match(text: &str, needle: &str) -> Option<usize> {
    let re = Regex::new(&format!("(?i){}", regex::escape(needle))).ok()?;
    let m = re.find(text)?;
    Some(after_paragraph_break(text, m.end()))
}

/// Tier 3: fall back to individual hint words longer than 4 characters,
/// in their original order.
fn find_by_keywords(text: &str, hint: &str) -> Option<usize> {
    for word in hint.split(|c: char| !c.is_alphanumeric()) {
        if word.len() <= 4 {
            continue;
        }
        let re = Regex::new(&format!("(?i){}", regex::escape(word))).ok()?;
        if let Some(m) = re.find(text) {
            return Some(after_paragraph_break(text, m.end()));
        }
    }
    None
}

/// Offset just past the next blank line after `from`, or `from` itself when
/// the document has no further paragraph break.
fn after_paragraph_break(text: &str, from: usize) -> usize {
    match text[from..].find("\n\n") {
        Some(pos) => from + pos + 2,
        None => from,
    }
}

/// Count of leading `#` marks.
fn heading_level(line: &str) -> usize {
    line.chars().take_while(|&c| c == '#').count()
}

/// Byte length of the first `n` lines joined by `\n` (no trailing newline).
fn join_len(lines: &[&str], n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    lines[..n].iter().map(|l| l.len()).sum::<usize>() + n - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_candidate_quoted() {
        assert_eq!(section_candidate("After 'Intro' section"), "Intro");
        assert_eq!(section_candidate(r#"After "The Big Idea" section"#), "The Big Idea");
    }

    #[test]
    fn test_section_candidate_unquoted() {
        assert_eq!(section_candidate("After Overview section"), "Overview");
        assert_eq!(section_candidate("Overview"), "Overview");
        assert_eq!(section_candidate(""), "");
    }

    #[test]
    fn test_insert_before_next_heading() {
        let text = "# Intro\ntext\n\n# Risks\nbody\n";
        let offset = find_insertion_point(text, "After 'Intro' section").unwrap();
        // End of the Intro section: just after `text\n`, before the blank
        // line preceding `# Risks`
        assert_eq!(offset, 13);
        assert_eq!(&text[..offset], "# Intro\ntext\n");
        assert!(text[offset..].starts_with("\n# Risks"));
    }

    #[test]
    fn test_insert_before_same_level_heading_nested() {
        let text = "## Setup\nline\n\n### Detail\nmore\n\n## Next\nend\n";
        let offset = find_insertion_point(text, "After 'Setup' section").unwrap();
        // `### Detail` is deeper and does not bound the section; `## Next` does
        assert!(text[offset..].starts_with("\n## Next"));
    }

    #[test]
    fn test_paragraph_fallback_without_bounding_heading() {
        let text = "# Only\npara one\npara two\npara three\n";
        let offset = find_insertion_point(text, "After 'Only' section").unwrap();
        // After the second paragraph line
        assert_eq!(&text[..offset], "# Only\npara one\npara two\n");
    }

    #[test]
    fn test_paragraph_fallback_skips_lists() {
        let text = "# Only\n- item\n* item\npara one\npara two\ntail\n";
        let offset = find_insertion_point(text, "After 'Only' section").unwrap();
        assert_eq!(&text[..offset], "# Only\n- item\n* item\npara one\npara two\n");
    }

    #[test]
    fn test_heading_at_document_end() {
        // Fewer than two paragraph lines: insert right after the heading
        let text = "intro\n\n# Last";
        let offset = find_insertion_point(text, "After 'Last' section").unwrap();
        assert_eq!(offset, text.len());
    }

    #[test]
    fn test_textual_fallback() {
        let text = "no headings here, just the architectural overview.\n\nnext paragraph\n";
        let offset = find_insertion_point(text, "'architectural overview'").unwrap();
        // Two characters past the blank line after the match
        let expected = text.find("\n\n").unwrap() + 2;
        assert_eq!(offset, expected);
    }

    #[test]
    fn test_textual_fallback_no_blank_line() {
        let text = "mentions liquidity at the very end";
        let offset = find_insertion_point(text, "'liquidity'").unwrap();
        assert_eq!(offset, text.find("liquidity").unwrap() + "liquidity".len());
    }

    #[test]
    fn test_keyword_fallback() {
        let text = "# A\nshort\n\nthe collateral requirements are strict\n\nend\n";
        let offset = find_insertion_point(text, "near collateral info").unwrap();
        let match_end = text.find("collateral").unwrap() + "collateral".len();
        let expected = match_end + text[match_end..].find("\n\n").unwrap() + 2;
        assert_eq!(offset, expected);
    }

    #[test]
    fn test_keyword_fallback_ignores_short_words() {
        // All words <= 4 chars never match
        let text = "# A\nbody text\n";
        assert_eq!(find_insertion_point(text, "at the top"), None);
    }

    #[test]
    fn test_no_match_returns_none() {
        let text = "# Alpha\ncontent\n";
        assert_eq!(find_insertion_point(text, "After 'Missing' nothing-here"), None);
    }

    #[test]
    fn test_empty_hint_returns_none() {
        assert_eq!(find_insertion_point("# A\nbody\n", ""), None);
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let text = "# INTRO\ntext\n\n# Risks\nbody\n";
        let offset = find_insertion_point(text, "After 'intro' section").unwrap();
        assert!(text[offset..].starts_with("\n# Risks"));
    }

    #[test]
    fn test_textual_fallback_folds_non_ascii_case() {
        let text = "the Übersicht paragraph ends here.\n\nnext\n";
        let offset = find_insertion_point(text, "'übersicht'").unwrap();
        let expected = text.find("\n\n").unwrap() + 2;
        assert_eq!(offset, expected);
    }

    #[test]
    fn test_offsets_are_char_boundaries() {
        let text = "# Über\ntext één\ntwéé\nmore\n\n# Next\n";
        let offset = find_insertion_point(text, "After 'Über' section").unwrap();
        assert!(text.is_char_boundary(offset));
    }
}
