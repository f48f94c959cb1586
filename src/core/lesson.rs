//! Unit numbering conventions.
//!
//! Content units (lessons, exercises) are numbered, and media filenames
//! carry that number in loosely standardized forms: `lesson1 intro.m4a`,
//! `Lesson01_walkthrough.mp4`, `lesson-03-margin.md`. This module turns
//! those forms into numbers and back into canonical slugs.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

/// Extract the unit number from a file name.
///
/// Matches `<prefix><digits>` with an optional hyphen between, anywhere in
/// the name, case-insensitively: `lesson1`, `Lesson01`, `lesson-3` all
/// yield their number for prefix `lesson`.
pub fn extract_number(name: &str, prefix: &str) -> Option<u32> {
    let re = Regex::new(&format!(r"(?i){}-?(\d+)", regex::escape(prefix))).ok()?;
    re.captures(name)?[1].parse().ok()
}

/// Canonical zero-padded slug for a unit: `lesson` + 3 -> `lesson-03`.
pub fn slug(prefix: &str, number: u32) -> String {
    format!("{prefix}-{number:02}")
}

/// Manifest key form for a unit: `lesson` + 3 -> `lesson_03`.
pub fn manifest_key(prefix: &str, number: u32) -> String {
    format!("{prefix}_{number:02}")
}

/// Find the media file for a unit in `dir`.
///
/// Recorded media is named by hand, so both padded and unpadded numbers
/// occur, separated from the rest of the name by a space or underscore:
/// `lesson1 intro.m4a`, `lesson01_intro.m4a`. Candidates are matched
/// case-insensitively against the wanted extension and the first in sorted
/// order wins, keeping runs deterministic.
pub fn find_media_file(dir: &Path, prefix: &str, number: u32, ext: &str) -> Option<PathBuf> {
    let patterns = [
        format!("{prefix}{number} "),
        format!("{prefix}{number:02} "),
        format!("{prefix}{number}_"),
        format!("{prefix}{number:02}_"),
    ];
    let ext_lower = ext.to_lowercase();

    let mut matches: Vec<PathBuf> = read_sorted(dir)?
        .into_iter()
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            let name_lower = name.to_lowercase();
            name_lower.ends_with(&format!(".{ext_lower}"))
                && patterns.iter().any(|p| name_lower.starts_with(p))
        })
        .collect();

    if matches.is_empty() {
        None
    } else {
        matches.sort();
        matches.into_iter().next()
    }
}

/// Find the markdown document for a unit in `dir`.
///
/// Documents follow the canonical slug: `lesson-03-margin-calls.md` or
/// bare `lesson-03.md`.
pub fn find_unit_doc(dir: &Path, unit_slug: &str) -> Option<PathBuf> {
    let exact = format!("{unit_slug}.md");
    let prefixed = format!("{unit_slug}-");

    let mut matches: Vec<PathBuf> = read_sorted(dir)?
        .into_iter()
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            name == exact || (name.starts_with(&prefixed) && name.ends_with(".md"))
        })
        .collect();

    if matches.is_empty() {
        None
    } else {
        matches.sort();
        matches.into_iter().next()
    }
}

fn read_sorted(dir: &Path) -> Option<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).ok()?;
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    Some(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_extract_number_variants() {
        assert_eq!(extract_number("lesson1 intro.m4a", "lesson"), Some(1));
        assert_eq!(extract_number("Lesson01_walkthrough.mp4", "lesson"), Some(1));
        assert_eq!(extract_number("lesson-03-margin.md", "lesson"), Some(3));
        assert_eq!(extract_number("LESSON12.md", "lesson"), Some(12));
        assert_eq!(extract_number("exercise-02.md", "exercise"), Some(2));
    }

    #[test]
    fn test_extract_number_misses() {
        assert_eq!(extract_number("intro.m4a", "lesson"), None);
        assert_eq!(extract_number("lesson.md", "lesson"), None);
        assert_eq!(extract_number("lesson-one.md", "lesson"), None);
    }

    #[test]
    fn test_slugs() {
        assert_eq!(slug("lesson", 3), "lesson-03");
        assert_eq!(slug("lesson", 12), "lesson-12");
        assert_eq!(manifest_key("exercise", 1), "exercise_01");
    }

    #[test]
    fn test_find_media_file_unpadded_space() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson1 intro.m4a")).unwrap();
        File::create(dir.path().join("lesson2 other.m4a")).unwrap();
        let found = find_media_file(dir.path(), "lesson", 1, "m4a").unwrap();
        assert_eq!(found.file_name().unwrap(), "lesson1 intro.m4a");
    }

    #[test]
    fn test_find_media_file_padded_underscore() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("Lesson01_intro.M4A")).unwrap();
        let found = find_media_file(dir.path(), "lesson", 1, "m4a").unwrap();
        assert_eq!(found.file_name().unwrap(), "Lesson01_intro.M4A");
    }

    #[test]
    fn test_find_media_file_wrong_extension() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson1 intro.mp4")).unwrap();
        assert_eq!(find_media_file(dir.path(), "lesson", 1, "m4a"), None);
    }

    #[test]
    fn test_find_media_file_no_number_prefix_confusion() {
        // lesson11 must not match lesson 1
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson11 advanced.m4a")).unwrap();
        assert_eq!(find_media_file(dir.path(), "lesson", 1, "m4a"), None);
    }

    #[test]
    fn test_find_media_file_sorted_first_wins() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson1 b.m4a")).unwrap();
        File::create(dir.path().join("lesson1 a.m4a")).unwrap();
        let found = find_media_file(dir.path(), "lesson", 1, "m4a").unwrap();
        assert_eq!(found.file_name().unwrap(), "lesson1 a.m4a");
    }

    #[test]
    fn test_find_unit_doc() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson-03-margin-calls.md")).unwrap();
        File::create(dir.path().join("lesson-04-settlement.md")).unwrap();
        let found = find_unit_doc(dir.path(), "lesson-03").unwrap();
        assert_eq!(found.file_name().unwrap(), "lesson-03-margin-calls.md");
    }

    #[test]
    fn test_find_unit_doc_bare_slug() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson-03.md")).unwrap();
        let found = find_unit_doc(dir.path(), "lesson-03").unwrap();
        assert_eq!(found.file_name().unwrap(), "lesson-03.md");
    }

    #[test]
    fn test_find_unit_doc_ignores_longer_numbers() {
        // lesson-03 must not match lesson-030
        let dir = tempdir().unwrap();
        File::create(dir.path().join("lesson-030.md")).unwrap();
        assert_eq!(find_unit_doc(dir.path(), "lesson-03"), None);
    }
}
