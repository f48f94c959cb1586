//! Common utilities shared across CLI commands.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::utils::path::resolve_path;

/// Collect markdown files based on CLI paths.
///
/// With no paths, walks the default directories. A single `-` reads paths
/// from stdin (one per line). Relative paths resolve against cwd first,
/// then against the first default directory.
pub fn collect_markdown_files(paths: &[PathBuf], default_dirs: &[&Path]) -> Result<Vec<PathBuf>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    if paths.is_empty() {
        // No paths specified: collect everything under the default dirs
        let mut all_files = Vec::new();
        for dir in default_dirs {
            all_files.extend(walk_files(dir, is_markdown));
        }
        return Ok(all_files);
    }

    let fallback = default_dirs.first().copied().unwrap_or(Path::new("."));

    let mut all_files = Vec::new();
    for path in &paths {
        let resolved = resolve_path(path, fallback);

        if resolved.is_file() {
            if is_markdown(&resolved) {
                all_files.push(resolved);
            } else {
                anyhow::bail!("Not a markdown file: {}", path.display());
            }
        } else if resolved.is_dir() {
            all_files.extend(walk_files(&resolved, is_markdown));
        } else {
            anyhow::bail!(
                "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                path.display(),
                path.display(),
                fallback.join(path).display()
            );
        }
    }

    Ok(all_files)
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

/// Walk a directory recursively, returning matching files in sorted order.
pub fn walk_files(dir: &Path, filter: fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = jwalk::WalkDir::new(dir)
        .skip_hidden(true)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| filter(path))
        .collect();
    files.sort();
    files
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
