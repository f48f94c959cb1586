//! Reconciliation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::core::Outcome;
use crate::utils::plural::plural_s;

/// A single per-asset report entry
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Asset id the entry is about.
    pub asset_id: String,
    /// What happened, human-readable.
    pub detail: String,
}

/// Reconciliation report, grouped by document
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Applied (or would-apply) changes, grouped by document.
    pub changes: BTreeMap<String, Vec<ReportEntry>>,
    /// Failures (missing images, failed insertions, write errors).
    pub failures: BTreeMap<String, Vec<ReportEntry>>,

    pub replaced: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub would_insert: usize,
}

impl ReconcileReport {
    /// Record an outcome for one (document, asset) pair.
    pub fn add_outcome(&mut self, document: &str, asset_id: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Replaced => {
                self.replaced += 1;
                self.add_change(document, asset_id, "replaced stale reference");
            }
            Outcome::Skipped => self.skipped += 1,
            Outcome::Inserted { offset } => {
                self.inserted += 1;
                self.add_change(document, asset_id, format!("inserted at byte {offset}"));
            }
            Outcome::WouldInsert { offset } => {
                self.would_insert += 1;
                self.add_change(document, asset_id, format!("would insert at byte {offset}"));
            }
            Outcome::InsertionFailed => {
                self.add_failure(document, asset_id, "placement hint matched nothing");
            }
        }
    }

    pub fn add_change(&mut self, document: &str, asset_id: &str, detail: impl Into<String>) {
        self.changes
            .entry(document.to_string())
            .or_default()
            .push(ReportEntry {
                asset_id: asset_id.to_string(),
                detail: detail.into(),
            });
    }

    pub fn add_failure(&mut self, document: &str, asset_id: &str, detail: impl Into<String>) {
        self.failures
            .entry(document.to_string())
            .or_default()
            .push(ReportEntry {
                asset_id: asset_id.to_string(),
                detail: detail.into(),
            });
    }

    pub fn failure_count(&self) -> usize {
        self.failures.values().map(|v| v.len()).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Print the full report to stderr (changes -> failures).
    pub fn print(&self) {
        Self::print_section("changes", &self.changes, false);
        Self::print_section("failures", &self.failures, true);
    }

    fn print_section(name: &str, entries: &BTreeMap<String, Vec<ReportEntry>>, failed: bool) {
        if entries.is_empty() {
            return;
        }
        eprintln!();

        let file_count = entries.len();
        let entry_count: usize = entries.values().map(|v| v.len()).sum();

        // Section header
        let header = if failed {
            name.red().bold().to_string()
        } else {
            name.green().bold().to_string()
        };
        eprintln!(
            "{} {}",
            header,
            format!(
                "({file_count} file{}, {entry_count} entr{})",
                plural_s(file_count),
                if entry_count == 1 { "y" } else { "ies" }
            )
            .dimmed()
        );

        for (path, errs) in entries {
            // Document path
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for e in errs {
                let arrow = if failed {
                    "→".red().to_string()
                } else {
                    "→".green().to_string()
                };
                eprintln!("{} {} {}", arrow, e.asset_id, e.detail.dimmed());
            }
        }
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failures = self.failure_count();
        if failures > 0 {
            return write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                failures.to_string().red().bold(),
                format!("failure{}", plural_s(failures)).dimmed()
            );
        }

        write!(
            f,
            "{} replaced, {} inserted, {} skipped",
            self.replaced, self.inserted, self.skipped
        )?;
        if self.would_insert > 0 {
            write!(f, ", {} pending (dry run)", self.would_insert)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_are_counted() {
        let mut report = ReconcileReport::default();
        report.add_outcome("a.md", "x1", &Outcome::Replaced);
        report.add_outcome("a.md", "x2", &Outcome::Inserted { offset: 10 });
        report.add_outcome("b.md", "x3", &Outcome::Skipped);
        report.add_outcome("b.md", "x4", &Outcome::InsertionFailed);

        assert_eq!(report.replaced, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failure_count(), 1);
        assert!(report.has_failures());
        // Skipped outcomes don't clutter the change list
        assert_eq!(report.changes["a.md"].len(), 2);
        assert!(!report.changes.contains_key("b.md"));
    }

    #[test]
    fn test_clean_report() {
        let mut report = ReconcileReport::default();
        report.add_outcome("a.md", "x1", &Outcome::Skipped);
        assert!(!report.has_failures());
        assert_eq!(report.failure_count(), 0);
    }
}
