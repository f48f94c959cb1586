//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Medialink course media publishing CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: medialink.toml)
    #[arg(short = 'C', long, default_value = "medialink.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Override the media bucket from config
    #[arg(short, long, global = true)]
    pub bucket: Option<String>,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Reconcile manifest assets against lesson/exercise documents
    #[command(visible_alias = "r")]
    Reconcile {
        #[command(flatten)]
        args: ReconcileArgs,
    },

    /// Prepend audio/video embed blocks to lesson documents
    #[command(visible_alias = "e")]
    Embed {
        #[command(flatten)]
        args: EmbedArgs,
    },

    /// Repair embed spacing and double-encoded URLs in documents
    #[command(visible_alias = "f")]
    Fix {
        #[command(flatten)]
        args: FixArgs,
    },

    /// Upload media files to the object store
    #[command(visible_alias = "u")]
    Upload {
        #[command(flatten)]
        args: UploadArgs,
    },

    /// Ensure a bucket exists, creating it if needed
    Bucket {
        #[command(flatten)]
        args: BucketArgs,
    },
}

/// Reconcile command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ReconcileArgs {
    /// Restrict to one lesson number (e.g., 3)
    #[arg(short, long, conflicts_with = "exercise")]
    pub lesson: Option<u32>,

    /// Restrict to one exercise number
    #[arg(short, long)]
    pub exercise: Option<u32>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Embed command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct EmbedArgs {
    /// Lesson files or directories. If omitted, processes all lessons.
    /// Use `-` to read paths from stdin.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Fix command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct FixArgs {
    /// Files or directories to repair. If omitted, processes all content.
    /// Use `-` to read paths from stdin.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Normalize blank lines around embed directives
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub spacing: Option<bool>,

    /// Re-encode store URLs, collapsing double percent-encoding
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub encoding: Option<bool>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Upload command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct UploadArgs {
    /// Media files to upload. If omitted with --all, uploads everything.
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    /// Upload all audio/video found in the media directories
    #[arg(short, long)]
    pub all: bool,

    /// Upload infographic images instead of audio/video
    #[arg(short, long)]
    pub images: bool,

    /// List what would be uploaded without sending anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Bucket command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BucketArgs {
    /// Bucket name. Defaults to the configured media bucket.
    pub name: Option<String>,

    /// Bucket location (overrides config)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Operate on the configured image bucket instead
    #[arg(short, long)]
    pub images: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_lesson_and_exercise_conflict() {
        let result = Cli::try_parse_from(["medialink", "reconcile", "-l", "1", "-e", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reconcile_single_filter_parses() {
        let cli = Cli::try_parse_from(["medialink", "reconcile", "-l", "3"]).unwrap();
        let Commands::Reconcile { args } = cli.command else {
            panic!("expected reconcile");
        };
        assert_eq!(args.lesson, Some(3));
        assert_eq!(args.exercise, None);
    }
}

#[allow(unused)]
impl Cli {
    pub const fn is_reconcile(&self) -> bool {
        matches!(self.command, Commands::Reconcile { .. })
    }
    pub const fn is_embed(&self) -> bool {
        matches!(self.command, Commands::Embed { .. })
    }
    pub const fn is_fix(&self) -> bool {
        matches!(self.command, Commands::Fix { .. })
    }
    pub const fn is_upload(&self) -> bool {
        matches!(self.command, Commands::Upload { .. })
    }
    pub const fn is_bucket(&self) -> bool {
        matches!(self.command, Commands::Bucket { .. })
    }
}
