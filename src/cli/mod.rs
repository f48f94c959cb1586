//! Command-line interface module.

mod args;
pub mod bucket;
pub mod common;
pub mod embed;
pub mod fix;
pub mod reconcile;
pub mod upload;

pub use args::{BucketArgs, Cli, Commands, EmbedArgs, FixArgs, ReconcileArgs, UploadArgs};
