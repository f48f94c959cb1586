//! Bucket command: ensure a storage bucket exists.

use anyhow::Result;

use crate::cli::BucketArgs;
use crate::config::Config;
use crate::log;
use crate::store::{GcsStore, ObjectStore};

pub fn run(config: &Config, args: &BucketArgs) -> Result<()> {
    let name = match &args.name {
        Some(name) => name.as_str(),
        None if args.images => config.store.bucket_for_images(),
        None => &config.store.media_bucket,
    };
    if name.is_empty() {
        anyhow::bail!("no bucket name given and none configured");
    }
    let location = args
        .location
        .as_deref()
        .unwrap_or(&config.store.location);

    let store = GcsStore::connect(&config.store.project, &config.store.credentials)?;

    if store.bucket_exists(name)? {
        log!("bucket"; "'{}' already exists", name);
        return Ok(());
    }

    store.create_bucket(name, location)?;
    log!("bucket"; "created '{}' in {}", name, location);
    log!("bucket"; "grant public read access before publishing links to it");
    Ok(())
}
