//! `[store]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [store]
//! project = "course-media-prod"       # Cloud project id
//! media_bucket = "course-media"       # Audio/video bucket
//! image_bucket = "course-images"      # Infographics bucket
//! location = "us-central1"            # Bucket location for creation
//! credentials = "Keys/google-service-account.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};

/// Object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Cloud project id owning the buckets.
    pub project: String,

    /// Bucket for audio and video files.
    pub media_bucket: String,

    /// Bucket for infographic images.
    pub image_bucket: String,

    /// Location used when creating new buckets.
    pub location: String,

    /// Service-account key file. Tilde-expanded; relative paths resolve
    /// against the project root.
    pub credentials: PathBuf,

    /// Public host referenced URLs point at.
    pub host: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            media_bucket: String::new(),
            image_bucket: String::new(),
            location: "us-central1".to_string(),
            credentials: PathBuf::from("Keys/google-service-account.json"),
            host: "https://storage.googleapis.com".to_string(),
        }
    }
}

impl StoreConfig {
    pub const PROJECT: FieldPath = FieldPath::new("store.project");
    pub const MEDIA_BUCKET: FieldPath = FieldPath::new("store.media_bucket");
    pub const IMAGE_BUCKET: FieldPath = FieldPath::new("store.image_bucket");
    pub const CREDENTIALS: FieldPath = FieldPath::new("store.credentials");
    pub const HOST: FieldPath = FieldPath::new("store.host");

    /// Bucket used for a media kind: images get their own bucket, falling
    /// back to the media bucket when none is configured.
    pub fn bucket_for_images(&self) -> &str {
        if self.image_bucket.is_empty() {
            &self.media_bucket
        } else {
            &self.image_bucket
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.media_bucket.is_empty() {
            diag.error_with_hint(
                Self::MEDIA_BUCKET,
                "required",
                "set the bucket name, e.g. media_bucket = \"course-media\"",
            );
        }
        if url::Url::parse(&self.host).is_err() {
            diag.error(Self::HOST, format!("not a valid URL: {}", self.host));
        }
    }

    /// Extra requirements for commands that talk to the store API.
    pub fn validate_for_api(&self, diag: &mut ConfigDiagnostics) {
        if self.project.is_empty() {
            diag.error(Self::PROJECT, "required for store operations");
        }
        if !self.credentials.exists() {
            diag.error_with_hint(
                Self::CREDENTIALS,
                format!("key file not found: {}", self.credentials.display()),
                "download a service-account key and point `credentials` at it",
            );
        }
    }
}
