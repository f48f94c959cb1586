//! Object store abstraction.
//!
//! Keys are kept decoded internally (`audio/lesson1 intro.m4a`) and
//! percent-encoded at the two boundaries where they leave the program:
//! public URLs and API requests. Encoding is segment-wise so `/` keeps
//! separating folders.

use std::io;
use std::path::PathBuf;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

pub mod gcs;

pub use gcs::GcsStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {0}")]
    Io(PathBuf, #[source] io::Error),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("failed to sign auth token")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("store api returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Storage backend seam. One production implementation ([`GcsStore`]);
/// tests substitute their own.
pub trait ObjectStore {
    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// Create a bucket with uniform bucket-level access enabled.
    fn create_bucket(&self, bucket: &str, location: &str) -> Result<(), StoreError>;

    /// Upload an object under a decoded key, replacing any existing one.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// Characters left bare inside an encoded key segment (RFC 3986 unreserved).
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one key segment.
///
/// Decodes first so an already-encoded segment comes out identical instead
/// of double-encoded (`%20` stays `%20`, never becomes `%2520`).
pub fn encode_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    utf8_percent_encode(&decoded, KEY_SEGMENT).to_string()
}

/// Percent-encode a full object key, preserving `/` separators.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a key back to its human-readable form.
pub fn decode_key(key: &str) -> String {
    percent_decode_str(key)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| key.to_string())
}

/// Public URL for an object: `{host}/{bucket}/{encoded key}`.
pub fn public_url(host: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", host.trim_end_matches('/'), bucket, encode_key(key))
}
