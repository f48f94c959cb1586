//! MIME type detection for uploaded media.
//!
//! Content-Type headers sent to the object store come from here, and the
//! media kind classification (image / audio / video) is derived from the
//! detected type.

#![allow(dead_code)]

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";

    // Audio
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const FLAC: &str = "audio/flac";
    pub const AAC: &str = "audio/aac";
    pub const MP4_AUDIO: &str = "audio/mp4";

    // Video
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";
    pub const OGG_VIDEO: &str = "video/ogg";
    pub const MOV: &str = "video/quicktime";

    // Documents
    pub const PDF: &str = "application/pdf";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JSON: &str = "application/json";

    // Binary fallback
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from file extension.
///
/// Returns a full MIME type string suitable for an HTTP Content-Type header.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess MIME type from file extension string, case-insensitively.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    let lower = ext.map(str::to_ascii_lowercase);
    match lower.as_deref() {
        // Images
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("svg") => types::SVG,

        // Audio
        Some("mp3") => types::MP3,
        Some("wav") => types::WAV,
        Some("ogg" | "oga") => types::OGG_AUDIO,
        Some("flac") => types::FLAC,
        Some("aac") => types::AAC,
        Some("m4a") => types::MP4_AUDIO,

        // Video
        Some("mp4" | "m4v") => types::MP4,
        Some("webm") => types::WEBM,
        Some("ogv") => types::OGG_VIDEO,
        Some("mov") => types::MOV,

        // Documents
        Some("pdf") => types::PDF,
        Some("md") => types::MARKDOWN,
        Some("txt") => types::PLAIN,
        Some("json") => types::JSON,

        _ => types::OCTET_STREAM,
    }
}

/// Check if the MIME type represents an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Check if the MIME type represents audio.
pub fn is_audio(mime: &str) -> bool {
    mime.starts_with("audio/")
}

/// Check if the MIME type represents video.
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}
