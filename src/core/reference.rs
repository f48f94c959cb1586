//! Canonical asset reference forms and detection.
//!
//! Images are referenced with standard markdown syntax, audio and video
//! with the gitbook embed directive. Emitted references must round-trip:
//! the detection regexes here re-identify anything [`canonical`] produced.

use std::path::Path;

use regex::Regex;

use crate::utils::mime;

/// Media categories that get distinct markdown syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Other,
}

impl MediaKind {
    /// Classify from a MIME type string.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime::is_image(mime_type) {
            Self::Image
        } else if mime::is_audio(mime_type) {
            Self::Audio
        } else if mime::is_video(mime_type) {
            Self::Video
        } else {
            Self::Other
        }
    }

    /// Classify from a file extension.
    pub fn from_path(path: &Path) -> Self {
        Self::from_mime(mime::from_path(path))
    }

    /// Object-store folder this kind is organized under.
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Other => "files",
        }
    }
}

/// Canonical markdown for a reference.
///
/// Images render as `![title](url)`, audio/video as an embed directive
/// carrying the URL as its sole attribute, anything else as a plain link.
pub fn canonical(kind: MediaKind, title: &str, url: &str) -> String {
    match kind {
        MediaKind::Image => format!("![{title}]({url})"),
        MediaKind::Audio | MediaKind::Video => embed_directive(url),
        MediaKind::Other => format!("[{title}]({url})"),
    }
}

/// Gitbook embed directive for a media URL.
pub fn embed_directive(url: &str) -> String {
    format!("{{% embed url=\"{url}\" %}}")
}

/// Regex matching an existing markdown image reference whose URL carries
/// `asset_id`.
///
/// The URL is either absolute (any object-store host) or a legacy local
/// `images/` path. Surrounding syntax matches case-insensitively; the id
/// itself is exact-case.
pub fn existing_reference(asset_id: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)!\[[^\]]*\]\(((?:https?://[^/()\s]+/|images/)[^)]*?(?-i:{id})[^)]*?)\)"#,
        id = regex::escape(asset_id)
    ))
    .unwrap()
}

/// Regex matching an existing embed directive whose URL carries `asset_id`.
pub fn existing_embed(asset_id: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)\{{%\s*embed url="([^"]*?(?-i:{id})[^"]*?)"\s*%\}}"#,
        id = regex::escape(asset_id)
    ))
    .unwrap()
}

/// True if the document already opens with embed directives.
///
/// Only the first two lines are checked: freshly published lessons carry
/// the audio/video block at the very top.
pub fn has_leading_embeds(text: &str) -> bool {
    text.lines().take(2).any(|line| line.contains("{% embed"))
}

/// Join freshly inserted embed directives into the block prepended to a
/// lesson: one blank line between directives, one blank line before the
/// remaining content. The spacing is load-bearing for the downstream
/// renderer and must be preserved byte-for-byte.
pub fn embed_block(directives: &[String]) -> String {
    if directives.is_empty() {
        return String::new();
    }
    format!("{}\n\n", directives.join("\n\n"))
}
