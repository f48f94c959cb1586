//! `[content]` section configuration.
//!
//! Describes where course content and media live on disk, and the naming
//! conventions that bind them together.
//!
//! # Example
//!
//! ```toml
//! [content]
//! lessons = "content/lessons"       # Lesson markdown directory
//! exercises = "content/exercises"   # Exercise markdown directory
//! audio = "media/audio"             # Recorded lesson audio
//! videos = "media/videos"           # Screen recordings
//! images = "media/images"           # Exported infographics
//! manifest = "assets/asset_manifest.json"
//! unit_prefix = "lesson"            # Filename prefix carrying the number
//! exercise_prefix = "exercise"
//! audio_ext = "m4a"
//! video_ext = "mp4"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};

/// Content layout and naming conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Lesson markdown directory.
    pub lessons: PathBuf,

    /// Exercise markdown directory.
    pub exercises: PathBuf,

    /// Recorded audio directory.
    pub audio: PathBuf,

    /// Video recordings directory.
    pub videos: PathBuf,

    /// Exported infographic images directory.
    pub images: PathBuf,

    /// Asset manifest JSON path.
    pub manifest: PathBuf,

    /// Filename prefix carrying the lesson number (`lesson1 intro.m4a`).
    pub unit_prefix: String,

    /// Filename prefix carrying the exercise number.
    pub exercise_prefix: String,

    /// Audio file extension (no leading dot).
    pub audio_ext: String,

    /// Video file extension (no leading dot).
    pub video_ext: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            lessons: PathBuf::from("content/lessons"),
            exercises: PathBuf::from("content/exercises"),
            audio: PathBuf::from("media/audio"),
            videos: PathBuf::from("media/videos"),
            images: PathBuf::from("media/images"),
            manifest: PathBuf::from("assets/asset_manifest.json"),
            unit_prefix: "lesson".to_string(),
            exercise_prefix: "exercise".to_string(),
            audio_ext: "m4a".to_string(),
            video_ext: "mp4".to_string(),
        }
    }
}

impl ContentConfig {
    pub const UNIT_PREFIX: FieldPath = FieldPath::new("content.unit_prefix");
    pub const EXERCISE_PREFIX: FieldPath = FieldPath::new("content.exercise_prefix");
    pub const AUDIO_EXT: FieldPath = FieldPath::new("content.audio_ext");
    pub const VIDEO_EXT: FieldPath = FieldPath::new("content.video_ext");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.unit_prefix.is_empty() {
            diag.error(Self::UNIT_PREFIX, "must not be empty");
        }
        if self.exercise_prefix.is_empty() {
            diag.error(Self::EXERCISE_PREFIX, "must not be empty");
        }
        Self::validate_ext(Self::AUDIO_EXT, &self.audio_ext, diag);
        Self::validate_ext(Self::VIDEO_EXT, &self.video_ext, diag);
    }

    fn validate_ext(field: FieldPath, ext: &str, diag: &mut ConfigDiagnostics) {
        if ext.is_empty() {
            diag.error(field, "must not be empty");
        } else if ext.starts_with('.') {
            diag.error_with_hint(
                field,
                "must not include the leading dot",
                format!("use \"{}\"", ext.trim_start_matches('.')),
            );
        }
    }
}
