//! Batch configuration file.
//!
//! A [`BatchFile`] carries optional global overrides for the effective
//! configuration and the list of images to generate.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "brand_text": "Steps · getsteps.app",
//!   "font_dir": "/path/to/BricolageGrotesque/static",
//!   "accent_color": "#ED772F",
//!   "items": [
//!     { "filename": "tool.png", "title": "Tool Name", "emoji": "🔥", "description": "Short desc" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OgError, OgResult};

// ============================================================================
// ImageItem
// ============================================================================

/// One image to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Output filename, joined verbatim onto the output directory.
    pub filename: String,
    pub title: String,
    /// A single emoji glyph shown in the badge.
    pub emoji: String,
    pub description: String,
}

impl ImageItem {
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        emoji: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            emoji: emoji.into(),
            description: description.into(),
        }
    }
}

// ============================================================================
// BatchFile
// ============================================================================

/// Deserialized batch configuration.
///
/// Every override is optional; only present keys replace the resolved value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_text: Option<String>,

    /// Hex accent color, e.g. `#ED772F`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,

    /// Hex background color, e.g. `#1A1A1A`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,

    /// Path to a color-emoji font replacing the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_font: Option<PathBuf>,

    #[serde(default)]
    pub items: Vec<ImageItem>,
}

impl BatchFile {
    /// Deserializes a batch file from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a batch file from disk.
    pub fn load(path: &Path) -> OgResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| OgError::io(path, e))?;
        Self::from_json(&json).map_err(|source| OgError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file_parses() {
        let json = r##"{
            "font_dir": "/fonts/static",
            "brand_text": "Acme · acme.dev",
            "accent_color": "#00FF00",
            "bg_color": "000000",
            "items": [
                {"filename": "a.png", "title": "A", "emoji": "🔥", "description": "first"},
                {"filename": "b.png", "title": "B", "emoji": "🎯", "description": "second"}
            ]
        }"##;

        let batch = BatchFile::from_json(json).unwrap();
        assert_eq!(batch.font_dir.as_deref(), Some(Path::new("/fonts/static")));
        assert_eq!(batch.brand_text.as_deref(), Some("Acme · acme.dev"));
        assert_eq!(batch.accent_color.as_deref(), Some("#00FF00"));
        assert_eq!(batch.bg_color.as_deref(), Some("000000"));
        assert!(batch.emoji_font.is_none());
        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.items[1], ImageItem::new("b.png", "B", "🎯", "second"));
    }

    #[test]
    fn empty_object_has_no_items() {
        let batch = BatchFile::from_json("{}").unwrap();
        assert_eq!(batch, BatchFile::default());
        assert!(batch.items.is_empty());
    }

    #[test]
    fn item_fields_are_required() {
        let json = r#"{"items": [{"filename": "a.png", "title": "A"}]}"#;
        assert!(BatchFile::from_json(json).is_err());
    }

    #[test]
    fn absent_overrides_are_not_serialized() {
        let batch = BatchFile {
            brand_text: Some("x".into()),
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&batch).unwrap();
        assert!(json.contains("\"brand_text\""));
        assert!(!json.contains("font_dir"));
        assert_eq!(BatchFile::from_json(&json).unwrap(), batch);
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        match BatchFile::load(&path) {
            Err(OgError::ConfigParse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BatchFile::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, OgError::Io { .. }));
    }
}
