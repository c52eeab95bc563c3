//! Error type shared by every stage of the renderer.

use std::path::{Path, PathBuf};

pub type OgResult<T> = Result<T, OgError>;

#[derive(thiserror::Error, Debug)]
pub enum OgError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("invalid color format: {0:?} (expected 6 hex digits, optionally prefixed with '#')")]
    InvalidColorFormat(String),

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load font {}: {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    #[error("emoji font unavailable: {0}")]
    EmojiFontUnavailable(String),

    #[error("filesystem error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("svg render error: {0}")]
    Svg(String),
}

impl OgError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn font_load(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::FontLoad {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
