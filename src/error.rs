//! Error types for icon generation and manifest patching

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Rejected icon configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No icon sizes configured")]
    NoSizes,

    #[error("Icon size must be greater than zero")]
    ZeroSize,

    #[error("Icon size {0} is listed more than once")]
    DuplicateSize(u32),
}

/// Failure to produce one icon file
#[derive(Debug, Error)]
pub enum IconError {
    #[error("Can't create icons directory {}: {source}", path.display())]
    IconsDir {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load, patch, or save the manifest document
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest root must be a JSON object")]
    NotAnObject,

    #[error("Manifest has no \"{0}\" object; add one before registering icons")]
    MissingSection(String),

    #[error("Manifest \"{0}\" must be a JSON object")]
    SectionNotObject(String),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
