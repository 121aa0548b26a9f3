//! Error types for each layer of the gallery

use std::path::PathBuf;
use thiserror::Error;

/// Rejections from the gallery controller.
///
/// These never corrupt state: the controller is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    #[error("no card with id {0} in the gallery")]
    UnknownCard(i64),

    #[error("card {id} is hidden by the active filter \"{filter}\"")]
    CardNotVisible { id: i64, filter: String },
}

/// Catalog database, import and manifest errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine the user data directory")]
    NoDataDir,

    #[error("background task failed: {0}")]
    Task(String),
}

/// Configuration loading and command-line errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("invalid arguments: {0}")]
    Args(#[from] pico_args::Error),
}

/// Thumbnail generation errors
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("could not determine the user cache directory")]
    NoCacheDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
