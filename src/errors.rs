use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VimsError>;

/// Errors raised while reading or interpreting VIMS data.
#[derive(Debug, Error)]
pub enum VimsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid PVL label (line {line}): {message}")]
    Pvl { line: usize, message: String },

    #[error("missing key `{0}` in label")]
    MissingKey(String),

    #[error("unexpected value type for key `{0}`")]
    WrongType(String),

    #[error("file `{0}` is not a valid QUB")]
    NotAQub(PathBuf),

    #[error("file `{0}` is not in ISIS format")]
    NotIsis(PathBuf),

    #[error("unsupported cube layout: {0}")]
    UnsupportedLayout(String),

    #[error("file name `{0}` does not match the image ID pattern")]
    InvalidImgId(String),

    #[error("invalid time pattern `{0}`")]
    InvalidTime(String),

    #[error("{name} number `{value}` out of range 1..={max}")]
    IndexOutOfRange {
        name: &'static str,
        value: i64,
        max: usize,
    },

    #[error("invalid angle: {0}")]
    InvalidAngle(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid spectra dimensions: {0}")]
    InvalidSpectra(String),

    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL `{0}`")]
    InvalidUrl(String),

    #[error("file `{0}` already exists (enable overwrite to replace it)")]
    FileExists(PathBuf),

    #[error("MD5 checksum `{computed}` does not match the expected value `{expected}`")]
    ChecksumMismatch { computed: String, expected: String },
}
