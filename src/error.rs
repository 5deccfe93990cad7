use std::path::PathBuf;

use thiserror::Error;

/// Why a raw sample could not be turned into a network input.
///
/// During training these are absorbed per sample (the sample is skipped);
/// during prediction they propagate to the caller.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("sample is empty")]
    Empty,

    #[error("sample has {actual} values, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("sample value at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors surfaced by network construction, training and prediction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("invalid topology: {0}")]
    Topology(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("data location not found: {}", path.display())]
    MissingData { path: PathBuf },

    #[error("sample source is empty")]
    NoSamples,

    #[error("epoch {epoch} produced no usable samples")]
    NoUsableSamples { epoch: usize },

    #[error("`{attempted}` called on a layer using the {rule} update rule")]
    UpdateRuleMismatch {
        rule: &'static str,
        attempted: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
