use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrunchError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid value `{raw}` for option `{flag}`")]
    InvalidOptionValue { flag: String, raw: String },

    #[error("failed to read `{path}`: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode PNG `{path}`: {source}")]
    PngDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode PNG `{path}`: {source}")]
    PngEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("bitmap `{0}` does not fit on any page")]
    PackingImpossible(String),
}

pub type Result<T> = std::result::Result<T, CrunchError>;
