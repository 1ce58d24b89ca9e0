use std::{io, path::PathBuf};
use thiserror::Error;

pub type AssetResult<T> = Result<T, AssetError>;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read image '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write image '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Cannot tell which image format to write for '{}'", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Source path '{}' has no file name", .0.display())]
    MissingFileName(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}
