use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported detection strategy: {0}. Use 'content' or 'extension'")]
    UnsupportedDetection(String),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No EPUB files found in input path: {0}")]
    NoEpubFilesFound(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

/// Per-member codec failure. Never escapes the member processor; it ends up
/// in the compression report instead.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),

    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("WebP encode failed: {0}")]
    WebPEncode(String),

    #[error("image dimensions {0}x{1} exceed the {2}px limit")]
    Dimensions(u32, u32, u32),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
