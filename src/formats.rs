//! Type-safe target format and detection strategy handling
//!
//! The pipeline only ever encodes to WebP or AVIF, so the format surface is a
//! closed enum rather than the free-form strings accepted on the command line.

use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;

/// Supported target image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    /// WebP, encoded by the `image` crate
    #[default]
    WebP,
    /// AVIF, encoded through ravif with a quality setting
    Avif,
}

impl TargetFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::WebP => "image/webp",
            TargetFormat::Avif => "image/avif",
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            TargetFormat::WebP => ImageFormat::WebP,
            TargetFormat::Avif => ImageFormat::Avif,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::WebP => "WEBP",
            TargetFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            "jpeg" | "jpg" | "png" => Err(CompressionError::UnsupportedFormat(format!(
                "{} is not a target format. Use WEBP or AVIF",
                s
            ))),
            _ => Err(CompressionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// How a member's content type is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detection {
    /// Sniff the magic signature of the member's bytes
    #[default]
    Content,
    /// Guess from the member's file extension
    Extension,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Content => write!(f, "content"),
            Detection::Extension => write!(f, "extension"),
        }
    }
}

impl FromStr for Detection {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "content" | "magic" => Ok(Detection::Content),
            "extension" | "ext" | "name" => Ok(Detection::Extension),
            _ => Err(CompressionError::UnsupportedDetection(s.to_string())),
        }
    }
}
