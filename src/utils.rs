//! Helper functions shared by the CLI commands and the report

use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, EPUB_EXTENSION, PROGRESS_BAR_TEMPLATE,
    PROGRESS_SPINNER_TEMPLATE, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::error::{CompressionError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Check if a file path has the `.epub` extension (case-insensitive)
pub fn is_epub_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(EPUB_EXTENSION))
        .unwrap_or(false)
}

/// Validate that a file exists and return a descriptive error if not
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Create a progress spinner with consistent styling
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Create a bounded progress bar for batch runs
pub fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate compression ratio as a percentage
///
/// Positive means reduction, negative means the output grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

pub fn print_compression_result(original_size: u64, compressed_size: u64) {
    let ratio = calculate_compression_ratio(original_size, compressed_size);

    println!(
        "{} {} ({})",
        COMPRESSED_SIZE_PREFIX,
        compressed_size,
        format_file_size(compressed_size)
    );
    println!("{} {:.1}%", COMPRESSION_RATIO_PREFIX, ratio);

    if ratio > 0.0 {
        println!("{} Successfully reduced file size by {:.1}%", SUCCESS_PREFIX, ratio);
    } else {
        println!("{}  File size increased by {:.1}%", WARNING_PREFIX, ratio.abs());
    }
}
