use crate::archive::compress_epub;
use crate::constants::{COMPRESSED_SUFFIX, EPUB_EXTENSION, ORIGINAL_SIZE_PREFIX, WARNING_PREFIX};
use crate::error::Result;
use crate::processing::CompressionOptions;
use crate::report::CompressionReport;
use crate::utils::{create_progress_spinner, format_file_size, print_compression_result};
use crate::validation::{validate_input_path, validate_output_path};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads an EPUB from disk, compresses it and writes the result.
///
/// Nothing is written when the archive cannot be opened or rebuilt.
pub fn compress_epub_file(
    input: &Path,
    output: &Path,
    options: &CompressionOptions,
) -> Result<CompressionReport> {
    validate_input_path(input)?;
    let source = fs::read(input)?;

    let compressed = compress_epub(&source, options)?;

    let output = validate_output_path(output)?;
    fs::write(&output, &compressed.data)?;

    Ok(compressed.report)
}

/// `<dir>/<stem>-compressed.epub` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());
    input.with_file_name(format!("{}{}.{}", stem, COMPRESSED_SUFFIX, EPUB_EXTENSION))
}

/// `compress` command: one book, with progress and a summary on stdout.
pub fn compress_book(
    input: PathBuf,
    output: Option<PathBuf>,
    options: CompressionOptions,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output_path(&input));

    println!("🗜️  Compressing EPUB: {:?}", input);
    println!("📁 Output: {:?}", output);
    println!(
        "⚙️  Target format: {} at quality {} ({} detection)",
        options.format, options.quality, options.detection
    );

    let pb = create_progress_spinner("Transcoding images...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    let result = compress_epub_file(&input, &output, &options);
    pb.finish_and_clear();
    let report = result?;

    println!(
        "{} {} ({})",
        ORIGINAL_SIZE_PREFIX,
        report.original_size,
        format_file_size(report.original_size)
    );
    print_compression_result(report.original_size, report.compressed_size);
    print_report_details(&report);

    Ok(())
}

pub fn print_report_details(report: &CompressionReport) {
    println!("🖼️  {}", report.summary());
    if report.kept_original > 0 {
        println!(
            "  ↩️  {} images kept their original bytes (transcoded output was not smaller)",
            report.kept_original
        );
    }
    for failure in &report.failures {
        println!("  {}  {}: {}", WARNING_PREFIX, failure.name, failure.reason);
    }
}
