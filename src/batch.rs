use crate::compress::compress_epub_file;
use crate::constants::{COMPRESSED_SUFFIX, EPUB_EXTENSION};
use crate::error::{CompressionError, Result};
use crate::processing::CompressionOptions;
use crate::utils::{calculate_compression_ratio, create_progress_bar, format_file_size, is_epub_file};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;
use walkdir::WalkDir;

const GLOB_METACHARS: [char; 3] = ['*', '?', '['];

/// Totals for a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub images_transcoded: usize,
    pub images_failed: usize,
    pub total_before: u64,
    pub total_after: u64,
}

/// Compresses every EPUB found under `input` into `output`.
///
/// Books are processed one after another, each using the full worker pool for
/// its images. A book that fails is reported and skipped.
pub fn batch_compress_epubs(
    input: String,
    output: PathBuf,
    options: CompressionOptions,
    recursive: bool,
) -> Result<BatchSummary> {
    println!("🚀 Starting batch compression...");
    println!("📁 Input: {}", input);
    println!("📁 Output: {:?}", output);

    let start_time = Instant::now();

    let epub_files = collect_epub_files(&input, recursive)?;
    let total_files = epub_files.len();

    if total_files == 0 {
        println!("⚠️  No EPUB files found in the input path");
        return Ok(BatchSummary::default());
    }

    println!("📊 Found {} EPUB files to process", total_files);

    fs::create_dir_all(&output)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output.clone()))?;

    let progress = create_progress_bar(total_files as u64);
    let mut summary = BatchSummary::default();

    for input_path in &epub_files {
        if let Some(name) = input_path.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }

        let result = generate_output_path(input_path, &output)
            .and_then(|output_path| compress_epub_file(input_path, &output_path, &options));

        match result {
            Ok(report) => {
                summary.processed += 1;
                summary.images_transcoded += report.transcoded;
                summary.images_failed += report.failed_count();
                summary.total_before += report.original_size;
                summary.total_after += report.compressed_size;
            }
            Err(e) => {
                warn!(path = %input_path.display(), error = %e, "failed to compress book");
                progress.println(format!("❌ Failed to process {:?}: {}", input_path, e));
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_with_message("✅ Batch compression complete");

    let elapsed_time = start_time.elapsed();
    let ratio = calculate_compression_ratio(summary.total_before, summary.total_after);

    println!("\n📊 Batch Compression Summary:");
    println!("  📁 Total books processed: {}", summary.processed);
    println!(
        "  🖼️  Images transcoded: {} ({} failed)",
        summary.images_transcoded, summary.images_failed
    );
    println!(
        "  📊 Total original size: {}",
        format_file_size(summary.total_before)
    );
    println!(
        "  📊 Total compressed size: {}",
        format_file_size(summary.total_after)
    );
    println!("  🎯 Overall compression ratio: {:.1}%", ratio);
    println!("  ⏱️  Total time: {:?}", elapsed_time);

    if summary.failed > 0 {
        println!("  ⚠️  Failed books: {}", summary.failed);
    }

    Ok(summary)
}

/// Resolves `input` (a file, a directory or a glob) to the EPUB files it names.
pub fn collect_epub_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut epub_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        if is_epub_file(input_path) {
            epub_files.push(input_path.to_path_buf());
        }
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path).into_iter()
        } else {
            WalkDir::new(input_path).max_depth(1).into_iter()
        };

        for entry in walker.filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
        }) {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && is_epub_file(path) {
                epub_files.push(path.to_path_buf());
            }
        }
    } else if !input.contains(&GLOB_METACHARS[..]) {
        // Neither an existing path nor a pattern
        return Err(CompressionError::NoEpubFilesFound(input.to_string()));
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_epub_file(&entry) {
                epub_files.push(entry);
            }
        }
    } else {
        return Err(CompressionError::NoEpubFilesFound(input.to_string()));
    }

    epub_files.sort();
    Ok(epub_files)
}

/// `<output_dir>/<stem>-compressed.epub`
pub fn generate_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat("Invalid file name".to_string()))?;

    let output_filename = format!(
        "{}{}.{}",
        file_stem.to_string_lossy(),
        COMPRESSED_SUFFIX,
        EPUB_EXTENSION
    );
    Ok(output_dir.join(output_filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_generate_output_path() {
        let result =
            generate_output_path(Path::new("library/novel.epub"), Path::new("/tmp/output")).unwrap();
        assert_eq!(result, PathBuf::from("/tmp/output/novel-compressed.epub"));
    }

    #[test]
    fn test_generate_output_path_invalid_name() {
        let result = generate_output_path(Path::new(".."), Path::new("/tmp/output"));
        assert!(matches!(result, Err(CompressionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_collect_epub_files_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let book = temp_dir.path().join("book.epub");
        File::create(&book).unwrap();

        let files = collect_epub_files(&book.to_string_lossy(), false).unwrap();
        assert_eq!(files, vec![book]);
    }

    #[test]
    fn test_collect_epub_files_directory() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.epub")).unwrap();
        File::create(temp_dir.path().join("b.EPUB")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join(".hidden.epub")).unwrap();

        let files = collect_epub_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_epub_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("series");
        fs::create_dir(&subdir).unwrap();
        File::create(temp_dir.path().join("a.epub")).unwrap();
        File::create(subdir.join("b.epub")).unwrap();

        let flat = collect_epub_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = collect_epub_files(&temp_dir.path().to_string_lossy(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_collect_epub_files_glob_pattern() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("one.epub")).unwrap();
        File::create(temp_dir.path().join("two.epub")).unwrap();
        File::create(temp_dir.path().join("other.pdf")).unwrap();

        let pattern = format!("{}/o*", temp_dir.path().to_string_lossy());
        let files = collect_epub_files(&pattern, false).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("one.epub"));
    }

    #[test]
    fn test_collect_epub_files_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_epub_files(&temp_dir.path().to_string_lossy(), true).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_epub_files_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.epub");
        let result = collect_epub_files(&missing.to_string_lossy(), false);
        assert!(matches!(result, Err(CompressionError::NoEpubFilesFound(_))));
    }

    #[test]
    fn test_collect_epub_files_invalid_glob() {
        let result = collect_epub_files("[invalid", false);
        assert!(matches!(result, Err(CompressionError::NoEpubFilesFound(_))));
    }
}
