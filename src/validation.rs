use crate::constants::MAX_ARCHIVE_SIZE;
use crate::error::{CompressionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Validate an input archive path before it is read into memory
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(CompressionError::UnsupportedFormat(format!(
            "Input path is not a file: {}",
            path.display()
        )));
    }

    // The whole archive is held in memory, so refuse anything unreasonably big
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_ARCHIVE_SIZE {
        return Err(CompressionError::FileTooLarge(metadata.len(), MAX_ARCHIVE_SIZE));
    }

    Ok(())
}

/// Validate the output path and create its parent directory if needed
pub fn validate_output_path(path: &Path) -> Result<PathBuf> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)
                .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
            let canonical_parent = parent
                .canonicalize()
                .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
            let filename = path.file_name().ok_or_else(|| {
                CompressionError::UnsupportedFormat("Invalid output filename".to_string())
            })?;
            Ok(canonical_parent.join(filename))
        }
        None => Ok(std::env::current_dir()?.join(path)),
    }
}
