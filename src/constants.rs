pub const DEFAULT_QUALITY: u8 = 75;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// rav1e speed preset, 1 (slowest) to 10 (fastest).
pub const DEFAULT_AVIF_SPEED: u8 = 8;

pub const MAX_IMAGE_DIMENSION: u32 = 16384;
pub const MAX_ARCHIVE_SIZE: u64 = 512 * 1024 * 1024;

/// Members whose lower-cased name contains this marker are never transcoded.
pub const COVER_MARKER: &str = "cover";

pub const EPUB_EXTENSION: &str = "epub";
pub const EPUB_MIME_TYPE: &str = "application/epub+zip";
pub const COMPRESSED_SUFFIX: &str = "-compressed";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
