pub mod archive;
pub mod batch;
pub mod classify;
pub mod cli;
pub mod compress;
pub mod constants;
pub mod error;
pub mod formats;
pub mod info;
pub mod processing;
pub mod report;
pub mod transcode;
pub mod utils;
pub mod validation;

pub use archive::{compress_epub, compress_epub_with_codec, list_members, CompressedEpub};
pub use batch::{batch_compress_epubs, collect_epub_files, generate_output_path, BatchSummary};
pub use classify::{classify, is_cover_name, Classification};
pub use compress::{compress_epub_file, default_output_path};
pub use error::{CompressionError, Result, TranscodeError};
pub use formats::{Detection, TargetFormat};
pub use info::{inspect_epub, EpubInfo};
pub use processing::{
    process_member, CompressionOptions, Disposition, MemberInfo, PassReason, ProcessedMember,
};
pub use report::{CompressionReport, MemberFailure};
pub use transcode::{transcode, ImageCodec, ImageRsCodec, TranscodeRequest, TranscodeResult};
