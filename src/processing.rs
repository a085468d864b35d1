use crate::classify::{classify, Classification};
use crate::constants::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{CompressionError, Result};
use crate::formats::{Detection, TargetFormat};
use crate::transcode::{transcode, ImageCodec, TranscodeRequest, TranscodeResult};
use std::str::FromStr;
use tracing::debug;
use zip::{CompressionMethod, DateTime};

/// Settings for one compression run. Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct CompressionOptions {
    pub quality: u8,
    pub format: TargetFormat,
    pub detection: Detection,
    pub threads: Option<usize>,
    pub skip_larger: bool,
}

impl CompressionOptions {
    pub fn new(quality: Option<u8>, format: Option<String>) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        let format = match format {
            Some(fmt) => TargetFormat::from_str(&fmt)?,
            None => TargetFormat::default(),
        };

        Ok(Self {
            quality,
            format,
            detection: Detection::default(),
            threads: None,
            skip_larger: false,
        })
    }

    pub fn with_detection(mut self, detection: Detection) -> Self {
        self.detection = detection;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }

    /// Keep the original bytes when the transcoded image is not smaller.
    pub fn with_skip_larger(mut self, skip_larger: bool) -> Self {
        self.skip_larger = skip_larger;
        self
    }
}

/// Metadata of one source archive entry, captured before any worker runs
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub index: usize,
    pub name: String,
    pub is_dir: bool,
    pub compression: CompressionMethod,
    pub last_modified: Option<DateTime>,
    pub unix_mode: Option<u32>,
    pub size: u64,
    pub compressed_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    Directory,
    NotImage,
    Cover,
    NotSmaller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Transcoded { format: TargetFormat, original_size: u64 },
    PassThrough(PassReason),
    /// The image could not be transcoded and kept its original bytes
    Failed { reason: String },
}

impl Disposition {
    /// Whether the member's content differs from the source entry
    pub fn is_replaced(&self) -> bool {
        matches!(self, Disposition::Transcoded { .. })
    }
}

#[derive(Debug)]
pub struct ProcessedMember {
    pub member: MemberInfo,
    pub data: Vec<u8>,
    pub disposition: Disposition,
}

/// Decides what to store for one member: its original bytes or a transcoded
/// replacement.
pub fn process_member<C: ImageCodec + ?Sized>(
    member: MemberInfo,
    data: Vec<u8>,
    options: &CompressionOptions,
    codec: &C,
) -> ProcessedMember {
    if member.is_dir {
        return pass_through(member, data, PassReason::Directory);
    }

    match classify(&member.name, &data, options.detection) {
        Classification::Other => pass_through(member, data, PassReason::NotImage),
        Classification::Cover { mime } => {
            debug!(member = %member.name, %mime, "skipping cover image");
            pass_through(member, data, PassReason::Cover)
        }
        Classification::Image { .. } => transcode_member(member, data, options, codec),
    }
}

fn transcode_member<C: ImageCodec + ?Sized>(
    member: MemberInfo,
    data: Vec<u8>,
    options: &CompressionOptions,
    codec: &C,
) -> ProcessedMember {
    let original_size = data.len() as u64;
    let backup = options.skip_larger.then(|| data.clone());
    let request = TranscodeRequest {
        member: &member.name,
        data,
        format: options.format,
        quality: options.quality,
    };

    match transcode(request, codec) {
        TranscodeResult::Transcoded { data, format } => match backup {
            Some(original) if data.len() as u64 >= original_size => {
                debug!(
                    member = %member.name,
                    before = original_size,
                    after = data.len(),
                    "transcoded image is not smaller, keeping original"
                );
                pass_through(member, original, PassReason::NotSmaller)
            }
            _ => ProcessedMember {
                member,
                data,
                disposition: Disposition::Transcoded {
                    format,
                    original_size,
                },
            },
        },
        TranscodeResult::Failed { original, error } => ProcessedMember {
            member,
            data: original,
            disposition: Disposition::Failed {
                reason: error.to_string(),
            },
        },
    }
}

fn pass_through(member: MemberInfo, data: Vec<u8>, reason: PassReason) -> ProcessedMember {
    ProcessedMember {
        member,
        data,
        disposition: Disposition::PassThrough(reason),
    }
}
