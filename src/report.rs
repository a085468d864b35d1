use crate::processing::{Disposition, PassReason, ProcessedMember};
use crate::utils::calculate_compression_ratio;

/// An image that kept its original bytes because the codec rejected it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFailure {
    pub name: String,
    pub reason: String,
}

/// What happened during one archive compression.
///
/// Returned next to the archive so callers can see per-image failures without
/// scraping logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionReport {
    pub members: usize,
    /// Members classified as eligible images (transcoded, failed or kept)
    pub images: usize,
    pub transcoded: usize,
    pub covers_skipped: usize,
    pub kept_original: usize,
    pub failures: Vec<MemberFailure>,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl CompressionReport {
    pub fn new(original_size: u64) -> Self {
        Self {
            original_size,
            ..Self::default()
        }
    }

    pub fn record(&mut self, processed: &ProcessedMember) {
        self.members += 1;
        match &processed.disposition {
            Disposition::Transcoded { .. } => {
                self.images += 1;
                self.transcoded += 1;
            }
            Disposition::PassThrough(PassReason::Cover) => self.covers_skipped += 1,
            Disposition::PassThrough(PassReason::NotSmaller) => {
                self.images += 1;
                self.kept_original += 1;
            }
            Disposition::PassThrough(_) => {}
            Disposition::Failed { reason } => {
                self.images += 1;
                self.failures.push(MemberFailure {
                    name: processed.member.name.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_size, self.compressed_size)
    }

    pub fn summary(&self) -> String {
        let transcoded = format!(
            "{} of {} images transcoded ({} cover images skipped)",
            self.transcoded, self.images, self.covers_skipped
        );
        if self.failures.is_empty() {
            return transcoded;
        }
        format!(
            "{}; {} of {} images failed to transcode",
            transcoded,
            self.failed_count(),
            self.images
        )
    }
}
