use crate::constants::{DEFAULT_AVIF_SPEED, MAX_IMAGE_DIMENSION};
use crate::error::TranscodeError;
use crate::formats::TargetFormat;
use image::codecs::avif::AvifEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageReader};
use std::io::Cursor;
use tracing::{debug, warn};

/// Image codec collaborator used by the transcoder.
///
/// Implementations must be shareable across the worker pool.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, TranscodeError>;

    fn encode(
        &self,
        image: &DynamicImage,
        format: TargetFormat,
        quality: u8,
    ) -> Result<Vec<u8>, TranscodeError>;
}

/// Codec backed by the `image` crate for decoding and AVIF, and libwebp (via
/// the `webp` crate) for lossy WebP.
#[derive(Debug, Clone, Copy)]
pub struct ImageRsCodec {
    pub avif_speed: u8,
}

impl Default for ImageRsCodec {
    fn default() -> Self {
        Self {
            avif_speed: DEFAULT_AVIF_SPEED,
        }
    }
}

impl ImageCodec for ImageRsCodec {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, TranscodeError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TranscodeError::Decode(image::ImageError::IoError(e)))?
            .decode()
            .map_err(TranscodeError::Decode)?;

        let (width, height) = img.dimensions();
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(TranscodeError::Dimensions(
                width,
                height,
                MAX_IMAGE_DIMENSION,
            ));
        }

        Ok(img)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: TargetFormat,
        quality: u8,
    ) -> Result<Vec<u8>, TranscodeError> {
        // Both encoders accept RGBA8 regardless of the source layout
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        match format {
            TargetFormat::WebP => webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
                .map(|encoded| encoded.to_vec())
                .map_err(|e| TranscodeError::WebPEncode(format!("{:?}", e))),
            TargetFormat::Avif => {
                let mut out = Vec::new();
                AvifEncoder::new_with_speed_quality(&mut out, self.avif_speed, quality)
                    .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(TranscodeError::Encode)?;
                Ok(out)
            }
        }
    }
}

/// One member's worth of transcoding work
#[derive(Debug)]
pub struct TranscodeRequest<'a> {
    pub member: &'a str,
    pub data: Vec<u8>,
    pub format: TargetFormat,
    pub quality: u8,
}

#[derive(Debug)]
pub enum TranscodeResult {
    Transcoded { data: Vec<u8>, format: TargetFormat },
    /// The codec rejected the image; `original` is returned untouched
    Failed {
        original: Vec<u8>,
        error: TranscodeError,
    },
}

impl TranscodeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscodeResult::Transcoded { .. })
    }

    /// The bytes to store for this member, whatever happened
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            TranscodeResult::Transcoded { data, .. } => data,
            TranscodeResult::Failed { original, .. } => original,
        }
    }
}

/// Decodes the request's bytes and re-encodes them in the target format.
///
/// Never fails: a decode or encode error is logged and the original bytes come
/// back in [`TranscodeResult::Failed`].
pub fn transcode<C: ImageCodec + ?Sized>(
    request: TranscodeRequest<'_>,
    codec: &C,
) -> TranscodeResult {
    let TranscodeRequest {
        member,
        data,
        format,
        quality,
    } = request;

    let encoded = codec
        .decode(&data)
        .and_then(|img| codec.encode(&img, format, quality));

    match encoded {
        Ok(encoded) => {
            debug!(
                member,
                mime = format.mime_type(),
                before = data.len(),
                after = encoded.len(),
                "transcoded image"
            );
            TranscodeResult::Transcoded {
                data: encoded,
                format,
            }
        }
        Err(error) => {
            warn!(member, %error, "error converting image, keeping original");
            TranscodeResult::Failed {
                original: data,
                error,
            }
        }
    }
}
