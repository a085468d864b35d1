use crate::error::{CompressionError, Result};
use crate::processing::{process_member, CompressionOptions, MemberInfo, ProcessedMember};
use crate::report::CompressionReport;
use crate::transcode::{ImageCodec, ImageRsCodec};
use rayon::prelude::*;
use std::io::{Cursor, Read, Seek, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A rebuilt archive together with what happened to its members
#[derive(Debug)]
pub struct CompressedEpub {
    pub data: Vec<u8>,
    pub report: CompressionReport,
}

/// Rebuilds `source` with its images transcoded, using the `image` crate codec.
pub fn compress_epub(source: &[u8], options: &CompressionOptions) -> Result<CompressedEpub> {
    compress_epub_with_codec(source, options, &ImageRsCodec::default())
}

/// Core archive pipeline.
///
/// Every member is read and processed on the worker pool; only this function
/// touches the output writer. Members that were not transcoded are raw-copied,
/// so their compressed stream, CRC, timestamps and attributes are unchanged.
/// Per-image codec failures are reported, not returned; an unreadable archive
/// or member aborts the whole run with no output.
pub fn compress_epub_with_codec<C: ImageCodec + ?Sized>(
    source: &[u8],
    options: &CompressionOptions,
    codec: &C,
) -> Result<CompressedEpub> {
    let mut archive = ZipArchive::new(Cursor::new(source))?;
    let members = list_members(&mut archive)?;

    info!(
        members = members.len(),
        format = %options.format,
        quality = options.quality,
        detection = %options.detection,
        "compressing archive"
    );

    let pool = build_thread_pool(options.threads)?;
    let processed: Vec<ProcessedMember> = pool.install(|| {
        members
            .into_par_iter()
            .map_init(
                || archive.clone(),
                |reader, member| {
                    let data = read_member(reader, member.index)?;
                    Ok(process_member(member, data, options, codec))
                },
            )
            .collect::<Result<Vec<_>>>()
    })?;

    let mut report = CompressionReport::new(source.len() as u64);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for member in &processed {
        write_member(&mut writer, &mut archive, member)?;
        report.record(member);
    }

    let data = writer.finish()?.into_inner();
    report.compressed_size = data.len() as u64;

    info!(
        before = report.original_size,
        after = report.compressed_size,
        transcoded = report.transcoded,
        failed = report.failed_count(),
        "archive rebuilt"
    );

    Ok(CompressedEpub { data, report })
}

/// Enumerates entries in central-directory order.
pub fn list_members<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<MemberInfo>> {
    (0..archive.len())
        .map(|index| {
            let file = archive.by_index_raw(index)?;
            Ok(MemberInfo {
                index,
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                compression: file.compression(),
                last_modified: file.last_modified(),
                unix_mode: file.unix_mode(),
                size: file.size(),
                compressed_size: file.compressed_size(),
            })
        })
        .collect()
}

fn read_member<R: Read + Seek>(archive: &mut ZipArchive<R>, index: usize) -> Result<Vec<u8>> {
    let mut file = archive.by_index(index)?;
    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data)?;
    Ok(data)
}

fn write_member<W: Write + Seek, R: Read + Seek>(
    writer: &mut ZipWriter<W>,
    source: &mut ZipArchive<R>,
    processed: &ProcessedMember,
) -> Result<()> {
    let member = &processed.member;

    if !processed.disposition.is_replaced() {
        debug!(member = %member.name, disposition = ?processed.disposition, "copying entry");
        writer.raw_copy_file(source.by_index_raw(member.index)?)?;
        return Ok(());
    }

    writer.start_file(member.name.as_str(), entry_options(member))?;
    writer.write_all(&processed.data)?;
    Ok(())
}

/// Options for a rewritten entry, carrying over the source entry's metadata.
///
/// Name, timestamp, unix mode and Stored/Deflated choice survive. DOS external
/// attributes, the entry comment and extra fields are not carried over, since
/// `SimpleFileOptions` cannot set them; untouched members keep all of them
/// through the raw copy.
fn entry_options(member: &MemberInfo) -> SimpleFileOptions {
    let method = match member.compression {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    };

    let mut options = SimpleFileOptions::default().compression_method(method);
    if let Some(modified) = member.last_modified {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = member.unix_mode {
        options = options.unix_permissions(mode);
    }
    options
}

fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let num_threads = threads.unwrap_or_else(num_cpus::get);
    debug!(threads = num_threads, "building worker pool");

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| CompressionError::ThreadPool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::TargetFormat;
    use image::DynamicImage;
    use zip::DateTime;

    fn build_archive(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data, method) in entries {
            let options = SimpleFileOptions::default()
                .compression_method(*method)
                .unix_permissions(0o640);
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn png_bytes() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::new_rgba8(6, 6)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn read_all(data: &[u8]) -> Vec<(String, Vec<u8>, CompressionMethod)> {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).unwrap();
                (file.name().to_string(), buf, file.compression())
            })
            .collect()
    }

    #[test]
    fn test_list_members_preserves_order_and_metadata() {
        let source = build_archive(&[
            ("mimetype", b"application/epub+zip", CompressionMethod::Stored),
            ("OEBPS/chapter1.xhtml", b"<html/>", CompressionMethod::Deflated),
        ]);
        let mut archive = ZipArchive::new(Cursor::new(source.as_slice())).unwrap();

        let members = list_members(&mut archive).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "mimetype");
        assert_eq!(members[0].compression, CompressionMethod::Stored);
        assert_eq!(members[0].size, 20);
        assert_eq!(members[1].index, 1);
        assert_eq!(members[1].unix_mode.map(|m| m & 0o777), Some(0o640));
    }

    #[test]
    fn test_mimetype_stays_first_and_stored() {
        let png = png_bytes();
        let source = build_archive(&[
            ("mimetype", b"application/epub+zip", CompressionMethod::Stored),
            ("OEBPS/images/fig1.png", &png, CompressionMethod::Stored),
            ("OEBPS/chapter1.xhtml", b"<html/>", CompressionMethod::Deflated),
        ]);
        let options = CompressionOptions::new(Some(80), None)
            .unwrap()
            .with_threads(Some(2));

        let result = compress_epub(&source, &options).unwrap();
        let entries = read_all(&result.data);

        assert_eq!(entries[0].0, "mimetype");
        assert_eq!(entries[0].1, b"application/epub+zip");
        assert_eq!(entries[0].2, CompressionMethod::Stored);
        assert_eq!(entries[1].2, CompressionMethod::Stored);
        assert_eq!(
            image::guess_format(&entries[1].1).unwrap(),
            TargetFormat::WebP.to_image_format()
        );
    }

    #[test]
    fn test_transcoded_entry_keeps_permissions() {
        let png = png_bytes();
        let source = build_archive(&[("img/fig.png", &png, CompressionMethod::Deflated)]);
        let options = CompressionOptions::new(None, None).unwrap();

        let result = compress_epub(&source, &options).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(result.data.as_slice())).unwrap();
        let file = archive.by_index(0).unwrap();

        assert_eq!(file.compression(), CompressionMethod::Deflated);
        assert_eq!(file.unix_mode().map(|m| m & 0o777), Some(0o640));
        assert_eq!(result.report.transcoded, 1);
    }

    #[test]
    fn test_timestamps_survive_rewrite_and_copy() {
        let stamp = DateTime::from_date_and_time(2001, 2, 3, 4, 5, 6).unwrap();
        let png = png_bytes();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in [("img/fig.png", png.as_slice()), ("text/a.xhtml", &b"<html/>"[..])] {
            let options = SimpleFileOptions::default().last_modified_time(stamp);
            writer.start_file(name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        let source = writer.finish().unwrap().into_inner();

        let result = compress_epub(&source, &CompressionOptions::new(None, None).unwrap()).unwrap();
        assert_eq!(result.report.transcoded, 1);

        let mut archive = ZipArchive::new(Cursor::new(result.data.as_slice())).unwrap();
        for index in 0..archive.len() {
            let file = archive.by_index(index).unwrap();
            assert_eq!(file.last_modified(), Some(stamp), "{}", file.name());
        }
    }

    #[test]
    fn test_not_an_archive_is_an_error() {
        let options = CompressionOptions::new(None, None).unwrap();
        let result = compress_epub(b"this is not a zip file", &options);
        assert!(matches!(result, Err(CompressionError::Archive(_))));
    }

    #[test]
    fn test_single_worker_pool() {
        let source = build_archive(&[
            ("a.txt", b"alpha", CompressionMethod::Deflated),
            ("b.txt", b"beta", CompressionMethod::Deflated),
            ("c.txt", b"gamma", CompressionMethod::Deflated),
        ]);
        let options = CompressionOptions::new(None, None)
            .unwrap()
            .with_threads(Some(1));

        let result = compress_epub(&source, &options).unwrap();
        let names: Vec<String> = read_all(&result.data).into_iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(result.report.members, 3);
        assert_eq!(result.report.images, 0);
    }
}
