use crate::archive::list_members;
use crate::classify::{classify, Classification};
use crate::constants::EPUB_MIME_TYPE;
use crate::error::Result;
use crate::formats::Detection;
use crate::utils::{format_file_size, validate_file_exists};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// One row of the `info` listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub compression: String,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubInfo {
    pub members: Vec<MemberSummary>,
    /// Whether the first entry is a `mimetype` file declaring an EPUB
    pub has_epub_mimetype: bool,
}

impl EpubInfo {
    pub fn image_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.classification.is_eligible())
            .count()
    }

    pub fn image_bytes(&self) -> u64 {
        self.members
            .iter()
            .filter(|m| m.classification.mime().is_some())
            .map(|m| m.size)
            .sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.members.iter().map(|m| m.size).sum()
    }
}

/// Classifies every member of an in-memory archive without modifying it.
pub fn inspect_epub(source: &[u8], detection: Detection) -> Result<EpubInfo> {
    let mut archive = ZipArchive::new(Cursor::new(source))?;
    let members = list_members(&mut archive)?;

    let mut summaries = Vec::with_capacity(members.len());
    let mut has_epub_mimetype = false;

    for member in members {
        let mut data = Vec::new();
        if !member.is_dir {
            archive.by_index(member.index)?.read_to_end(&mut data)?;
        }

        if member.index == 0 && member.name == "mimetype" {
            has_epub_mimetype = data == EPUB_MIME_TYPE.as_bytes();
        }

        let classification = if member.is_dir {
            Classification::Other
        } else {
            classify(&member.name, &data, detection)
        };

        summaries.push(MemberSummary {
            name: member.name,
            size: member.size,
            compressed_size: member.compressed_size,
            compression: format!("{:?}", member.compression),
            classification,
        });
    }

    Ok(EpubInfo {
        members: summaries,
        has_epub_mimetype,
    })
}

/// `info` command: prints the member table and totals.
pub fn print_epub_info(input_path: &Path, detection: Detection) -> Result<()> {
    validate_file_exists(input_path)?;
    let source = fs::read(input_path)?;
    let info = inspect_epub(&source, detection)?;

    println!("📋 EPUB Information:");
    println!("  📁 File: {:?}", input_path);
    println!(
        "  📦 Archive size: {} ({})",
        source.len(),
        format_file_size(source.len() as u64)
    );
    println!("  📄 Members: {}", info.members.len());
    if !info.has_epub_mimetype {
        println!("  ⚠️  No leading 'mimetype' entry; this may not be a valid EPUB");
    }

    println!();
    for member in &info.members {
        println!(
            "  {:<6} {:>10} {:>10}  {:<10} {}",
            member.classification.label(),
            format_file_size(member.size),
            format_file_size(member.compressed_size),
            member.compression,
            member.name
        );
    }

    let image_bytes = info.image_bytes();
    let total_bytes = info.total_bytes();
    let share = if total_bytes > 0 {
        image_bytes as f64 / total_bytes as f64 * 100.0
    } else {
        0.0
    };

    println!();
    println!("  🖼️  Transcodable images: {}", info.image_count());
    println!(
        "  📊 Image content: {} of {} ({:.1}%)",
        format_file_size(image_bytes),
        format_file_size(total_bytes),
        share
    );

    if info.image_count() == 0 {
        println!("  💡 Nothing to transcode in this book");
    } else if share > 50.0 {
        println!("  💡 Images dominate this book, expect a large reduction");
    }

    Ok(())
}
