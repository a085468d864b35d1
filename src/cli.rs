use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "epub-squeeze",
    about = "Shrink EPUB books by converting their images to WebP or AVIF",
    long_about = "epub-squeeze rebuilds an EPUB with every embedded image transcoded to WebP or AVIF. \
                  Markup, metadata and cover images are left untouched, and images that cannot be \
                  decoded are kept as they are instead of failing the whole book.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    epub-squeeze compress novel.epub -q 80 -f webp\n  \
    epub-squeeze compress novel.epub -o small.epub -f avif -q 60\n  \
    epub-squeeze batch ./library ./compressed -r\n  \
    epub-squeeze info novel.epub"
)]
pub struct Args {
    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Show debug logging",
        long_help = "Log per-member decisions. RUST_LOG takes precedence when set."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by `compress` and `batch`
#[derive(ClapArgs, Debug, Clone)]
pub struct TranscodeArgs {
    #[arg(
        short = 'q',
        long,
        help = "Image quality (1-100, default: 75)",
        long_help = "Quality from 1 (smallest) to 100 (most faithful). \
                     Passed to both the WebP and AVIF encoders."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'f',
        long,
        help = "Target image format (webp, avif)",
        long_help = "Format every eligible image is converted to. Case-insensitive. Default: webp"
    )]
    pub format: Option<String>,

    #[arg(
        short = 'j',
        long,
        help = "Number of parallel threads (default: auto)",
        long_help = "Number of worker threads transcoding images. \
                     If not specified, uses number of CPU cores."
    )]
    pub threads: Option<usize>,

    #[arg(
        short = 'd',
        long,
        default_value = "content",
        help = "How images are recognized (content, extension)",
        long_help = "content: sniff each member's magic bytes. \
                     extension: trust the member's file extension."
    )]
    pub detect: String,

    #[arg(
        long,
        help = "Keep an image's original bytes when conversion does not shrink it"
    )]
    pub skip_larger: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single EPUB file",
        long_about = "Transcode the images of one EPUB and write a new EPUB. \
                      Without --output the result is written next to the input as <name>-compressed.epub."
    )]
    Compress {
        #[arg(help = "Input EPUB file path")]
        input: PathBuf,

        #[arg(short = 'o', long, help = "Output EPUB file path")]
        output: Option<PathBuf>,

        #[command(flatten)]
        transcode: TranscodeArgs,
    },

    #[command(
        about = "Compress many EPUB files",
        long_about = "Compress every EPUB found in a directory, file pattern or glob. \
                      Books that fail are reported and skipped."
    )]
    Batch {
        #[arg(
            help = "Input directory, file, or glob",
            long_help = "Input can be a directory path, a single file, or a glob expression. \
                         Examples: './library', './library/*.epub'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively"
        )]
        recursive: bool,

        #[command(flatten)]
        transcode: TranscodeArgs,
    },

    #[command(
        about = "List the members of an EPUB and how they would be treated",
        long_about = "Show every archive member with its size, compression method and \
                      classification (image, cover or other) without modifying anything."
    )]
    Info {
        #[arg(help = "EPUB file path to analyze")]
        input: PathBuf,

        #[arg(
            short = 'd',
            long,
            default_value = "content",
            help = "How images are recognized (content, extension)"
        )]
        detect: String,
    },
}
