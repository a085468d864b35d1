use anyhow::Context;
use clap::Parser;
use epub_squeeze::batch::batch_compress_epubs;
use epub_squeeze::cli::{Args, Commands, TranscodeArgs};
use epub_squeeze::compress::compress_book;
use epub_squeeze::formats::Detection;
use epub_squeeze::info::print_epub_info;
use epub_squeeze::CompressionOptions;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Compress {
            input,
            output,
            transcode,
        } => {
            let options = build_options(&transcode)?;
            compress_book(input.clone(), output, options)
                .with_context(|| format!("failed to compress {}", input.display()))?;
        }
        Commands::Batch {
            input,
            output,
            recursive,
            transcode,
        } => {
            let options = build_options(&transcode)?;
            batch_compress_epubs(input, output, options, recursive)?;
        }
        Commands::Info { input, detect } => {
            let detection = Detection::from_str(&detect)?;
            print_epub_info(&input, detection)
                .with_context(|| format!("failed to read {}", input.display()))?;
        }
    }

    Ok(())
}

fn build_options(args: &TranscodeArgs) -> anyhow::Result<CompressionOptions> {
    let options = CompressionOptions::new(args.quality, args.format.clone())?
        .with_detection(Detection::from_str(&args.detect)?)
        .with_threads(args.threads)
        .with_skip_larger(args.skip_larger);
    Ok(options)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "epub_squeeze=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
