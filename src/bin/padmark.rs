use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use padmark::{
    BorderColor, ConsoleSink, DEFAULT_JPEG_QUALITY, DEFAULT_WATERMARK_OPACITY,
    DEFAULT_WATERMARK_RATIO, JsonLinesSink, OutcomeSink, ProcessingConfig, WatermarkSpec,
};

#[derive(Parser, Debug)]
#[command(
    name = "padmark",
    version,
    about = "Pad every image in a folder to a square and optionally watermark it"
)]
struct Cli {
    /// Folder containing the images to process.
    input: String,

    /// Watermark image placed in the bottom-right corner.
    #[arg(long)]
    watermark: Option<String>,

    /// Output folder (created if absent). Defaults to the input folder.
    #[arg(long)]
    output: Option<String>,

    /// Delete each original after its output was written.
    #[arg(long)]
    delete_originals: bool,

    /// Border color: a name (white, black, ...) or hex (#RRGGBB).
    #[arg(long, default_value = "white")]
    color: BorderColor,

    /// Watermark opacity, 0.0 to 1.0.
    #[arg(long, default_value_t = DEFAULT_WATERMARK_OPACITY)]
    opacity: f64,

    /// Watermark width as a fraction of the squared image width, 0.0 to 1.0.
    #[arg(long, default_value_t = DEFAULT_WATERMARK_RATIO)]
    ratio: f64,

    /// JPEG quality, 1 to 100.
    #[arg(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Worker threads. Defaults to the host parallelism.
    #[arg(long)]
    workers: Option<usize>,

    /// Emit one JSON object per line instead of status text.
    #[arg(long)]
    json: bool,

    /// Exit with status 2 when any file failed.
    #[arg(long)]
    fail_on_error: bool,
}

fn cli_path(raw: &str) -> PathBuf {
    PathBuf::from(padmark::paths::normalize_cli_path(raw))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    padmark::logging::init("warn");

    let mut config = ProcessingConfig::new(cli_path(&cli.input));
    config.output_dir = cli.output.as_deref().map(cli_path);
    config.border_color = cli.color;
    config.jpeg_quality = cli.quality;
    config.delete_originals = cli.delete_originals;
    config.worker_count = cli.workers;

    let watermark = cli.watermark.as_deref().map(|raw| WatermarkSpec {
        path: cli_path(raw),
        size_ratio: cli.ratio,
        opacity: cli.opacity,
    });

    let stdout = io::stdout();
    let mut sink: Box<dyn OutcomeSink> = if cli.json {
        Box::new(JsonLinesSink::new(stdout))
    } else {
        Box::new(ConsoleSink::new(stdout))
    };

    let summary = match padmark::run_batch(&config, watermark.as_ref(), sink.as_mut()) {
        Ok(summary) => summary,
        Err(e) if e.is_fatal() => {
            eprintln!("error: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(anyhow::Error::new(e).context("batch aborted")),
    };

    if cli.fail_on_error && summary.has_failures() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
