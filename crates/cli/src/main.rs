use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use gesture_ascii_core::capture::domain::frame_source::FrameSource;
use gesture_ascii_core::capture::infrastructure::image_sequence_source::ImageSequenceSource;
use gesture_ascii_core::pipeline::image_processor::ImageProcessor;
use gesture_ascii_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use gesture_ascii_core::pipeline::session_runner::{SessionConfig, SessionRunner};
use gesture_ascii_core::shared::config::ProcessorConfig;
use gesture_ascii_core::transport::domain::result_sink::ResultSink;
use gesture_ascii_core::transport::infrastructure::json_lines_sink::JsonLinesSink;
use gesture_ascii_core::transport::infrastructure::text_grid_sink::TextGridSink;
use gesture_ascii_core::vision::infrastructure::imageproc_primitives::ImageprocPrimitives;

/// Renders frames as ASCII art themed and sized by hand gestures.
#[derive(Parser)]
#[command(name = "gesture-ascii")]
struct Cli {
    /// Input image, or a directory of frames played in name order.
    input: PathBuf,

    /// JSON config file (defaults to the per-user config if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json (one object per line) or text.
    #[arg(long, default_value = "json")]
    format: String,

    /// Cap delivery at this many frames per second.
    #[arg(long)]
    fps: Option<f64>,

    /// Play the input this many times.
    #[arg(long, default_value = "1")]
    loops: usize,

    /// Override the narrowest grid width.
    #[arg(long)]
    min_width: Option<u32>,

    /// Override the widest grid width.
    #[arg(long)]
    max_width: Option<u32>,

    /// Log per-stage timings at the end of the session.
    #[arg(long)]
    summary: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;

    let mut source: Box<dyn FrameSource> = Box::new(ImageSequenceSource::new(cli.loops));
    let metadata = source.open(&cli.input)?;
    log::info!(
        "Opened {} ({}x{}, {} frames)",
        cli.input.display(),
        metadata.width,
        metadata.height,
        metadata
            .total_frames
            .map_or_else(|| "unknown".to_string(), |n| n.to_string())
    );

    let mut processor = ImageProcessor::new(config, Box::new(ImageprocPrimitives::new()))
        .with_logger(Box::new(StdoutPipelineLogger::default()));

    let stdout = BufWriter::new(io::stdout());
    let mut sink: Box<dyn ResultSink> = if cli.format == "text" {
        Box::new(TextGridSink::new(stdout))
    } else {
        Box::new(JsonLinesSink::new(stdout))
    };

    let mut session = SessionConfig::default();
    if let Some(fps) = cli.fps {
        session = session.with_fps(fps);
    }

    let stats = SessionRunner::new(session).run(
        source,
        &mut processor,
        sink.as_mut(),
        metadata.total_frames,
    )?;

    if cli.summary {
        processor.logger().summary();
    }
    if stats.processed == 0 && stats.skipped + stats.failed > 0 {
        return Err(format!(
            "no frame could be rendered ({} skipped, {} failed)",
            stats.skipped, stats.failed
        )
        .into());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ProcessorConfig, Box<dyn std::error::Error>> {
    let mut config = ProcessorConfig::load_or_default(cli.config.as_deref())?;
    if let Some(min) = cli.min_width {
        config.min_width = min;
    }
    if let Some(max) = cli.max_width {
        config.max_width = max;
    }
    config.validate()?;
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if cli.format != "json" && cli.format != "text" {
        return Err(format!("Format must be 'json' or 'text', got '{}'", cli.format).into());
    }
    if let Some(fps) = cli.fps {
        if !(fps > 0.0 && fps.is_finite()) {
            return Err(format!("FPS must be a positive number, got {fps}").into());
        }
    }
    if cli.loops == 0 {
        return Err("Loops must be at least 1".into());
    }
    if let (Some(min), Some(max)) = (cli.min_width, cli.max_width) {
        if min > max {
            return Err(format!("--min-width ({min}) exceeds --max-width ({max})").into());
        }
    }
    Ok(())
}
