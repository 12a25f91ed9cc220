//! screengrab: one-shot screen grabs and capture backend benchmarks
//!
//! Logs go to stderr (`RUST_LOG` overrides the default filter) so that
//! `bench --json` output on stdout stays machine-readable.

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use screengrab_core::{
    capture::{check_backend, take_screenshot},
    config::BenchmarkConfig,
    error::CaptureError,
    model::{BackendKind, BenchmarkResult, CaptureArea, ColorOrder, Region},
    perf::{CancelFlag, compare_backends, measure_operation},
    util::encode::write_png,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "screengrab_cli=info,screengrab_core=info";

#[derive(Parser)]
#[command(name = "screengrab")]
#[command(version, about = "Screen-region capture and capture backend benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture once and save the frame as PNG
    Grab {
        /// Region as LEFT,TOP,WIDTH,HEIGHT; omit for full screen
        #[arg(long)]
        region: Option<Region>,
        /// Channel order of the captured buffer (rgb or bgr)
        #[arg(long, default_value = "bgr")]
        color: String,
        /// Capture backend (scrap or xcap)
        #[arg(long, default_value = "scrap")]
        backend: String,
        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Measure capture throughput of one or both backends
    Bench(BenchArgs),
    /// Check which capture backends can run here
    Check,
}

#[derive(Args)]
struct BenchArgs {
    /// JSON benchmark configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Region as LEFT,TOP,WIDTH,HEIGHT or 'fullscreen'
    #[arg(long)]
    region: Option<CaptureArea>,
    /// Seconds to run each backend
    #[arg(long)]
    duration: Option<f64>,
    /// Benchmark only this backend; both run in sequence otherwise
    #[arg(long)]
    backend: Option<BackendKind>,
    /// Channel order of captured buffers (rgb or bgr)
    #[arg(long)]
    color: Option<ColorOrder>,
    /// Write preview frames to this PNG file
    #[arg(long)]
    preview: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Grab {
            region,
            color,
            backend,
            out,
        } => grab(region, color, backend, out).await,
        Commands::Bench(args) => bench(args).await,
        Commands::Check => check(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        if let Some(capture_error) = e.downcast_ref::<CaptureError>() {
            eprintln!("Hint: {}", capture_error.remediation_hint());
        }
        process::exit(1);
    }
}

async fn grab(region: Option<Region>, color: String, backend: String, out: PathBuf) -> Result<()> {
    // Backends hold OS handles that must stay on one thread
    let (frame, timing) = tokio::task::spawn_blocking(move || {
        measure_operation("grab", || take_screenshot(region, &color, &backend))
    })
    .await
    .context("capture thread panicked")??;

    let (width, height) = frame.dimensions();
    info!("Captured {}x{} in {}ms", width, height, timing.duration_ms());

    let bytes = write_png(&frame, &out)?;
    println!("✓ Screenshot saved to {} ({} bytes)", out.display(), bytes);
    Ok(())
}

async fn bench(args: BenchArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BenchmarkConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BenchmarkConfig::default(),
    };
    config.apply_env_overrides()?;

    if let Some(region) = args.region {
        config.region = region;
    }
    if let Some(duration) = args.duration {
        config.duration_seconds = duration;
    }
    if let Some(backend) = args.backend {
        config.backend = Some(backend);
    }
    if let Some(color) = args.color {
        config.color = color;
    }
    if let Some(preview) = args.preview {
        config.preview_path = Some(preview);
    }
    config.validate()?;

    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current frame");
            on_signal.cancel();
        }
    });

    let kinds = config.backends();
    let results = tokio::task::spawn_blocking(move || {
        compare_backends(&kinds, config.region, config.color, &config, &cancel)
    })
    .await
    .context("benchmark thread panicked")??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    Ok(())
}

fn print_results(results: &[BenchmarkResult]) {
    println!("\n=== Results ===");
    for result in results {
        let note = if result.cancelled { " (cancelled)" } else { "" };
        println!("{}{}", result.summary_line(), note);
    }
}

fn check() -> Result<()> {
    let mut available = 0;

    for kind in BackendKind::ALL {
        match check_backend(kind) {
            Ok(()) => {
                available += 1;
                println!("✓ {}: ready", kind);
            }
            Err(e) => {
                println!("✗ {}: {}", kind, e);
                println!("  Hint: {}", e.remediation_hint());
            }
        }
    }

    if available == 0 {
        anyhow::bail!("no capture backend is usable on this machine");
    }
    Ok(())
}
