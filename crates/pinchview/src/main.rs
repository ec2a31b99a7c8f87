use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pinchview_engine::config::{GpuInit, RuntimeConfig, ViewerConfig};
use pinchview_engine::logging::{init_logging, LoggingConfig};
use pinchview_engine::render::ShaderSource;
use pinchview_engine::window::{LogicalSize, Runtime};

/// Pan, pinch-zoom and rotate an image.
///
/// Touchpad: two-finger pan, pinch, rotate. Mouse: drag to pan, wheel to zoom.
#[derive(Debug, Parser)]
#[command(name = "pinchview", version, about)]
struct Cli {
    /// Image to display (PNG, JPEG, BMP or GIF).
    image: PathBuf,

    /// Window title; defaults to the image file name.
    #[arg(long)]
    title: Option<String>,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Log filter in env_logger syntax (overrides RUST_LOG).
    #[arg(long = "log")]
    log_filter: Option<String>,

    /// Replacement WGSL shader with `vs_main` and `fs_main` entry points.
    #[arg(long)]
    shader: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let title = cli.title.clone().unwrap_or_else(|| {
        cli.image
            .file_name()
            .map(|n| format!("pinchview - {}", n.to_string_lossy()))
            .unwrap_or_else(|| "pinchview".to_string())
    });

    let runtime = RuntimeConfig {
        title,
        initial_size: LogicalSize::new(cli.width, cli.height),
    };

    let mut viewer = ViewerConfig::from_path(cli.image.clone());
    if let Some(path) = &cli.shader {
        let wgsl = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader {}", path.display()))?;
        viewer = viewer.with_shader(ShaderSource::custom(path.display().to_string(), wgsl));
    }

    log::info!("opening {}", cli.image.display());
    Runtime::run(runtime, GpuInit::default(), viewer)
}
