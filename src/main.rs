//! Camera Preview CLI
//!
//! Command-line interface for testing and demonstrating the preview
//! pipeline against a mock camera device.

use camera_preview::{
    pipeline::{PreviewPipeline, PreviewSink},
    session::{CameraSession, FileConfig, HeadlessSurface, MockCamera},
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Demo driver for the camera preview pipeline.
#[derive(Debug, Parser)]
#[command(name = "camera-preview", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to process (overrides the config file).
    #[arg(long)]
    frames: Option<u32>,

    /// Run until interrupted instead of a fixed frame count.
    #[arg(long)]
    continuous: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Camera Preview v{}", camera_preview::VERSION);

    let file_config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let continuous = args.continuous || file_config.output.continuous;
    let frame_count = args.frames.unwrap_or(file_config.output.frame_count);

    info!("This is a demonstration using mock camera input");

    let Some(session) = CameraSession::open(
        Box::new(MockCamera::new()),
        file_config.preview.clone(),
    ) else {
        eprintln!("Camera unavailable, preview cannot start");
        std::process::exit(1);
    };

    let mut pipeline = PreviewPipeline::new(session, ConsoleSink::default());

    let surface = HeadlessSurface::new();
    pipeline.surface_created(&surface);

    if !pipeline.is_armed() {
        warn!("Preview did not start; tearing down");
        pipeline.surface_destroyed();
        std::process::exit(1);
    }

    let stop = Arc::new(AtomicBool::new(false));
    if continuous {
        let stop_flag = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop_flag.store(true, Ordering::SeqCst)) {
            warn!("Failed to install ctrl-c handler: {}", e);
        }
        info!("Processing frames until interrupted...");
    } else {
        info!("Processing {} frames...", frame_count);
    }

    let mut processed = 0u32;
    while !stop.load(Ordering::SeqCst) && (continuous || processed < frame_count) {
        match pipeline.capture_and_deliver() {
            Ok(true) => processed += 1,
            Ok(false) => break,
            Err(e) => {
                warn!("Frame {} failed: {}", processed, e);
            }
        }
    }

    info!(
        "Processed {} frames: {} delivered, {} dropped",
        processed,
        pipeline.frames_delivered(),
        pipeline.frames_dropped()
    );

    pipeline.surface_destroyed();
    info!("Done.");
}

/// Sink that logs a line per delivered frame.
#[derive(Debug, Default)]
struct ConsoleSink {
    delivered: u64,
}

impl PreviewSink for ConsoleSink {
    fn on_preview_frame(
        &mut self,
        image: &camera_preview::ConvertedImage,
        raw: &[u8],
        orientation: camera_preview::Orientation,
    ) {
        self.delivered += 1;
        info!(
            frame = self.delivered,
            width = image.width(),
            height = image.height(),
            bytes = raw.len(),
            orientation = orientation.degrees(),
            "preview frame delivered"
        );
    }
}
