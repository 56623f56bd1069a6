mod actions;
mod app;
mod config;
mod export;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use lucida_engine::device::GpuInit;
use lucida_engine::logging::{init_logging, LoggingConfig};
use lucida_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::config::{Cli, StudioConfig};

fn main() -> Result<()> {
    let config = StudioConfig::from(Cli::parse());

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let (width, height) = config.window_size;
    log::info!(
        "lucida-studio starting ({}x{}, exports to {})",
        width,
        height,
        config.export_dir.display()
    );

    let runtime = RuntimeConfig {
        title: "lucida".to_string(),
        initial_size: LogicalSize::new(width, height),
    };
    Runtime::run(runtime, GpuInit::default(), StudioApp::new(config))
}
