mod app;
mod catalog;
mod cli;
mod controls;
mod headless;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use tessel_engine::device::GpuInit;
use tessel_engine::logging::{LoggingConfig, init_logging};
use tessel_engine::render::OPTIONAL_FEATURES;
use tessel_engine::window::{Runtime, RuntimeConfig};

use crate::app::Viewer;
use crate::catalog::CatalogConfig;
use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let config = CatalogConfig {
        images: cli.images.clone(),
        cylinder_faces: cli.cylinder_faces,
    };

    if let Some(frames) = cli.headless {
        let reports = headless::run(&config, frames)?;
        log::info!("rendered {} scenes headless, {} frames each", reports.len(), frames);
        return Ok(());
    }

    let runtime = RuntimeConfig {
        title: "TextureDemo".to_string(),
        initial_size: LogicalSize::new(f64::from(cli.width), f64::from(cli.height)),
    };
    let gpu_init = GpuInit {
        optional_features: OPTIONAL_FEATURES,
        ..Default::default()
    };

    Runtime::run(runtime, gpu_init, Viewer::new(config))
}
