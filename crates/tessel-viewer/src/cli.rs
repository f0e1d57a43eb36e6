// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "tessel-viewer")]
#[command(about = "Textured primitive viewer", long_about = None)]
pub struct Cli {
    /// Image files for the catalog: the second one is the filter/wrap
    /// comparison image. Missing files leave their shapes untextured.
    #[arg(
        long,
        num_args = 1..,
        default_values = ["Sunrise.jpg", "checkerboard.jpg", "cut_teapot.jpg", "taj_mahal.jpg"]
    )]
    pub images: Vec<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 780)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Number of lateral faces for the catalog cylinders
    #[arg(long = "cylinder-faces", default_value_t = 9)]
    pub cylinder_faces: u32,

    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,

    /// Render this many frames per scene without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u32>,
}
