mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depthcut", about = "Depth-guided foreground segmentation")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show recording header information
    Info(commands::info::InfoArgs),
    /// Segment every frame of a recording
    Run(commands::run::RunArgs),
    /// Build a seed mask from a colorized depth image
    Mask(commands::mask::MaskArgs),
    /// Export the depth histogram of one recorded frame as CSV
    Histogram(commands::histogram::HistogramArgs),
    /// Export the metadata of one recorded frame as CSV
    Metadata(commands::metadata::MetadataArgs),
    /// Pack a depth image and a color image into a one-frame recording
    Pack(commands::pack::PackArgs),
    /// Print or save the default segmentation config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Mask(args) => commands::mask::run(args),
        Commands::Histogram(args) => commands::histogram::run(args),
        Commands::Metadata(args) => commands::metadata::run(args),
        Commands::Pack(args) => commands::pack::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
