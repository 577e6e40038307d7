use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use depthcut_core::io::image_io::save_color_png;
use depthcut_core::io::RecordingReader;
use depthcut_core::pipeline::{run_session, ProgressReporter};
use depthcut_core::refine::NearestMeanSolver;
use depthcut_core::segment::{SegmentationConfig, Strategy};
use depthcut_core::session::Session;
use depthcut_core::source::GridAligner;
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::{print_run_config, print_run_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Clip,
    Closest,
    Refine,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Clip => Strategy::Clip,
            StrategyArg::Closest => Strategy::Closest,
            StrategyArg::Refine => Strategy::Refine,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input recording (.dcr)
    pub file: PathBuf,

    /// Segmentation config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Segmentation strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Clipping distance in meters
    #[arg(long)]
    pub clip: Option<f32>,

    /// Refinement solver iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Frame sets to discard before segmenting
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Mark the closest object's centroid
    #[arg(long)]
    pub mark_centroid: bool,

    /// Output directory for segmented frames
    #[arg(short, long, default_value = "segmented")]
    pub output: PathBuf,
}

struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin(&self, total_frames: Option<usize>) {
        if let Some(total) = total_frames {
            self.pb.set_length(total as u64);
        }
    }

    fn advance(&self, frames_done: usize) {
        self.pb.set_position(frames_done as u64);
    }

    fn finish(&self) {
        self.pb.finish_with_message("Done");
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;

    let reader = RecordingReader::open(&args.file)
        .with_context(|| format!("Failed to open recording {}", args.file.display()))?;
    let device_name = reader.header.device_name.clone();
    let mut session = Session::start(reader, GridAligner)?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    print_run_config(&config, &args.file, &args.output, &device_name);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Segmenting");
    let reporter = BarReporter { pb };

    let mut solver = NearestMeanSolver;
    let summary = run_session(&mut session, &config, &mut solver, &reporter, |frame| {
        let path = args.output.join(format!("frame-{:05}.png", frame.index));
        save_color_png(&frame.image, &path)?;
        Ok(())
    })?;

    print_run_summary(&summary, &args.output);
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<SegmentationConfig> {
    let mut config: SegmentationConfig = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid segmentation config")?
    } else {
        SegmentationConfig::default()
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(clip) = args.clip {
        config.set_clipping_distance(clip)?;
    }
    if let Some(iterations) = args.iterations {
        config.refine_iterations = iterations;
    }
    if let Some(warmup) = args.warmup {
        config.warmup_frames = warmup;
    }
    if args.mark_centroid {
        config.mark_centroid = true;
    }

    config.validate()?;
    tracing::debug!(?config, "Resolved segmentation config");
    Ok(config)
}
