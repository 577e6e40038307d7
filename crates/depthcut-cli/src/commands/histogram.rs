use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use depthcut_core::consts::{DEFAULT_CLIPPING_DISTANCE, DEFAULT_SLOT_SHIFT};
use depthcut_core::io::RecordingReader;
use depthcut_core::segment::DepthHistogram;

#[derive(Args)]
pub struct HistogramArgs {
    /// Input recording (.dcr)
    pub file: PathBuf,

    /// Frame index
    #[arg(long, default_value = "0")]
    pub frame: usize,

    /// Clipping distance in meters
    #[arg(long, default_value_t = DEFAULT_CLIPPING_DISTANCE)]
    pub clip: f32,

    /// Slot width is 2^shift depth units
    #[arg(long, default_value_t = DEFAULT_SLOT_SHIFT)]
    pub slot_shift: u32,

    /// Output CSV file
    #[arg(short, long, default_value = "histogram.csv")]
    pub output: PathBuf,
}

pub fn run(args: &HistogramArgs) -> Result<()> {
    let reader = RecordingReader::open(&args.file)?;
    let frames = reader.read_aligned(args.frame)?;

    let histogram = DepthHistogram::build(
        &frames.depth,
        reader.header.depth_scale,
        args.clip,
        args.slot_shift,
    )?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    histogram.write_csv(&mut writer)?;
    writer.flush()?;

    let (slot, count) = histogram.band();
    let range = histogram.slot_range(slot);
    println!(
        "Closest band: slot {} ({}..{} units), {} of {} pixels",
        slot,
        range.start,
        range.end,
        count,
        histogram.total()
    );
    println!("Histogram saved to {}", args.output.display());

    Ok(())
}
