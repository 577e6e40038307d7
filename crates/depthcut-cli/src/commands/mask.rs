use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use depthcut_core::consts::{DEFAULT_EROSION_SIZE, DEFAULT_FAR_THRESHOLD, DEFAULT_NEAR_THRESHOLD};
use depthcut_core::io::image_io::{load_colorized_depth, save_seed_mask_png};
use depthcut_core::segment::seed::label_histogram;
use depthcut_core::segment::SeedMaskBuilder;

#[derive(Args)]
pub struct MaskArgs {
    /// Colorized depth image (white = near)
    pub file: PathBuf,

    /// Gray level at or above which a pixel is certain foreground
    #[arg(long, default_value_t = DEFAULT_NEAR_THRESHOLD)]
    pub near: u8,

    /// Gray level at or below which a pixel is far
    #[arg(long, default_value_t = DEFAULT_FAR_THRESHOLD)]
    pub far: u8,

    /// Closing structuring element size
    #[arg(long, default_value_t = DEFAULT_EROSION_SIZE)]
    pub erosion_size: usize,

    /// Output seed mask visualization (PNG)
    #[arg(short, long, default_value = "seed.png")]
    pub output: PathBuf,
}

pub fn run(args: &MaskArgs) -> Result<()> {
    let colorized = load_colorized_depth(&args.file)?;
    let builder = SeedMaskBuilder {
        near_threshold: args.near,
        far_threshold: args.far,
        erosion_size: args.erosion_size,
    };
    let mask = builder.build(&colorized);
    save_seed_mask_png(&mask, &args.output)?;

    let [bg, fg, pr_bg, pr_fg] = label_histogram(&mask);
    println!("Background:           {bg}");
    println!("Probable background:  {pr_bg}");
    println!("Probable foreground:  {pr_fg}");
    println!("Foreground:           {fg}");
    println!("\nSeed mask saved to {}", args.output.display());

    Ok(())
}
