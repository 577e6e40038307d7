use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use depthcut_core::device::StreamKind;
use depthcut_core::io::image_io::{load_color_image, load_depth_png};
use depthcut_core::io::{RecordingHeader, RecordingWriter};

#[derive(Args)]
pub struct PackArgs {
    /// 16-bit depth image (raw depth units)
    pub depth: PathBuf,

    /// Color image aligned with the depth image
    pub color: PathBuf,

    /// Meters per depth unit
    #[arg(long, default_value = "0.001")]
    pub scale: f32,

    /// Device name stored in the header
    #[arg(long, default_value = "Recording")]
    pub device: String,

    /// Output recording (.dcr)
    #[arg(short, long, default_value = "frames.dcr")]
    pub output: PathBuf,
}

pub fn run(args: &PackArgs) -> Result<()> {
    let depth = load_depth_png(&args.depth)
        .with_context(|| format!("Failed to load depth {}", args.depth.display()))?;
    let color = load_color_image(&args.color)
        .with_context(|| format!("Failed to load color {}", args.color.display()))?;

    let header = RecordingHeader::new(
        color.width(),
        color.height(),
        color.bytes_per_pixel() as u32,
        StreamKind::Color,
        args.scale,
    )
    .with_device_name(&args.device);

    let mut writer = RecordingWriter::create(&args.output, &header)?;
    writer.write_frame(&depth, &color)?;
    writer.finalize()?;

    println!(
        "Packed {}x{} frame into {}",
        color.width(),
        color.height(),
        args.output.display()
    );
    Ok(())
}
