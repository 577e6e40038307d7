use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use depthcut_core::device::StreamKind;
use depthcut_core::io::{save_metadata_csv, RecordingReader};

#[derive(Args)]
pub struct MetadataArgs {
    /// Input recording (.dcr)
    pub file: PathBuf,

    /// Frame index
    #[arg(long, default_value = "0")]
    pub frame: usize,

    /// Export the video frame's metadata instead of the depth frame's
    #[arg(long)]
    pub color: bool,

    /// Output CSV file
    #[arg(short, long, default_value = "metadata.csv")]
    pub output: PathBuf,
}

pub fn run(args: &MetadataArgs) -> Result<()> {
    let reader = RecordingReader::open(&args.file)?;
    let (depth, color) = reader.read_frame(args.frame)?;

    let (stream, metadata) = if args.color {
        (reader.header.stream, &color.metadata)
    } else {
        (StreamKind::Depth, &depth.metadata)
    };

    save_metadata_csv(&args.output, stream, metadata)?;
    println!(
        "{} metadata ({} attributes) saved to {}",
        stream,
        metadata.iter().count(),
        args.output.display()
    );

    Ok(())
}
