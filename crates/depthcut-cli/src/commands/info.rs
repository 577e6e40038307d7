use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use depthcut_core::io::RecordingReader;

#[derive(Args)]
pub struct InfoArgs {
    /// Input recording (.dcr)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = RecordingReader::open(&args.file)?;
    let header = &reader.header;

    println!("File:         {}", args.file.display());
    println!("Device:       {}", header.device_name);
    println!("Frames:       {}", reader.frame_count());
    println!("Dimensions:   {}x{}", header.width, header.height);
    println!("Aligned to:   {}", header.stream);
    println!("Bytes/pixel:  {}", header.bytes_per_pixel);
    println!("Depth scale:  {} m/unit", header.depth_scale);

    let total_mb = (header.frame_byte_size() * reader.frame_count()) as f64 / (1024.0 * 1024.0);
    println!("Data size:    {:.1} MB", total_mb);

    Ok(())
}
