use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::device::StreamKind;
use crate::error::Result;
use crate::metadata::FrameMetadata;

/// Write one frame's supported metadata as CSV: a stream line, a column
/// header, then one `name,value` row per supported attribute.
pub fn write_metadata_csv<W: Write>(
    writer: &mut W,
    stream: StreamKind,
    metadata: &FrameMetadata,
) -> Result<()> {
    writeln!(writer, "Stream,{stream}")?;
    writeln!(writer, "Metadata Attribute,Value")?;
    for (attr, value) in metadata.iter() {
        writeln!(writer, "{attr},{value}")?;
    }
    Ok(())
}

pub fn save_metadata_csv(path: &Path, stream: StreamKind, metadata: &FrameMetadata) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_metadata_csv(&mut writer, stream, metadata)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataAttribute;

    #[test]
    fn test_metadata_csv_lists_supported_attributes_only() {
        let metadata = FrameMetadata::new()
            .with(MetadataAttribute::GainLevel, 16)
            .with(MetadataAttribute::FrameCounter, 42);
        let mut out = Vec::new();
        write_metadata_csv(&mut out, StreamKind::Depth, &metadata).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Stream,Depth\nMetadata Attribute,Value\nFrame Counter,42\nGain Level,16\n"
        );
    }

    #[test]
    fn test_metadata_csv_empty_metadata_has_headers() {
        let mut out = Vec::new();
        write_metadata_csv(&mut out, StreamKind::Color, &FrameMetadata::new()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Stream,Color\nMetadata Attribute,Value\n"
        );
    }
}
