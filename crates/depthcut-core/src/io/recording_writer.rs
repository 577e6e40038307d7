use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{DepthcutError, Result};
use crate::frame::{check_same_grid, ColorFrame, DepthFrame};
use crate::io::recording::{
    RecordingHeader, DEVICE_NAME_LEN, FRAME_COUNT_OFFSET, RECORDING_HEADER_SIZE,
    RECORDING_MAGIC, RECORDING_VERSION,
};
use crate::metadata::{FrameMetadata, MetadataAttribute};

/// Writes a recording file frame by frame.
pub struct RecordingWriter {
    writer: BufWriter<File>,
    header: RecordingHeader,
    frames_written: u32,
}

impl RecordingWriter {
    /// Create a new recording and write its header. The frame count is
    /// patched in by [`RecordingWriter::finalize`].
    pub fn create(path: &Path, header: &RecordingHeader) -> Result<Self> {
        header.validate()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Append one aligned depth/video pair. Both must match the header's
    /// dimensions and bytes per pixel.
    pub fn write_frame(&mut self, depth: &DepthFrame, color: &ColorFrame) -> Result<()> {
        check_same_grid(depth, color)?;
        if depth.width() != self.header.width || depth.height() != self.header.height {
            return Err(DepthcutError::InvalidDimensions {
                width: depth.width(),
                height: depth.height(),
            });
        }
        if color.bytes_per_pixel() != self.header.bytes_per_pixel as usize {
            return Err(DepthcutError::InvalidBytesPerPixel(
                color.bytes_per_pixel() as u32,
            ));
        }

        write_metadata(&mut self.writer, &depth.metadata)?;
        write_metadata(&mut self.writer, &color.metadata)?;
        for y in 0..depth.height() {
            for &sample in depth.row(y) {
                self.writer.write_u16::<LittleEndian>(sample)?;
            }
        }
        self.writer.write_all(color.as_raw())?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush, record the final frame count in the header and close the file.
    pub fn finalize(self) -> Result<()> {
        let mut file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
        file.write_u32::<LittleEndian>(self.frames_written)?;
        file.flush()?;
        tracing::debug!(frames = self.frames_written, "Recording finalized");
        Ok(())
    }
}

fn write_header(w: &mut impl Write, header: &RecordingHeader) -> Result<()> {
    w.write_all(RECORDING_MAGIC)?;
    w.write_u32::<LittleEndian>(RECORDING_VERSION)?;
    w.write_u32::<LittleEndian>(header.width)?;
    w.write_u32::<LittleEndian>(header.height)?;
    w.write_u32::<LittleEndian>(header.bytes_per_pixel)?;
    w.write_u32::<LittleEndian>(header.stream.code())?;
    w.write_f32::<LittleEndian>(header.depth_scale)?;
    w.write_u32::<LittleEndian>(header.frame_count)?;
    write_fixed_string(w, &header.device_name, DEVICE_NAME_LEN)?;

    debug_assert_eq!(12 + 4 * 7 + DEVICE_NAME_LEN, RECORDING_HEADER_SIZE);
    Ok(())
}

fn write_metadata(w: &mut impl Write, metadata: &FrameMetadata) -> Result<()> {
    let supported = metadata
        .iter()
        .fold(0u32, |mask, (attr, _)| mask | (1 << attr.index()));
    w.write_u32::<LittleEndian>(supported)?;
    for attr in MetadataAttribute::ALL {
        w.write_i64::<LittleEndian>(metadata.get(attr).unwrap_or(0))?;
    }
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    w.write_all(&vec![0u8; len - to_write])?;
    Ok(())
}
