use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;

use crate::device::{DeviceProfile, Sensor, SensorKind, StreamKind, StreamProfile};
use crate::error::{DepthcutError, Result};
use crate::frame::{AlignedFrames, ColorFrame, DepthFrame};
use crate::metadata::{FrameMetadata, MetadataAttribute};
use crate::source::{FrameSet, FrameSource};

pub(crate) const RECORDING_HEADER_SIZE: usize = 64;
pub(crate) const RECORDING_MAGIC: &[u8; 12] = b"DEPTHCUT-REC";
pub(crate) const RECORDING_VERSION: u32 = 1;
pub(crate) const FRAME_COUNT_OFFSET: u64 = 36;
pub(crate) const DEVICE_NAME_LEN: usize = 24;

/// Supported-attribute bitmask plus one i64 slot per attribute.
pub(crate) const METADATA_BLOCK_SIZE: usize = 4 + 8 * MetadataAttribute::ALL.len();

/// Recording file header (64 bytes).
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingHeader {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel of the recorded video stream (1..=4).
    pub bytes_per_pixel: u32,
    /// Stream the depth frames were aligned to.
    pub stream: StreamKind,
    /// Meters per depth unit.
    pub depth_scale: f32,
    pub frame_count: u32,
    pub device_name: String,
}

impl RecordingHeader {
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        stream: StreamKind,
        depth_scale: f32,
    ) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel,
            stream,
            depth_scale,
            frame_count: 0,
            device_name: "Recording".into(),
        }
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn depth_byte_size(&self) -> usize {
        self.pixel_count() * 2
    }

    pub fn color_byte_size(&self) -> usize {
        self.pixel_count() * self.bytes_per_pixel as usize
    }

    /// Total bytes per frame: two metadata blocks, depth, color.
    pub fn frame_byte_size(&self) -> usize {
        2 * METADATA_BLOCK_SIZE + self.depth_byte_size() + self.color_byte_size()
    }

    /// Profile presented when replaying: one depth sensor carrying the
    /// recorded scale, plus the depth and recorded video streams.
    pub fn device_profile(&self) -> DeviceProfile {
        let mut sensors = vec![Sensor::new(
            "Stereo Module",
            SensorKind::Depth {
                depth_scale: self.depth_scale,
            },
        )];
        if self.stream == StreamKind::Color {
            sensors.push(Sensor::new("RGB Camera", SensorKind::Color));
        }

        let stream = |unique_id, stream| StreamProfile {
            unique_id,
            stream,
            width: self.width,
            height: self.height,
            fps: 0,
        };

        DeviceProfile {
            name: self.device_name.clone(),
            sensors,
            streams: vec![stream(0, StreamKind::Depth), stream(1, self.stream)],
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DepthcutError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.bytes_per_pixel == 0 || self.bytes_per_pixel > 4 {
            return Err(DepthcutError::InvalidBytesPerPixel(self.bytes_per_pixel));
        }
        if !self.stream.is_video() || self.stream == StreamKind::Depth {
            return Err(DepthcutError::InvalidRecording(format!(
                "{} is not a stream depth can be aligned to",
                self.stream
            )));
        }
        if !(self.depth_scale.is_finite() && self.depth_scale > 0.0) {
            return Err(DepthcutError::InvalidRecording(format!(
                "Depth scale must be positive, got {}",
                self.depth_scale
            )));
        }
        Ok(())
    }
}

/// Memory-mapped recording reader. Replays frames in order as a
/// [`FrameSource`].
pub struct RecordingReader {
    mmap: Mmap,
    pub header: RecordingHeader,
    profile: DeviceProfile,
    cursor: usize,
}

impl RecordingReader {
    /// Open a recording and validate its header and length.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < RECORDING_HEADER_SIZE {
            return Err(DepthcutError::InvalidRecording(
                "File too small for recording header".into(),
            ));
        }
        if &mmap[0..12] != RECORDING_MAGIC {
            return Err(DepthcutError::InvalidRecording(
                "Missing DEPTHCUT-REC magic".into(),
            ));
        }

        let header = parse_header(&mmap[..RECORDING_HEADER_SIZE])?;

        let expected = header
            .frame_byte_size()
            .checked_mul(header.frame_count as usize)
            .and_then(|n| n.checked_add(RECORDING_HEADER_SIZE))
            .ok_or_else(|| DepthcutError::InvalidRecording("Frame size overflow".into()))?;
        if mmap.len() < expected {
            return Err(DepthcutError::InvalidRecording(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        let profile = header.device_profile();
        Ok(Self {
            mmap,
            header,
            profile,
            cursor: 0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Restart replay from the first frame.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Raw bytes of one frame record (zero-copy from the mapping).
    fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let total = self.frame_count();
        if index >= total {
            return Err(DepthcutError::FrameIndexOutOfRange { index, total });
        }
        let size = self.header.frame_byte_size();
        let offset = RECORDING_HEADER_SIZE + index * size;
        Ok(&self.mmap[offset..offset + size])
    }

    /// Decode frame `index` into its depth and video frames.
    pub fn read_frame(&self, index: usize) -> Result<(DepthFrame, ColorFrame)> {
        let raw = self.frame_raw(index)?;
        let (depth_meta, rest) = raw.split_at(METADATA_BLOCK_SIZE);
        let (color_meta, rest) = rest.split_at(METADATA_BLOCK_SIZE);
        let (depth_bytes, color_bytes) = rest.split_at(self.header.depth_byte_size());

        let samples = depth_bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        let mut depth = DepthFrame::new(self.header.width, self.header.height, samples)?;
        depth.metadata = decode_metadata(depth_meta)?;

        let mut color = ColorFrame::new(
            self.header.width,
            self.header.height,
            self.header.bytes_per_pixel as usize,
            color_bytes.to_vec(),
        )?;
        color.metadata = decode_metadata(color_meta)?;

        Ok((depth, color))
    }

    /// Decode frame `index` as an already aligned pair.
    pub fn read_aligned(&self, index: usize) -> Result<AlignedFrames> {
        let (depth, color) = self.read_frame(index)?;
        AlignedFrames::new(depth, color, self.header.stream)
    }
}

impl FrameSource for RecordingReader {
    fn wait_for_frames(&mut self) -> Result<Option<FrameSet>> {
        if self.cursor >= self.frame_count() {
            return Ok(None);
        }
        let (depth, color) = self.read_frame(self.cursor)?;
        self.cursor += 1;
        Ok(Some(
            FrameSet::new()
                .with_depth(depth)
                .with_frame(self.header.stream, color),
        ))
    }

    fn active_profile(&self) -> &DeviceProfile {
        &self.profile
    }

    fn frames_remaining(&self) -> Option<usize> {
        Some(self.frame_count() - self.cursor)
    }
}

fn parse_header(buf: &[u8]) -> Result<RecordingHeader> {
    let mut cursor = Cursor::new(&buf[12..]); // skip magic

    let version = cursor.read_u32::<LittleEndian>()?;
    if version != RECORDING_VERSION {
        return Err(DepthcutError::InvalidRecording(format!(
            "Unsupported version {version}"
        )));
    }
    let width = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let bytes_per_pixel = cursor.read_u32::<LittleEndian>()?;
    let stream_code = cursor.read_u32::<LittleEndian>()?;
    let depth_scale = cursor.read_f32::<LittleEndian>()?;
    let frame_count = cursor.read_u32::<LittleEndian>()?;

    let stream = StreamKind::from_code(stream_code).ok_or_else(|| {
        DepthcutError::InvalidRecording(format!("Unknown stream code {stream_code}"))
    })?;
    let start = FRAME_COUNT_OFFSET as usize + 4;
    let device_name = read_fixed_string(&buf[start..start + DEVICE_NAME_LEN]);

    let header = RecordingHeader {
        width,
        height,
        bytes_per_pixel,
        stream,
        depth_scale,
        frame_count,
        device_name,
    };
    header.validate()?;
    Ok(header)
}

fn decode_metadata(block: &[u8]) -> Result<FrameMetadata> {
    let mut cursor = Cursor::new(block);
    let supported = cursor.read_u32::<LittleEndian>()?;
    let mut metadata = FrameMetadata::new();
    for attr in MetadataAttribute::ALL {
        let value = cursor.read_i64::<LittleEndian>()?;
        if supported & (1 << attr.index()) != 0 {
            metadata.set(attr, value);
        }
    }
    Ok(metadata)
}

fn read_fixed_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).trim().to_string()
}
