use crate::device::StreamKind;
use crate::error::{DepthcutError, Result};
use crate::metadata::{FrameMetadata, MetadataAttribute};

/// A single depth frame. One raw 16-bit distance unit per pixel, 0 = no return.
#[derive(Clone, Debug)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    /// Row pitch in depth units (>= width).
    stride: usize,
    data: Vec<u16>,
    pub metadata: FrameMetadata,
}

impl DepthFrame {
    /// Tightly packed depth frame (stride == width).
    pub fn new(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        Self::with_stride(width, height, width as usize, data)
    }

    pub fn with_stride(width: u32, height: u32, stride: usize, data: Vec<u16>) -> Result<Self> {
        if width == 0 || height == 0 || stride < width as usize {
            return Err(DepthcutError::InvalidDimensions { width, height });
        }
        if data.len() != stride * height as usize {
            return Err(DepthcutError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
            metadata: FrameMetadata::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw depth unit at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u16 {
        self.data[y as usize * self.stride + x as usize]
    }

    /// Visible samples of row `y` (stride padding excluded).
    #[inline]
    pub fn row(&self, y: u32) -> &[u16] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Whole backing buffer, including stride padding.
    pub fn as_raw(&self) -> &[u16] {
        &self.data
    }

    pub fn supports_metadata(&self, attr: MetadataAttribute) -> bool {
        self.metadata.supports(attr)
    }

    pub fn metadata(&self, attr: MetadataAttribute) -> Option<i64> {
        self.metadata.get(attr)
    }
}

/// An interleaved 8-bit video frame (RGB, RGBA, infrared...), `bpp` bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFrame {
    width: u32,
    height: u32,
    bpp: usize,
    data: Vec<u8>,
    pub metadata: FrameMetadata,
}

impl ColorFrame {
    pub fn new(width: u32, height: u32, bpp: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DepthcutError::InvalidDimensions { width, height });
        }
        if bpp == 0 || bpp > 4 {
            return Err(DepthcutError::InvalidBytesPerPixel(bpp as u32));
        }
        if data.len() != width as usize * height as usize * bpp {
            return Err(DepthcutError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            bpp,
            data,
            metadata: FrameMetadata::default(),
        })
    }

    /// Frame of the given shape with every byte set to zero.
    pub fn zeroed(width: u32, height: u32, bpp: usize) -> Result<Self> {
        Self::new(
            width,
            height,
            bpp,
            vec![0; width as usize * height as usize * bpp],
        )
    }

    /// Frame filled with a single repeated pixel value.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        let data = pixel.repeat(width as usize * height as usize);
        Self::new(width, height, pixel.len(), data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bpp
    }

    /// Row pitch in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * self.bpp
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let offset = (y as usize * self.width as usize + x as usize) * self.bpp;
        &self.data[offset..offset + self.bpp]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let offset = (y as usize * self.width as usize + x as usize) * self.bpp;
        &mut self.data[offset..offset + self.bpp]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn supports_metadata(&self, attr: MetadataAttribute) -> bool {
        self.metadata.supports(attr)
    }

    pub fn metadata(&self, attr: MetadataAttribute) -> Option<i64> {
        self.metadata.get(attr)
    }
}

/// A depth frame and the video frame it was aligned to. Both share one pixel
/// grid: pixel `(x, y)` of the depth frame measures pixel `(x, y)` of `color`.
#[derive(Clone, Debug)]
pub struct AlignedFrames {
    pub depth: DepthFrame,
    pub color: ColorFrame,
    /// Stream the depth frame was aligned to.
    pub stream: StreamKind,
}

impl AlignedFrames {
    pub fn new(depth: DepthFrame, color: ColorFrame, stream: StreamKind) -> Result<Self> {
        check_same_grid(&depth, &color)?;
        Ok(Self {
            depth,
            color,
            stream,
        })
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    #[inline]
    pub fn depth_at(&self, x: u32, y: u32) -> u16 {
        self.depth.get(x, y)
    }
}

/// Fails unless `depth` and `color` have identical width and height.
pub fn check_same_grid(depth: &DepthFrame, color: &ColorFrame) -> Result<()> {
    if depth.width() != color.width() || depth.height() != color.height() {
        return Err(DepthcutError::DimensionMismatch {
            depth_width: depth.width(),
            depth_height: depth.height(),
            color_width: color.width(),
            color_height: color.height(),
        });
    }
    Ok(())
}
