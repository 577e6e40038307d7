//! Frame acquisition seams: where synchronized frame sets come from and how
//! the depth frame is brought onto another stream's pixel grid.

use crate::device::{DeviceProfile, StreamKind};
use crate::error::Result;
use crate::frame::{ColorFrame, DepthFrame};

/// Frames captured together: at most one depth frame plus other video frames.
#[derive(Clone, Debug, Default)]
pub struct FrameSet {
    pub depth: Option<DepthFrame>,
    pub others: Vec<(StreamKind, ColorFrame)>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(mut self, depth: DepthFrame) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_frame(mut self, stream: StreamKind, frame: ColorFrame) -> Self {
        self.others.push((stream, frame));
        self
    }

    /// First frame of `stream`, if present.
    pub fn first(&self, stream: StreamKind) -> Option<&ColorFrame> {
        self.others
            .iter()
            .find(|(kind, _)| *kind == stream)
            .map(|(_, frame)| frame)
    }

    /// Remove and return the first frame of `stream`.
    pub fn take_first(&mut self, stream: StreamKind) -> Option<ColorFrame> {
        let pos = self.others.iter().position(|(kind, _)| *kind == stream)?;
        Some(self.others.remove(pos).1)
    }
}

/// A device (or recording) that yields synchronized frame sets.
pub trait FrameSource {
    /// Block until the next frame set is available. `Ok(None)` means the
    /// source has ended and no further frames will arrive.
    fn wait_for_frames(&mut self) -> Result<Option<FrameSet>>;

    /// Device and streams currently in use. May change between waits.
    fn active_profile(&self) -> &DeviceProfile;

    /// Frame sets still to come, when the source knows.
    fn frames_remaining(&self) -> Option<usize> {
        None
    }
}

/// Brings the depth frame of a set onto the pixel grid of `target`.
///
/// After a successful call, if both the depth frame and a `target` frame are
/// present they have identical width and height.
pub trait Aligner {
    fn align(&self, target: StreamKind, frames: FrameSet) -> Result<FrameSet>;
}

/// Nearest-neighbour resampling of depth onto the target stream's grid.
///
/// Assumes both sensors share a viewpoint and field of view. Frames that are
/// already the same size pass through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridAligner;

impl Aligner for GridAligner {
    fn align(&self, target: StreamKind, mut frames: FrameSet) -> Result<FrameSet> {
        let (tw, th) = match frames.first(target) {
            Some(other) => (other.width(), other.height()),
            None => return Ok(frames),
        };
        let Some(depth) = frames.depth.take() else {
            return Ok(frames);
        };
        if depth.width() == tw && depth.height() == th {
            frames.depth = Some(depth);
            return Ok(frames);
        }

        let (sw, sh) = (depth.width() as u64, depth.height() as u64);
        let mut data = Vec::with_capacity(tw as usize * th as usize);
        for y in 0..th {
            let sy = (y as u64 * sh / th as u64) as u32;
            for x in 0..tw {
                let sx = (x as u64 * sw / tw as u64) as u32;
                data.push(depth.get(sx, sy));
            }
        }

        let mut resampled = DepthFrame::new(tw, th, data)?;
        resampled.metadata = depth.metadata;
        tracing::debug!(from_w = sw, from_h = sh, to_w = tw, to_h = th, "Depth resampled");
        frames.depth = Some(resampled);
        Ok(frames)
    }
}
