use tracing::{debug, info};

use crate::device::{depth_scale, find_stream_to_align, profile_changed, DeviceProfile, StreamKind};
use crate::error::{DepthcutError, Result};
use crate::frame::AlignedFrames;
use crate::source::{Aligner, FrameSource};

/// Outcome of one wait on the frame source.
#[derive(Debug)]
#[allow(clippy::large_enum_variant)]
pub enum FramePoll {
    /// An aligned depth/video pair ready for segmentation.
    Frame(AlignedFrames),
    /// The depth or target frame was missing from this set; carries
    /// `FrameUnavailable` naming the missing stream.
    Skipped(DepthcutError),
    /// The source has ended.
    Finished,
}

/// Streaming state shared across frames: the active profile and what was
/// derived from it (depth scale, alignment target).
pub struct Session<S, A> {
    source: S,
    aligner: A,
    profile: DeviceProfile,
    depth_scale: f32,
    align_to: StreamKind,
    profile_changes: usize,
}

impl<S: FrameSource, A: Aligner> Session<S, A> {
    /// Derive depth scale and alignment target from the source's active
    /// profile. Fails before any frame is pulled if the device has no depth
    /// sensor or nothing to align depth with.
    pub fn start(source: S, aligner: A) -> Result<Self> {
        let profile = source.active_profile().clone();
        let depth_scale = depth_scale(&profile)?;
        let align_to = find_stream_to_align(&profile.streams)?;

        info!(
            device = %profile.name,
            depth_scale,
            align_to = %align_to,
            "Session started"
        );

        Ok(Self {
            source,
            aligner,
            profile,
            depth_scale,
            align_to,
            profile_changes: 0,
        })
    }

    pub fn depth_scale(&self) -> f32 {
        self.depth_scale
    }

    pub fn align_target(&self) -> StreamKind {
        self.align_to
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn profile_changes(&self) -> usize {
        self.profile_changes
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn frames_remaining(&self) -> Option<usize> {
        self.source.frames_remaining()
    }

    /// Discard up to `frames` frame sets. Returns how many were discarded.
    pub fn warm_up(&mut self, frames: usize) -> Result<usize> {
        let mut dropped = 0;
        while dropped < frames {
            if self.source.wait_for_frames()?.is_none() {
                break;
            }
            dropped += 1;
        }
        debug!(dropped, "Warm-up frames discarded");
        Ok(dropped)
    }

    /// Wait for the next frame set and align it.
    pub fn poll(&mut self) -> Result<FramePoll> {
        let Some(frames) = self.source.wait_for_frames()? else {
            return Ok(FramePoll::Finished);
        };

        // The source may have switched devices while we waited.
        self.refresh_profile()?;

        let mut processed = self.aligner.align(self.align_to, frames)?;
        let other = processed.take_first(self.align_to);
        let (depth, other) = match (processed.depth, other) {
            (Some(depth), Some(other)) => (depth, other),
            (None, _) => return Ok(missing(StreamKind::Depth)),
            (Some(_), None) => return Ok(missing(self.align_to)),
        };

        Ok(FramePoll::Frame(AlignedFrames::new(
            depth,
            other,
            self.align_to,
        )?))
    }

    fn refresh_profile(&mut self) -> Result<()> {
        if !profile_changed(&self.source.active_profile().streams, &self.profile.streams) {
            return Ok(());
        }
        let profile = self.source.active_profile().clone();
        self.align_to = find_stream_to_align(&profile.streams)?;
        self.depth_scale = depth_scale(&profile)?;
        self.profile = profile;
        self.profile_changes += 1;
        info!(
            device = %self.profile.name,
            depth_scale = self.depth_scale,
            align_to = %self.align_to,
            "Stream profile changed"
        );
        Ok(())
    }
}

fn missing(stream: StreamKind) -> FramePoll {
    FramePoll::Skipped(DepthcutError::FrameUnavailable { stream })
}
