use crate::frame::ColorFrame;
use crate::segment::closest::ClosestBand;
use crate::segment::config::Strategy;

/// One segmented frame.
#[derive(Clone, Debug)]
pub struct SegmentedFrame {
    /// Position of the frame among those polled after warm-up.
    pub index: usize,
    pub strategy: Strategy,
    /// Output image: the background-stripped color frame, or the composite.
    pub image: ColorFrame,
    /// Winning band, for [`Strategy::Closest`].
    pub band: Option<ClosestBand>,
}

/// Counters for a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    /// Frames dropped: incomplete frame sets plus refinement failures.
    pub skipped: usize,
    pub refine_failures: usize,
    pub profile_changes: usize,
}

/// Thread-safe progress reporting for a segmentation run.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// The run has started. `total_frames` is known for finite sources.
    fn begin(&self, _total_frames: Option<usize>) {}

    /// `frames_done` frame sets have been handled (processed or skipped).
    fn advance(&self, _frames_done: usize) {}

    fn finish(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
