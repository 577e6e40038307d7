mod orchestrator;
mod types;

pub use orchestrator::{run_session, segment_frame};
pub use types::{NoOpReporter, ProgressReporter, RunSummary, SegmentedFrame};
