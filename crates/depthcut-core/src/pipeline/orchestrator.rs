use tracing::{debug, info, warn};

use crate::error::{DepthcutError, Result};
use crate::frame::AlignedFrames;
use crate::refine::{extract_foreground, RefinementSolver};
use crate::segment::closest::{draw_centroid_marker, isolate_closest_band};
use crate::segment::clipping::remove_background_with_fill;
use crate::segment::colorize::equalized_grayscale;
use crate::segment::config::{SegmentationConfig, Strategy};
use crate::segment::seed::{label_histogram, SeedMaskBuilder};
use crate::session::{FramePoll, Session};
use crate::source::{Aligner, FrameSource};

use super::types::{ProgressReporter, RunSummary, SegmentedFrame};

/// Segment one aligned frame pair with the configured strategy.
///
/// `Clip` and `Closest` rewrite `frames.color` in place and return a copy of
/// the result. `Refine` leaves `frames.color` untouched and returns the
/// composite.
pub fn segment_frame(
    frames: &mut AlignedFrames,
    config: &SegmentationConfig,
    depth_scale: f32,
    solver: &mut dyn RefinementSolver,
) -> Result<SegmentedFrame> {
    match config.strategy {
        Strategy::Clip => {
            remove_background_with_fill(
                &mut frames.color,
                &frames.depth,
                depth_scale,
                config.clipping_distance,
                config.background_fill,
            )?;
            Ok(SegmentedFrame {
                index: 0,
                strategy: Strategy::Clip,
                image: frames.color.clone(),
                band: None,
            })
        }
        Strategy::Closest => {
            let band = isolate_closest_band(
                &mut frames.color,
                &frames.depth,
                depth_scale,
                config.clipping_distance,
                config.slot_shift,
            )?;
            if config.mark_centroid {
                if let Some(centroid) = band.centroid {
                    draw_centroid_marker(&mut frames.color, centroid);
                }
            }
            Ok(SegmentedFrame {
                index: 0,
                strategy: Strategy::Closest,
                image: frames.color.clone(),
                band: Some(band),
            })
        }
        Strategy::Refine => {
            let colorized = equalized_grayscale(&frames.depth);
            let seed = SeedMaskBuilder::from_config(config).build(&colorized);
            let [bg, fg, pr_bg, pr_fg] = label_histogram(&seed);
            debug!(bg, fg, pr_bg, pr_fg, solver = solver.name(), "Seed mask built");

            let image = extract_foreground(solver, &frames.color, &seed, config.refine_iterations)?;
            Ok(SegmentedFrame {
                index: 0,
                strategy: Strategy::Refine,
                image,
                band: None,
            })
        }
    }
}

/// Drive the frame loop until the source ends.
///
/// Warm-up never consumes the last frame of a finite source. Incomplete frame
/// sets and refinement failures skip the frame. Source, device and data errors
/// stop the run and are returned.
pub fn run_session<S, A, F>(
    session: &mut Session<S, A>,
    config: &SegmentationConfig,
    solver: &mut dyn RefinementSolver,
    reporter: &dyn ProgressReporter,
    mut on_frame: F,
) -> Result<RunSummary>
where
    S: FrameSource,
    A: Aligner,
    F: FnMut(&SegmentedFrame) -> Result<()>,
{
    config.validate()?;
    let changes_before = session.profile_changes();

    session.warm_up(warmup_budget(config.warmup_frames, session.frames_remaining()))?;
    reporter.begin(session.frames_remaining());
    info!(strategy = %config.strategy, "Segmentation started");

    let mut summary = RunSummary::default();
    let mut index = 0usize;

    loop {
        match session.poll()? {
            FramePoll::Finished => break,
            FramePoll::Skipped(reason) => {
                debug!(frame = index, %reason, "Frame set skipped");
                summary.skipped += 1;
            }
            FramePoll::Frame(mut frames) => {
                match segment_frame(&mut frames, config, session.depth_scale(), solver) {
                    Ok(mut segmented) => {
                        segmented.index = index;
                        on_frame(&segmented)?;
                        summary.processed += 1;
                    }
                    Err(DepthcutError::Refinement(reason)) => {
                        warn!(frame = index, %reason, "Refinement failed, frame skipped");
                        summary.refine_failures += 1;
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        index += 1;
        reporter.advance(index);
    }

    reporter.finish();
    summary.profile_changes = session.profile_changes() - changes_before;
    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        profile_changes = summary.profile_changes,
        "Segmentation finished"
    );
    Ok(summary)
}

/// Warm-up frames to discard. Replays are clamped so at least one frame is
/// left to segment.
fn warmup_budget(requested: usize, remaining: Option<usize>) -> usize {
    match remaining {
        Some(n) if requested >= n => {
            let clamped = n.saturating_sub(1);
            debug!(requested, clamped, "Warm-up clamped to recording length");
            clamped
        }
        _ => requested,
    }
}
