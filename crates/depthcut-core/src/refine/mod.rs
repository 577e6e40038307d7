//! Mask refinement: hand a seed mask to an iterative solver and composite the
//! pixels it accepts as foreground.

mod nearest_mean;

pub use nearest_mean::NearestMeanSolver;

use rayon::prelude::*;

use crate::error::{DepthcutError, Result};
use crate::frame::ColorFrame;
use crate::segment::seed::SeedMask;

/// An iterative seed-mask refinement algorithm (grab-cut style).
///
/// Given a color image, a four-label seed mask of the same shape and an
/// iteration count, returns a refined four-label mask of the same shape.
pub trait RefinementSolver {
    fn name(&self) -> &str;

    fn refine(&mut self, color: &ColorFrame, seed: &SeedMask, iterations: usize)
        -> Result<SeedMask>;
}

/// Run `solver` on `seed` and composite the accepted foreground of `color`.
pub fn extract_foreground(
    solver: &mut dyn RefinementSolver,
    color: &ColorFrame,
    seed: &SeedMask,
    iterations: usize,
) -> Result<ColorFrame> {
    let expected = (color.height() as usize, color.width() as usize);
    if seed.dim() != expected {
        return Err(DepthcutError::ShapeMismatch {
            expected,
            actual: seed.dim(),
        });
    }

    let refined = solver.refine(color, seed, iterations)?;
    if refined.dim() != expected {
        return Err(DepthcutError::Refinement(format!(
            "{} returned a {:?} mask for a {:?} image",
            solver.name(),
            refined.dim(),
            expected
        )));
    }

    composite_foreground(color, &refined)
}

/// Copy of `color` with every pixel not labelled (probable) foreground zeroed.
pub fn composite_foreground(color: &ColorFrame, mask: &SeedMask) -> Result<ColorFrame> {
    let expected = (color.height() as usize, color.width() as usize);
    if mask.dim() != expected {
        return Err(DepthcutError::ShapeMismatch {
            expected,
            actual: mask.dim(),
        });
    }

    let bpp = color.bytes_per_pixel();
    let stride = color.stride();
    let mut out = ColorFrame::zeroed(color.width(), color.height(), bpp)?;
    out.metadata = color.metadata.clone();

    out.as_raw_mut()
        .par_chunks_mut(stride)
        .zip(color.as_raw().par_chunks(stride))
        .enumerate()
        .for_each(|(row, (dst, src))| {
            for (col, (d, s)) in dst.chunks_exact_mut(bpp).zip(src.chunks_exact(bpp)).enumerate() {
                if mask[[row, col]].is_foreground() {
                    d.copy_from_slice(s);
                }
            }
        });

    Ok(out)
}
