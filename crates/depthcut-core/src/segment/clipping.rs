use rayon::prelude::*;

use crate::consts::{DEFAULT_BACKGROUND_FILL, PARALLEL_PIXEL_THRESHOLD};
use crate::error::Result;
use crate::frame::{check_same_grid, ColorFrame, DepthFrame};

/// True when a raw depth unit is invalid or beyond the clipping distance.
#[inline]
pub fn is_background(unit: u16, depth_scale: f32, clipping_distance: f32) -> bool {
    let distance = unit as f32 * depth_scale;
    distance <= 0.0 || distance > clipping_distance
}

/// Paint every background pixel of `color` with `0x99` in all channels.
///
/// `color` is overwritten in place; copy it first if the original is still
/// needed. Returns the number of pixels painted.
pub fn remove_background(
    color: &mut ColorFrame,
    depth: &DepthFrame,
    depth_scale: f32,
    clipping_distance: f32,
) -> Result<usize> {
    remove_background_with_fill(
        color,
        depth,
        depth_scale,
        clipping_distance,
        DEFAULT_BACKGROUND_FILL,
    )
}

/// [`remove_background`] with a caller-chosen fill byte.
pub fn remove_background_with_fill(
    color: &mut ColorFrame,
    depth: &DepthFrame,
    depth_scale: f32,
    clipping_distance: f32,
    fill: u8,
) -> Result<usize> {
    check_same_grid(depth, color)?;

    let bpp = color.bytes_per_pixel();
    let stride = color.stride();
    let parallel = depth.pixel_count() >= PARALLEL_PIXEL_THRESHOLD;

    let clear_row = |(y, row): (usize, &mut [u8])| -> usize {
        let mut cleared = 0;
        for (pixel, &unit) in row.chunks_exact_mut(bpp).zip(depth.row(y as u32)) {
            if is_background(unit, depth_scale, clipping_distance) {
                pixel.fill(fill);
                cleared += 1;
            }
        }
        cleared
    };

    let cleared: usize = if parallel {
        color
            .as_raw_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .map(clear_row)
            .sum()
    } else {
        color
            .as_raw_mut()
            .chunks_mut(stride)
            .enumerate()
            .map(clear_row)
            .sum()
    };

    tracing::debug!(cleared, clipping_distance, "Background removed");
    Ok(cleared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_depth_is_background() {
        assert!(is_background(0, 0.001, 1.0));
    }

    #[test]
    fn test_exact_clipping_distance_is_kept() {
        assert!(!is_background(2, 0.5, 1.0));
        assert!(is_background(3, 0.5, 1.0));
    }
}
