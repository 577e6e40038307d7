//! Closest-object isolation.
//!
//! Valid depth pixels are bucketed into fixed-width slots of `1 << slot_shift`
//! depth units. The most populated slot is taken to be the nearest dense
//! object; every pixel outside that slot has its RGB channels zeroed.

use std::io::Write;
use std::ops::Range;

use rayon::prelude::*;

use crate::consts::{
    CENTROID_MARKER_FILL, CENTROID_MARKER_HALF_LENGTH, CENTROID_MARKER_HALF_THICKNESS,
    COLOR_CHANNEL_COUNT, MAX_DEPTH_UNIT, MAX_SLOT_SHIFT, PARALLEL_PIXEL_THRESHOLD,
};
use crate::error::{DepthcutError, Result};
use crate::frame::{check_same_grid, ColorFrame, DepthFrame};

use super::clipping::is_background;

/// Pixel counts per depth slot for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthHistogram {
    slots: Vec<u32>,
    slot_shift: u32,
}

impl DepthHistogram {
    /// Number of slots needed to cover every 16-bit depth unit.
    pub fn slot_count(slot_shift: u32) -> usize {
        (MAX_DEPTH_UNIT as usize >> slot_shift) + 1
    }

    /// Count pixels with `0 < unit * depth_scale <= clipping_distance`.
    ///
    /// Rows are counted into per-worker partial histograms that are summed
    /// afterwards, so the totals do not depend on the thread count.
    pub fn build(
        depth: &DepthFrame,
        depth_scale: f32,
        clipping_distance: f32,
        slot_shift: u32,
    ) -> Result<Self> {
        if slot_shift > MAX_SLOT_SHIFT {
            return Err(DepthcutError::InvalidConfig(format!(
                "slot_shift {slot_shift} exceeds {MAX_SLOT_SHIFT}"
            )));
        }
        let n = Self::slot_count(slot_shift);

        let count_row = |mut acc: Vec<u32>, y: u32| -> Vec<u32> {
            for &unit in depth.row(y) {
                if !is_background(unit, depth_scale, clipping_distance) {
                    acc[(unit >> slot_shift) as usize] += 1;
                }
            }
            acc
        };

        let slots = if depth.pixel_count() >= PARALLEL_PIXEL_THRESHOLD {
            (0..depth.height())
                .into_par_iter()
                .fold(|| vec![0u32; n], count_row)
                .reduce(
                    || vec![0u32; n],
                    |mut a, b| {
                        for (dst, src) in a.iter_mut().zip(b) {
                            *dst += src;
                        }
                        a
                    },
                )
        } else {
            (0..depth.height()).fold(vec![0u32; n], count_row)
        };

        Ok(Self { slots, slot_shift })
    }

    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    pub fn slot_shift(&self) -> u32 {
        self.slot_shift
    }

    /// Slot a raw depth unit falls into.
    #[inline]
    pub fn slot_of(&self, unit: u16) -> usize {
        (unit >> self.slot_shift) as usize
    }

    /// Sum of all slot counts.
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|&c| c as u64).sum()
    }

    /// The most populated slot and its count. On equal counts the lowest
    /// slot index wins; an empty histogram yields `(0, 0)`.
    pub fn band(&self) -> (usize, u32) {
        let mut best = 0;
        let mut best_count = 0;
        for (i, &count) in self.slots.iter().enumerate() {
            if count > best_count {
                best = i;
                best_count = count;
            }
        }
        (best, best_count)
    }

    /// Depth units covered by `slot`.
    pub fn slot_range(&self, slot: usize) -> Range<u32> {
        let start = (slot as u32) << self.slot_shift;
        start..start + (1u32 << self.slot_shift)
    }

    /// Write one slot count per line.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        for count in &self.slots {
            writeln!(writer, "{count}")?;
        }
        Ok(())
    }
}

/// Result of [`isolate_closest_band`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestBand {
    /// Winning histogram slot.
    pub slot: usize,
    /// Valid pixels counted in that slot.
    pub pixel_count: u32,
    /// Depth units covered by the slot.
    pub depth_range: Range<u32>,
    /// Mean `(x, y)` of the retained pixels, if any were retained.
    pub centroid: Option<(u32, u32)>,
}

/// Keep only the pixels whose depth falls in the most populated slot.
///
/// Every other pixel of `color` has its first three channels zeroed in place.
/// Pixels are matched by slot alone, so when slot 0 wins the invalid
/// (zero-depth) pixels are retained with it.
pub fn isolate_closest_band(
    color: &mut ColorFrame,
    depth: &DepthFrame,
    depth_scale: f32,
    clipping_distance: f32,
    slot_shift: u32,
) -> Result<ClosestBand> {
    check_same_grid(depth, color)?;

    let histogram = DepthHistogram::build(depth, depth_scale, clipping_distance, slot_shift)?;
    let (slot, pixel_count) = histogram.band();

    let bpp = color.bytes_per_pixel();
    let stride = color.stride();
    let channels = bpp.min(COLOR_CHANNEL_COUNT);

    // (sum_x, sum_y, retained) per row
    let mask_row = |(y, row): (usize, &mut [u8])| -> (u64, u64, u64) {
        let mut sum_x = 0u64;
        let mut sum_y = 0u64;
        let mut kept = 0u64;
        for (x, (pixel, &unit)) in row
            .chunks_exact_mut(bpp)
            .zip(depth.row(y as u32))
            .enumerate()
        {
            if histogram.slot_of(unit) == slot {
                sum_x += x as u64;
                sum_y += y as u64;
                kept += 1;
            } else {
                pixel[..channels].fill(0);
            }
        }
        (sum_x, sum_y, kept)
    };
    let add = |a: (u64, u64, u64), b: (u64, u64, u64)| (a.0 + b.0, a.1 + b.1, a.2 + b.2);

    let (sum_x, sum_y, kept) = if depth.pixel_count() >= PARALLEL_PIXEL_THRESHOLD {
        color
            .as_raw_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .map(mask_row)
            .reduce(|| (0, 0, 0), add)
    } else {
        color
            .as_raw_mut()
            .chunks_mut(stride)
            .enumerate()
            .map(mask_row)
            .fold((0, 0, 0), add)
    };

    let centroid = (kept > 0).then(|| ((sum_x / kept) as u32, (sum_y / kept) as u32));

    tracing::debug!(slot, pixel_count, kept, ?centroid, "Closest band selected");

    Ok(ClosestBand {
        slot,
        pixel_count,
        depth_range: histogram.slot_range(slot),
        centroid,
    })
}

/// Paint a cross at `centroid`, shifted inward so it stays inside the frame
/// when the frame is large enough to hold it.
pub fn draw_centroid_marker(color: &mut ColorFrame, centroid: (u32, u32)) {
    let (w, h) = (color.width(), color.height());
    let arm = CENTROID_MARKER_HALF_LENGTH;
    let half = CENTROID_MARKER_HALF_THICKNESS;

    let cx = clamp_center(centroid.0, arm, w);
    let cy = clamp_center(centroid.1, arm, h);

    // vertical arm, then horizontal arm
    paint_rect(color, cx.saturating_sub(half)..=cx + half, cy.saturating_sub(arm)..=cy + arm);
    paint_rect(color, cx.saturating_sub(arm)..=cx + arm, cy.saturating_sub(half)..=cy + half);
}

fn clamp_center(v: u32, arm: u32, extent: u32) -> u32 {
    if extent <= 2 * arm {
        return v.min(extent.saturating_sub(1));
    }
    v.clamp(arm, extent - 1 - arm)
}

fn paint_rect(
    color: &mut ColorFrame,
    xs: std::ops::RangeInclusive<u32>,
    ys: std::ops::RangeInclusive<u32>,
) {
    let (w, h) = (color.width(), color.height());
    for y in ys.filter(|&y| y < h) {
        for x in xs.clone().filter(|&x| x < w) {
            color.pixel_mut(x, y).fill(CENTROID_MARKER_FILL);
        }
    }
}
