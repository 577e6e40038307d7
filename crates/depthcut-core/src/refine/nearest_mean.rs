use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{DepthcutError, Result};
use crate::frame::ColorFrame;
use crate::segment::seed::{MaskLabel, SeedMask};

use super::RefinementSolver;

/// Two-class colour model refinement.
///
/// Each iteration takes the mean colour of all foreground-labelled and all
/// background-labelled pixels, then moves every probable pixel to whichever
/// class mean is nearer (ties go to background). Definite labels are fixed.
/// Stops early once an iteration changes nothing.
#[derive(Clone, Debug, Default)]
pub struct NearestMeanSolver;

impl RefinementSolver for NearestMeanSolver {
    fn name(&self) -> &str {
        "nearest-mean"
    }

    fn refine(
        &mut self,
        color: &ColorFrame,
        seed: &SeedMask,
        iterations: usize,
    ) -> Result<SeedMask> {
        let expected = (color.height() as usize, color.width() as usize);
        if seed.dim() != expected {
            return Err(DepthcutError::ShapeMismatch {
                expected,
                actual: seed.dim(),
            });
        }

        let channels = color.bytes_per_pixel().min(COLOR_CHANNEL_COUNT);
        let mut mask = seed.clone();

        for iteration in 0..iterations {
            let (fg, bg) = match class_means(color, &mask, channels) {
                Some(means) => means,
                None if iteration == 0 => {
                    return Err(DepthcutError::Refinement(
                        "seed mask needs both foreground and background samples".into(),
                    ));
                }
                None => break,
            };

            let mut changed = 0usize;
            for ((row, col), label) in mask.indexed_iter_mut() {
                if !label.is_probable() {
                    continue;
                }
                let pixel = &color.pixel(col as u32, row as u32)[..channels];
                let next = if distance_sq(pixel, &fg) < distance_sq(pixel, &bg) {
                    MaskLabel::ProbableForeground
                } else {
                    MaskLabel::ProbableBackground
                };
                if next != *label {
                    *label = next;
                    changed += 1;
                }
            }

            debug!(iteration, changed, "Refinement pass");
            if changed == 0 {
                break;
            }
        }

        Ok(mask)
    }
}

type Mean = [f64; COLOR_CHANNEL_COUNT];

/// Mean colour of the foreground and background classes, or `None` when
/// either class is empty.
fn class_means(color: &ColorFrame, mask: &SeedMask, channels: usize) -> Option<(Mean, Mean)> {
    let mut fg_sum = [0.0f64; COLOR_CHANNEL_COUNT];
    let mut bg_sum = [0.0f64; COLOR_CHANNEL_COUNT];
    let mut fg_n = 0u64;
    let mut bg_n = 0u64;

    for ((row, col), label) in mask.indexed_iter() {
        let pixel = color.pixel(col as u32, row as u32);
        let (sum, n) = if label.is_foreground() {
            (&mut fg_sum, &mut fg_n)
        } else {
            (&mut bg_sum, &mut bg_n)
        };
        for c in 0..channels {
            sum[c] += pixel[c] as f64;
        }
        *n += 1;
    }

    if fg_n == 0 || bg_n == 0 {
        return None;
    }
    Some((
        fg_sum.map(|v| v / fg_n as f64),
        bg_sum.map(|v| v / bg_n as f64),
    ))
}

fn distance_sq(pixel: &[u8], mean: &Mean) -> f64 {
    pixel
        .iter()
        .zip(mean)
        .map(|(&p, &m)| {
            let d = p as f64 - m;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq_uses_only_present_channels() {
        let mean = [10.0, 20.0, 30.0];
        assert_eq!(distance_sq(&[13], &mean), 9.0);
        assert_eq!(distance_sq(&[10, 24, 30], &mean), 16.0);
    }
}
