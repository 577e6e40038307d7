//! Four-label seed masks built from a colorized (white = near) depth image.

use ndarray::{Array2, Zip};

use crate::consts::{DEFAULT_EROSION_SIZE, DEFAULT_FAR_THRESHOLD, DEFAULT_NEAR_THRESHOLD};
use crate::error::{DepthcutError, Result};

use super::config::SegmentationConfig;
use super::morphology::{close, threshold_binary, threshold_binary_inv};

/// Per-pixel label of a seed or refined mask.
///
/// Discriminants follow the usual grab-cut encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaskLabel {
    #[default]
    Background = 0,
    Foreground = 1,
    ProbableBackground = 2,
    ProbableForeground = 3,
}

impl MaskLabel {
    pub fn is_foreground(self) -> bool {
        matches!(self, Self::Foreground | Self::ProbableForeground)
    }

    /// Probable labels may be changed by a refinement solver; definite ones may not.
    pub fn is_probable(self) -> bool {
        matches!(self, Self::ProbableBackground | Self::ProbableForeground)
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Background),
            1 => Some(Self::Foreground),
            2 => Some(Self::ProbableBackground),
            3 => Some(Self::ProbableForeground),
            _ => None,
        }
    }
}

/// Row-major `(height, width)` label grid.
pub type SeedMask = Array2<MaskLabel>;

/// Builds seed masks from colorized depth.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedMaskBuilder {
    pub near_threshold: u8,
    pub far_threshold: u8,
    pub erosion_size: usize,
}

impl Default for SeedMaskBuilder {
    fn default() -> Self {
        Self {
            near_threshold: DEFAULT_NEAR_THRESHOLD,
            far_threshold: DEFAULT_FAR_THRESHOLD,
            erosion_size: DEFAULT_EROSION_SIZE,
        }
    }
}

impl SeedMaskBuilder {
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self {
            near_threshold: config.near_threshold,
            far_threshold: config.far_threshold,
            erosion_size: config.erosion_size,
        }
    }

    /// 255 where the colorized depth is bright (near), 0 elsewhere.
    pub fn near_mask(&self, colorized: &Array2<u8>) -> Array2<u8> {
        let near = threshold_binary(colorized, self.near_threshold);
        close(&near, self.erosion_size)
    }

    /// 255 where the colorized depth is dark (far), 0 elsewhere.
    ///
    /// Zero means "no depth", not "far away", so zero pixels are lifted to 255
    /// before the inverse threshold and never count as far.
    pub fn far_mask(&self, colorized: &Array2<u8>) -> Array2<u8> {
        let lifted = colorized.mapv(|v| if v == 0 { 255 } else { v });
        let far = threshold_binary_inv(&lifted, self.far_threshold);
        close(&far, self.erosion_size)
    }

    pub fn build(&self, colorized: &Array2<u8>) -> SeedMask {
        let near = self.near_mask(colorized);
        let far = self.far_mask(colorized);
        let (h, w) = colorized.dim();
        tracing::debug!(width = w, height = h, "Seed masks computed");
        // shapes come from the same source image
        compose(&near, &far)
    }
}

/// Build a seed mask with the default thresholds and structuring elements.
pub fn build_seed_mask(colorized: &Array2<u8>) -> SeedMask {
    SeedMaskBuilder::default().build(colorized)
}

/// Combine near/far masks: Background by default, ProbableBackground where
/// `far == 0`, Foreground where `near == 255`. Near wins where both apply.
pub fn compose_seed_mask(near: &Array2<u8>, far: &Array2<u8>) -> Result<SeedMask> {
    if near.dim() != far.dim() {
        return Err(DepthcutError::ShapeMismatch {
            expected: near.dim(),
            actual: far.dim(),
        });
    }
    Ok(compose(near, far))
}

fn compose(near: &Array2<u8>, far: &Array2<u8>) -> SeedMask {
    let mut mask = SeedMask::from_elem(near.dim(), MaskLabel::Background);
    Zip::from(&mut mask).and(far).for_each(|label, &f| {
        if f == 0 {
            *label = MaskLabel::ProbableBackground;
        }
    });
    Zip::from(&mut mask).and(near).for_each(|label, &n| {
        if n == 255 {
            *label = MaskLabel::Foreground;
        }
    });
    mask
}

/// Count of each label, indexed by discriminant.
pub fn label_histogram(mask: &SeedMask) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for &label in mask.iter() {
        counts[label as usize] += 1;
    }
    counts
}
