use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BACKGROUND_FILL, DEFAULT_CLIPPING_DISTANCE, DEFAULT_EROSION_SIZE,
    DEFAULT_FAR_THRESHOLD, DEFAULT_NEAR_THRESHOLD, DEFAULT_REFINE_ITERATIONS, DEFAULT_SLOT_SHIFT,
    DEFAULT_WARMUP_FRAMES, MAX_SLOT_SHIFT,
};
use crate::error::{DepthcutError, Result};

/// How a frame's background is separated from its subject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Paint every pixel beyond the clipping distance with the fill byte.
    #[default]
    Clip,
    /// Keep only the most populated depth band, black out the rest.
    Closest,
    /// Depth-seeded mask refined by an iterative solver.
    Refine,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clip => write!(f, "Clipping Distance"),
            Self::Closest => write!(f, "Closest Object"),
            Self::Refine => write!(f, "Depth-Seeded Refinement"),
        }
    }
}

/// Per-run segmentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub strategy: Strategy,
    /// Pixels farther than this (meters) are background.
    #[serde(default = "default_clipping_distance")]
    pub clipping_distance: f32,
    /// Histogram slot width is `1 << slot_shift` depth units.
    #[serde(default = "default_slot_shift")]
    pub slot_shift: u32,
    /// Byte written to every channel of a clipped pixel.
    #[serde(default = "default_background_fill")]
    pub background_fill: u8,
    #[serde(default = "default_near_threshold")]
    pub near_threshold: u8,
    #[serde(default = "default_far_threshold")]
    pub far_threshold: u8,
    #[serde(default = "default_erosion_size")]
    pub erosion_size: usize,
    #[serde(default = "default_refine_iterations")]
    pub refine_iterations: usize,
    /// Frame sets dropped before segmentation starts.
    #[serde(default = "default_warmup_frames")]
    pub warmup_frames: usize,
    /// Paint a cross at the closest object's centroid.
    #[serde(default)]
    pub mark_centroid: bool,
}

fn default_clipping_distance() -> f32 {
    DEFAULT_CLIPPING_DISTANCE
}
fn default_slot_shift() -> u32 {
    DEFAULT_SLOT_SHIFT
}
fn default_background_fill() -> u8 {
    DEFAULT_BACKGROUND_FILL
}
fn default_near_threshold() -> u8 {
    DEFAULT_NEAR_THRESHOLD
}
fn default_far_threshold() -> u8 {
    DEFAULT_FAR_THRESHOLD
}
fn default_erosion_size() -> usize {
    DEFAULT_EROSION_SIZE
}
fn default_refine_iterations() -> usize {
    DEFAULT_REFINE_ITERATIONS
}
fn default_warmup_frames() -> usize {
    DEFAULT_WARMUP_FRAMES
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            clipping_distance: DEFAULT_CLIPPING_DISTANCE,
            slot_shift: DEFAULT_SLOT_SHIFT,
            background_fill: DEFAULT_BACKGROUND_FILL,
            near_threshold: DEFAULT_NEAR_THRESHOLD,
            far_threshold: DEFAULT_FAR_THRESHOLD,
            erosion_size: DEFAULT_EROSION_SIZE,
            refine_iterations: DEFAULT_REFINE_ITERATIONS,
            warmup_frames: DEFAULT_WARMUP_FRAMES,
            mark_centroid: false,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        validate_clipping_distance(self.clipping_distance)?;
        if self.slot_shift > MAX_SLOT_SHIFT {
            return Err(DepthcutError::InvalidConfig(format!(
                "slot_shift {} exceeds {}",
                self.slot_shift, MAX_SLOT_SHIFT
            )));
        }
        if self.refine_iterations == 0 {
            return Err(DepthcutError::InvalidConfig(
                "refine_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Change the clipping distance between frames.
    pub fn set_clipping_distance(&mut self, meters: f32) -> Result<()> {
        validate_clipping_distance(meters)?;
        self.clipping_distance = meters;
        Ok(())
    }
}

fn validate_clipping_distance(meters: f32) -> Result<()> {
    if !meters.is_finite() || meters <= 0.0 {
        return Err(DepthcutError::InvalidConfig(format!(
            "clipping_distance must be a positive number of meters, got {meters}"
        )));
    }
    Ok(())
}
