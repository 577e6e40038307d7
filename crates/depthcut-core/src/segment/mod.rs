pub mod clipping;
pub mod closest;
pub mod colorize;
pub mod config;
pub mod morphology;
pub mod seed;

pub use clipping::{remove_background, remove_background_with_fill};
pub use closest::{draw_centroid_marker, isolate_closest_band, ClosestBand, DepthHistogram};
pub use colorize::equalized_grayscale;
pub use config::{SegmentationConfig, Strategy};
pub use seed::{build_seed_mask, compose_seed_mask, MaskLabel, SeedMask, SeedMaskBuilder};
