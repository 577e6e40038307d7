/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Largest raw depth unit a 16-bit depth sensor can report.
pub const MAX_DEPTH_UNIT: u16 = u16::MAX;

/// Default log2 of the histogram slot width, in depth units (32 units per slot).
pub const DEFAULT_SLOT_SHIFT: u32 = 5;

/// Largest accepted slot shift; beyond this every depth lands in slot 0.
pub const MAX_SLOT_SHIFT: u32 = 15;

/// Byte written to every channel of a clipped background pixel (0x999999 grey).
pub const DEFAULT_BACKGROUND_FILL: u8 = 0x99;

/// Default clipping distance in meters.
pub const DEFAULT_CLIPPING_DISTANCE: f32 = 1.0;

/// Colorized-depth level at or above which a pixel counts as near.
pub const DEFAULT_NEAR_THRESHOLD: u8 = 180;

/// Colorized-depth level at or below which a pixel counts as far.
pub const DEFAULT_FAR_THRESHOLD: u8 = 100;

/// Base structuring element size for the closing step. Dilation uses a
/// rectangle of side `size + 1`, erosion one of side `2 * size + 1`.
pub const DEFAULT_EROSION_SIZE: usize = 3;

/// Default number of refinement solver iterations.
pub const DEFAULT_REFINE_ITERATIONS: usize = 1;

/// Frame sets discarded after start so auto exposure can settle.
pub const DEFAULT_WARMUP_FRAMES: usize = 10;

/// Half-length, in pixels, of each arm of the centroid cross marker.
pub const CENTROID_MARKER_HALF_LENGTH: u32 = 10;

/// Half-thickness, in pixels, of the centroid cross marker arms.
pub const CENTROID_MARKER_HALF_THICKNESS: u32 = 1;

/// Byte value used to paint the centroid marker.
pub const CENTROID_MARKER_FILL: u8 = 0xFF;

/// Number of RGB channels zeroed by the closest-object locator.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Seed mask visualization levels (Background, ProbableBackground,
/// ProbableForeground, Foreground).
pub const MASK_VIS_LEVELS: [u8; 4] = [0, 85, 170, 255];
