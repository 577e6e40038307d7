use ndarray::Array2;

use crate::consts::MAX_DEPTH_UNIT;
use crate::frame::DepthFrame;

/// Histogram-equalized grayscale rendering of a depth frame, white = near.
///
/// A valid unit `d` maps to `round(255 * (1 - cdf(d)))`, where `cdf(d)` is the
/// fraction of valid pixels with depth `<= d`, floored at 1. Only invalid
/// (zero) pixels are black.
pub fn equalized_grayscale(depth: &DepthFrame) -> Array2<u8> {
    let mut cumulative = vec![0u32; MAX_DEPTH_UNIT as usize + 1];
    for y in 0..depth.height() {
        for &unit in depth.row(y) {
            cumulative[unit as usize] += 1;
        }
    }
    cumulative[0] = 0;
    for i in 1..cumulative.len() {
        cumulative[i] += cumulative[i - 1];
    }
    let total = cumulative[MAX_DEPTH_UNIT as usize];

    let (w, h) = (depth.width() as usize, depth.height() as usize);
    Array2::from_shape_fn((h, w), |(row, col)| {
        let unit = depth.get(col as u32, row as u32);
        if unit == 0 || total == 0 {
            return 0;
        }
        let f = cumulative[unit as usize] as f32 / total as f32;
        ((255.0 * (1.0 - f)).round() as u8).max(1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearer_is_brighter() {
        let depth = DepthFrame::new(4, 1, vec![100, 200, 300, 0]).unwrap();
        let img = equalized_grayscale(&depth);
        assert!(img[[0, 0]] > img[[0, 1]]);
        assert!(img[[0, 1]] > img[[0, 2]]);
        assert_eq!(img[[0, 2]], 1);
        assert_eq!(img[[0, 3]], 0);
    }

    #[test]
    fn test_all_invalid_is_black() {
        let depth = DepthFrame::new(2, 2, vec![0; 4]).unwrap();
        assert!(equalized_grayscale(&depth).iter().all(|&v| v == 0));
    }
}
