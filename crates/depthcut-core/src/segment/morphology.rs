use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Binary threshold: pixels `>= thresh` become 255, the rest 0.
pub fn threshold_binary(src: &Array2<u8>, thresh: u8) -> Array2<u8> {
    src.mapv(|v| if v >= thresh { 255 } else { 0 })
}

/// Inverse binary threshold: pixels `<= thresh` become 255, the rest 0.
pub fn threshold_binary_inv(src: &Array2<u8>, thresh: u8) -> Array2<u8> {
    src.mapv(|v| if v <= thresh { 255 } else { 0 })
}

/// Grayscale dilation with a `(size + 1) x (size + 1)` rectangle anchored at
/// its bottom-right corner: each output pixel is the maximum over the window
/// `[x - size, x] x [y - size, y]`. Neighbours outside the image are ignored.
pub fn dilate(src: &Array2<u8>, size: usize) -> Array2<u8> {
    rect_filter(src, size, u8::max)
}

/// Grayscale erosion with the same window as [`dilate`], taking the minimum.
pub fn erode(src: &Array2<u8>, size: usize) -> Array2<u8> {
    rect_filter(src, size, u8::min)
}

/// Closing used for depth masks: dilate with `size`, then erode with a
/// window twice as large. Fills speckle holes and pulls region edges in.
pub fn close(src: &Array2<u8>, size: usize) -> Array2<u8> {
    erode(&dilate(src, size), 2 * size)
}

/// Rectangular min/max filters are separable: run the 1-D window along rows,
/// then along columns of the result.
fn rect_filter(src: &Array2<u8>, size: usize, pick: fn(u8, u8) -> u8) -> Array2<u8> {
    if size == 0 {
        return src.clone();
    }
    let along_rows = sliding_extreme(src.view(), size, pick);
    sliding_extreme(along_rows.t(), size, pick).reversed_axes()
}

fn sliding_extreme(src: ArrayView2<u8>, size: usize, pick: fn(u8, u8) -> u8) -> Array2<u8> {
    let mut out = Array2::<u8>::zeros(src.dim());

    let apply = |mut dst: ArrayViewMut1<u8>, row: ArrayView1<u8>| {
        for col in 0..row.len() {
            let mut acc = row[col];
            for k in col.saturating_sub(size)..col {
                acc = pick(acc, row[k]);
            }
            dst[col] = acc;
        }
    };

    if src.len() >= PARALLEL_PIXEL_THRESHOLD {
        Zip::from(out.rows_mut()).and(src.rows()).par_for_each(apply);
    } else {
        Zip::from(out.rows_mut()).and(src.rows()).for_each(apply);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dilate_window_extends_right_and_down() {
        let mut src = Array2::<u8>::zeros((5, 5));
        src[[1, 1]] = 255;
        let out = dilate(&src, 2);
        // the lone pixel spreads to [1..=3] x [1..=3]
        for row in 0..5 {
            for col in 0..5 {
                let inside = (1..=3).contains(&row) && (1..=3).contains(&col);
                assert_eq!(out[[row, col]], if inside { 255 } else { 0 }, "({row},{col})");
            }
        }
    }

    #[test]
    fn test_erode_ignores_out_of_image_neighbours() {
        let src = Array2::<u8>::from_elem((3, 3), 255);
        assert_eq!(erode(&src, 2), src);
    }

    #[test]
    fn test_erode_removes_thin_line() {
        let src = array![[0u8, 0, 0], [255, 255, 255], [0, 0, 0]];
        let out = erode(&src, 1);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_threshold_edges() {
        let src = array![[179u8, 180, 181], [99, 100, 101]];
        assert_eq!(threshold_binary(&src, 180), array![[0u8, 255, 255], [0, 0, 0]]);
        assert_eq!(
            threshold_binary_inv(&src, 100),
            array![[0u8, 0, 0], [255, 255, 0]]
        );
    }
}
