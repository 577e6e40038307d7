use std::path::Path;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;

use crate::consts::MASK_VIS_LEVELS;
use crate::error::{DepthcutError, Result};
use crate::frame::{ColorFrame, DepthFrame};
use crate::segment::seed::{MaskLabel, SeedMask};

/// Load a 16-bit grayscale image as raw depth units.
pub fn load_depth_png(path: &Path) -> Result<DepthFrame> {
    let img = image::open(path)?.to_luma16();
    let (w, h) = img.dimensions();
    DepthFrame::new(w, h, img.into_raw())
}

/// Load any image as an RGB8 color frame.
pub fn load_color_image(path: &Path) -> Result<ColorFrame> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    ColorFrame::new(w, h, 3, img.into_raw())
}

/// Load a colorized (white = near) depth image as 8-bit gray levels.
pub fn load_colorized_depth(path: &Path) -> Result<Array2<u8>> {
    let img = image::open(path)?.to_luma8();
    let (w, h) = img.dimensions();
    Array2::from_shape_vec((h as usize, w as usize), img.into_raw())
        .map_err(|_| DepthcutError::InvalidDimensions { width: w, height: h })
}

/// Save a color frame as 8-bit PNG (gray, gray+alpha, RGB or RGBA by bpp).
pub fn save_color_png(frame: &ColorFrame, path: &Path) -> Result<()> {
    let color_type = match frame.bytes_per_pixel() {
        1 => image::ExtendedColorType::L8,
        2 => image::ExtendedColorType::La8,
        3 => image::ExtendedColorType::Rgb8,
        4 => image::ExtendedColorType::Rgba8,
        bpp => return Err(DepthcutError::InvalidBytesPerPixel(bpp as u32)),
    };
    image::save_buffer_with_format(
        path,
        frame.as_raw(),
        frame.width(),
        frame.height(),
        color_type,
        ImageFormat::Png,
    )?;
    Ok(())
}

/// Save a seed mask as a grayscale visualization.
pub fn save_seed_mask_png(mask: &SeedMask, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();
    let pixels: Vec<u8> = mask.iter().map(|&label| mask_level(label)).collect();
    let img: GrayImage = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w as u32, h as u32, pixels)
        .ok_or(DepthcutError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        })?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn mask_level(label: MaskLabel) -> u8 {
    match label {
        MaskLabel::Background => MASK_VIS_LEVELS[0],
        MaskLabel::ProbableBackground => MASK_VIS_LEVELS[1],
        MaskLabel::ProbableForeground => MASK_VIS_LEVELS[2],
        MaskLabel::Foreground => MASK_VIS_LEVELS[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_levels_are_ordered_by_foreground_likelihood() {
        let levels: Vec<u8> = [
            MaskLabel::Background,
            MaskLabel::ProbableBackground,
            MaskLabel::ProbableForeground,
            MaskLabel::Foreground,
        ]
        .into_iter()
        .map(mask_level)
        .collect();
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }
}
