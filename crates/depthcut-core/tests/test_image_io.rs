mod common;

use image::{ImageBuffer, Luma};
use ndarray::Array2;
use tempfile::tempdir;

use depthcut_core::frame::ColorFrame;
use depthcut_core::io::image_io::{
    load_color_image, load_colorized_depth, load_depth_png, save_color_png, save_seed_mask_png,
};
use depthcut_core::segment::seed::MaskLabel;

use common::color_frame;

#[test]
fn test_color_png_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("color.png");
    let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
    let frame = ColorFrame::new(4, 3, 3, data).unwrap();

    save_color_png(&frame, &path).unwrap();
    let loaded = load_color_image(&path).unwrap();
    assert_eq!(loaded.as_raw(), frame.as_raw());
}

#[test]
fn test_rgba_saved_and_loaded_as_rgb() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rgba.png");
    save_color_png(&color_frame(2, 2, &[10, 20, 30, 255]), &path).unwrap();
    let loaded = load_color_image(&path).unwrap();
    assert_eq!(loaded.bytes_per_pixel(), 3);
    assert_eq!(loaded.pixel(1, 1), &[10, 20, 30]);
}

#[test]
fn test_depth_png_keeps_16_bit_units() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("depth.png");
    let units = vec![0u16, 1, 1000, 65535];
    ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(2, 2, units.clone())
        .unwrap()
        .save(&path)
        .unwrap();

    let depth = load_depth_png(&path).unwrap();
    assert_eq!((depth.width(), depth.height()), (2, 2));
    assert_eq!(depth.as_raw(), units.as_slice());
}

#[test]
fn test_seed_mask_visualization_levels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.png");
    let mask = Array2::from_shape_vec(
        (1, 4),
        vec![
            MaskLabel::Background,
            MaskLabel::ProbableBackground,
            MaskLabel::ProbableForeground,
            MaskLabel::Foreground,
        ],
    )
    .unwrap();

    save_seed_mask_png(&mask, &path).unwrap();
    let gray = load_colorized_depth(&path).unwrap();
    assert_eq!(gray.into_raw_vec_and_offset().0, vec![0, 85, 170, 255]);
}
