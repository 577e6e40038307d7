use ndarray::Array2;

use depthcut_core::error::DepthcutError;
use depthcut_core::segment::seed::{
    build_seed_mask, compose_seed_mask, label_histogram, MaskLabel, SeedMaskBuilder,
};
use depthcut_core::segment::SegmentationConfig;

#[test]
fn test_near_everywhere_overrides_far_everywhere() {
    let near = Array2::<u8>::from_elem((4, 6), 255);
    let far = Array2::<u8>::zeros((4, 6));
    let mask = compose_seed_mask(&near, &far).unwrap();
    assert!(mask.iter().all(|&l| l == MaskLabel::Foreground));
}

#[test]
fn test_label_rules_per_pixel() {
    // near, far
    let cases = [
        (0u8, 0u8, MaskLabel::ProbableBackground),
        (0, 255, MaskLabel::Background),
        (255, 0, MaskLabel::Foreground),
        (255, 255, MaskLabel::Foreground),
    ];
    let near = Array2::from_shape_vec((1, 4), cases.iter().map(|c| c.0).collect()).unwrap();
    let far = Array2::from_shape_vec((1, 4), cases.iter().map(|c| c.1).collect()).unwrap();
    let mask = compose_seed_mask(&near, &far).unwrap();
    for (col, case) in cases.iter().enumerate() {
        assert_eq!(mask[[0, col]], case.2, "near={} far={}", case.0, case.1);
    }
}

#[test]
fn test_compose_rejects_mismatched_masks() {
    let near = Array2::<u8>::zeros((2, 2));
    let far = Array2::<u8>::zeros((2, 3));
    assert!(matches!(
        compose_seed_mask(&near, &far),
        Err(DepthcutError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_no_depth_is_probable_background() {
    let colorized = Array2::<u8>::zeros((8, 8));
    let mask = build_seed_mask(&colorized);
    assert!(mask.iter().all(|&l| l == MaskLabel::ProbableBackground));
}

#[test]
fn test_near_and_far_halves() {
    // columns 0..10 bright (near), 10..20 dark (far)
    let colorized = Array2::from_shape_fn((20, 20), |(_, col)| if col < 10 { 230u8 } else { 40 });
    let mask = build_seed_mask(&colorized);

    for row in 0..20 {
        for col in 0..20 {
            let expected = match col {
                0..=12 => MaskLabel::Foreground,
                13..=15 => MaskLabel::ProbableBackground,
                _ => MaskLabel::Background,
            };
            assert_eq!(mask[[row, col]], expected, "({row},{col})");
        }
    }

    let [bg, fg, pr_bg, pr_fg] = label_histogram(&mask);
    assert_eq!((bg, fg, pr_bg, pr_fg), (80, 260, 60, 0));
}

#[test]
fn test_threshold_boundaries_without_closing() {
    let builder = SeedMaskBuilder {
        erosion_size: 0,
        ..SeedMaskBuilder::default()
    };
    let colorized = Array2::from_shape_vec((1, 5), vec![180u8, 179, 101, 100, 0]).unwrap();
    let mask = builder.build(&colorized);
    assert_eq!(
        mask.into_raw_vec_and_offset().0,
        vec![
            MaskLabel::Foreground,
            MaskLabel::ProbableBackground,
            MaskLabel::ProbableBackground,
            MaskLabel::Background,
            MaskLabel::ProbableBackground,
        ]
    );
}

#[test]
fn test_builder_reads_thresholds_from_config() {
    let config = SegmentationConfig {
        near_threshold: 200,
        far_threshold: 50,
        erosion_size: 1,
        ..SegmentationConfig::default()
    };
    let builder = SeedMaskBuilder::from_config(&config);
    assert_eq!(builder.near_threshold, 200);
    assert_eq!(builder.far_threshold, 50);
    assert_eq!(builder.erosion_size, 1);
}

#[test]
fn test_label_codes() {
    for v in 0..4u8 {
        assert_eq!(MaskLabel::from_u8(v).map(|l| l as u8), Some(v));
    }
    assert_eq!(MaskLabel::from_u8(4), None);
    assert!(MaskLabel::ProbableForeground.is_foreground());
    assert!(!MaskLabel::Foreground.is_probable());
}
