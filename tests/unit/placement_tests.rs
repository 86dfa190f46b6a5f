// Placement engine tests through the public API

use slidemark::watermark::{
    compute_placement, compute_placement_with, Layering, Margin, PlacementRules, SlideCanvas,
    SourceImage, WatermarkPosition,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[test]
fn test_end_to_end_diagonal_scenario() {
    let canvas = SlideCanvas::new(1920.0, 1080.0);
    let source = SourceImage::new(400, 100, 0.3);

    let p = compute_placement(&canvas, &source, WatermarkPosition::DiagonalRibbon, 0.3, true)
        .unwrap();

    assert!(close(p.height, 216.0));
    assert!(close(p.width, 864.0));
    assert!((p.rotation_degrees - 29.36).abs() < 0.01);
    assert!(close(p.x, (1920.0 - 864.0) / 2.0));
    assert!(close(p.y, (1080.0 - 216.0) / 2.0));
    assert_eq!(p.opacity, 0.3);
}

#[test]
fn test_every_preset_produces_positive_extent() {
    let canvas = SlideCanvas::new(12_192_000.0, 6_858_000.0);
    for (w, h) in [(1, 1), (1000, 10), (10, 1000), (640, 480)] {
        let source = SourceImage::new(w, h, 0.5);
        for position in WatermarkPosition::ALL {
            let p = compute_placement(&canvas, &source, position, 0.25, false).unwrap();
            assert!(p.width > 0.0 && p.height > 0.0, "{} {}x{}", position, w, h);
            assert_eq!(p.layering, Layering::BelowContent);
            assert_eq!(p.is_rotated(), position == WatermarkPosition::DiagonalRibbon);
        }
    }
}

#[test]
fn test_corner_margin_invariant_on_widescreen() {
    let canvas = SlideCanvas::new(12_192_000.0, 6_858_000.0);
    let source = SourceImage::new(300, 200, 1.0);
    let margin = 0.05 * 6_858_000.0;

    let right = [WatermarkPosition::BottomRight, WatermarkPosition::TopRight];
    for position in right {
        let p = compute_placement(&canvas, &source, position, 0.2, true).unwrap();
        assert!(close(p.x + p.width + margin, canvas.width));
    }

    let left = [WatermarkPosition::BottomLeft, WatermarkPosition::TopLeft];
    for position in left {
        let p = compute_placement(&canvas, &source, position, 0.2, true).unwrap();
        assert!(close(p.x, margin));
    }
}

#[test]
fn test_custom_rules_change_ribbon_thickness() {
    let canvas = SlideCanvas::new(1000.0, 720.0);
    let source = SourceImage::new(300, 100, 0.5);
    let rules = PlacementRules {
        margin: Margin::Absolute(0.0),
        wide_aspect_threshold: 5.0,
        wide_ribbon_fraction: 0.1,
        standard_ribbon_fraction: 0.5,
    };

    // Aspect 3.0 is no longer "wide" under a 5.0 threshold
    let p = compute_placement_with(
        &rules,
        &canvas,
        &source,
        WatermarkPosition::HorizontalRibbon,
        0.3,
        true,
    )
    .unwrap();
    assert!(close(p.height, 360.0));

    let p = compute_placement_with(&rules, &canvas, &source, WatermarkPosition::TopLeft, 0.3, true)
        .unwrap();
    assert_eq!((p.x, p.y), (0.0, 0.0));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let source = SourceImage::new(100, 100, 0.5);
    for (w, h) in [(0.0, 720.0), (1000.0, -1.0), (f64::NAN, 720.0)] {
        let err = compute_placement(
            &SlideCanvas::new(w, h),
            &source,
            WatermarkPosition::Center,
            0.3,
            true,
        )
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    let canvas = SlideCanvas::new(1000.0, 720.0);
    for size in [0.0, 1.0001, -0.3] {
        assert!(compute_placement(&canvas, &source, WatermarkPosition::Center, size, true)
            .unwrap_err()
            .is_invalid_parameter());
    }
}
