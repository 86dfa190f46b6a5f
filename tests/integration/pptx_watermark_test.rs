// Integration tests for watermarking whole presentations through the library API

use super::test_harness::{part_names, read_part, Fixture, SLIDE_HEIGHT, SLIDE_WIDTH};
use slidemark::pptx::{PackageLimits, Presentation, PresentationError};
use slidemark::watermark::{
    ImageLimits, Margin, PlacementRules, WatermarkError, WatermarkOptions, WatermarkPosition,
};
use slidemark::{add_watermark, plan_watermark, Error, WatermarkRequest};

fn options(position: WatermarkPosition, on_top: bool) -> WatermarkOptions {
    WatermarkOptions {
        position,
        on_top,
        ..Default::default()
    }
}

#[test]
fn test_every_slide_gets_one_picture() {
    let fixture = Fixture::new(3);
    let output = add_watermark(&WatermarkRequest::new(
        &fixture.presentation,
        &fixture.watermark,
    ))
    .unwrap();

    assert_eq!(output, fixture.path("deck_watermarked.pptx"));
    for i in 1..=3 {
        let slide = read_part(&output, &format!("ppt/slides/slide{}.xml", i)).unwrap();
        assert_eq!(slide.matches("<p:pic ").count(), 1, "slide {}", i);
        assert!(slide.contains(&format!("Slide {}", i)));
    }

    // One media part shared by every slide
    let names = part_names(&output);
    let media: Vec<_> = names.iter().filter(|n| n.starts_with("ppt/media/")).collect();
    assert_eq!(media, ["ppt/media/slidemark_watermark1.png"]);

    let types = read_part(&output, "[Content_Types].xml").unwrap();
    assert_eq!(types.matches(r#"Extension="png""#).count(), 1);
}

#[test]
fn test_center_placement_in_emu() {
    let fixture = Fixture::new(1);
    let output = add_watermark(&WatermarkRequest::new(
        &fixture.presentation,
        &fixture.watermark,
    ))
    .unwrap();

    let slide = read_part(&output, "ppt/slides/slide1.xml").unwrap();
    // 30% of 12192000 wide, 4:1 aspect, centered
    assert!(slide.contains(r#"<a:off x="4267200" y="2971800"/>"#));
    assert!(slide.contains(r#"<a:ext cx="3657600" cy="914400"/>"#));
    assert!(!slide.contains("rot="));
}

#[test]
fn test_bottom_right_respects_margin() {
    let fixture = Fixture::new(1);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark)
        .with_options(options(WatermarkPosition::BottomRight, true));
    let output = add_watermark(&request).unwrap();

    let slide = read_part(&output, "ppt/slides/slide1.xml").unwrap();
    // Margin is 5% of the 6858000 slide height
    assert!(slide.contains(r#"<a:off x="8191500" y="5600700"/>"#));
}

#[test]
fn test_absolute_margin() {
    let fixture = Fixture::new(1);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark)
        .with_options(options(WatermarkPosition::TopLeft, true))
        .with_rules(PlacementRules {
            margin: Margin::Absolute(457_200.0),
            ..Default::default()
        });
    let output = add_watermark(&request).unwrap();

    let slide = read_part(&output, "ppt/slides/slide1.xml").unwrap();
    assert!(slide.contains(r#"<a:off x="457200" y="457200"/>"#));
}

#[test]
fn test_diagonal_ribbon_behind_content() {
    let fixture = Fixture::new(2);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark)
        .with_options(options(WatermarkPosition::DiagonalRibbon, false));
    let output = add_watermark(&request).unwrap();

    let slide = read_part(&output, "ppt/slides/slide2.xml").unwrap();
    // Wide watermark: thin band, 20% of the slide height, aspect kept
    assert!(slide.contains(r#"<a:ext cx="5486400" cy="1371600"/>"#));
    assert!(slide.contains(r#"<a:off x="3352800" y="2743200"/>"#));
    assert!(slide.contains(r#"<a:xfrm rot="1761465">"#));

    let pic = slide.find("<p:pic ").unwrap();
    assert!(slide[..pic].ends_with("</p:grpSpPr>"));
    assert!(pic < slide.find("Title 2").unwrap());
}

#[test]
fn test_horizontal_ribbon_spans_width() {
    let fixture = Fixture::with_watermark(1, 100, 100);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark)
        .with_options(options(WatermarkPosition::HorizontalRibbon, true));
    let plan = plan_watermark(&request).unwrap();

    assert_eq!(plan.placement.x, 0.0);
    assert_eq!(plan.placement.width, SLIDE_WIDTH as f64);
    // Square watermark: regular band
    assert!((plan.placement.height - 0.35 * SLIDE_HEIGHT as f64).abs() < 1e-6);
}

#[test]
fn test_relationships_are_added_to_each_slide() {
    let fixture = Fixture::new(2);
    let output = add_watermark(&WatermarkRequest::new(
        &fixture.presentation,
        &fixture.watermark,
    ))
    .unwrap();

    // Slide 1 had no rels part
    let rels1 = read_part(&output, "ppt/slides/_rels/slide1.xml.rels").unwrap();
    assert!(rels1.contains(r#"Id="rId1""#));
    assert!(rels1.contains(r#"Target="../media/slidemark_watermark1.png""#));

    // Slide 2 keeps its layout and gains rId2
    let rels2 = read_part(&output, "ppt/slides/_rels/slide2.xml.rels").unwrap();
    assert!(rels2.contains("slideLayout1.xml"));
    assert!(rels2.contains(r#"Id="rId2""#));
    let slide2 = read_part(&output, "ppt/slides/slide2.xml").unwrap();
    assert!(slide2.contains(r#"r:embed="rId2""#));
}

#[test]
fn test_output_reopens_and_keeps_entry_order() {
    let fixture = Fixture::new(2);
    let output = fixture.path("result.pptx");
    add_watermark(
        &WatermarkRequest::new(&fixture.presentation, &fixture.watermark).with_output(&output),
    )
    .unwrap();

    let before = part_names(&fixture.presentation);
    let after = part_names(&output);
    assert_eq!(&after[..before.len()], &before[..]);

    let reopened = Presentation::open(&output).unwrap();
    assert_eq!(reopened.slide_count(), 2);
    assert_eq!(reopened.slide_canvas().width, SLIDE_WIDTH as f64);
}

#[test]
fn test_watermarking_twice_stacks_pictures() {
    let fixture = Fixture::new(1);
    let first = add_watermark(&WatermarkRequest::new(
        &fixture.presentation,
        &fixture.watermark,
    ))
    .unwrap();
    let second = add_watermark(&WatermarkRequest::new(&first, &fixture.watermark)).unwrap();

    assert_eq!(second, fixture.path("deck_watermarked_watermarked.pptx"));
    let slide = read_part(&second, "ppt/slides/slide1.xml").unwrap();
    assert_eq!(slide.matches("<p:pic ").count(), 2);
    assert!(slide.contains(r#"<p:cNvPr id="3" "#));
    assert!(slide.contains(r#"<p:cNvPr id="4" "#));
    assert!(read_part(&second, "ppt/media/slidemark_watermark2.png").is_some());
}

#[test]
fn test_oversized_watermark_rejected_without_output() {
    let fixture = Fixture::with_watermark(1, 300, 300);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark).with_limits(
        ImageLimits {
            max_pixels: 10_000,
            ..Default::default()
        },
    );

    let err = add_watermark(&request).unwrap_err();
    assert!(matches!(
        err,
        Error::Watermark(WatermarkError::ImageTooLarge { .. })
    ));
    assert!(!fixture.path("deck_watermarked.pptx").exists());
}

#[test]
fn test_oversized_presentation_rejected_without_output() {
    let fixture = Fixture::new(2);
    let request = WatermarkRequest::new(&fixture.presentation, &fixture.watermark)
        .with_package_limits(PackageLimits {
            max_part_size: 128,
            ..Default::default()
        });

    let err = add_watermark(&request).unwrap_err();
    assert!(matches!(
        err,
        Error::Presentation(PresentationError::PartTooLarge { limit: 128, .. })
    ));
    assert!(!err.is_invalid_input());
    assert!(!fixture.path("deck_watermarked.pptx").exists());
}

#[test]
fn test_corrupt_presentation() {
    let fixture = Fixture::new(1);
    std::fs::write(&fixture.presentation, b"not a zip file").unwrap();

    let err = add_watermark(&WatermarkRequest::new(
        &fixture.presentation,
        &fixture.watermark,
    ))
    .unwrap_err();
    assert!(matches!(err, Error::Presentation(_)));
}
