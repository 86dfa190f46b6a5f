// Integration tests for the slidemark command-line interface

use std::ffi::OsStr;

use super::test_harness::{read_part, run_cli, Fixture};

#[test]
fn test_cli_writes_default_output() {
    let fixture = Fixture::new(2);
    let output = run_cli([&fixture.presentation, &fixture.watermark]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deck_watermarked.pptx"));
    assert!(fixture.path("deck_watermarked.pptx").exists());
}

#[test]
fn test_cli_flags_override_config() {
    let fixture = Fixture::new(1);
    let config = fixture.path("slidemark.yaml");
    std::fs::write(
        &config,
        "watermark:\n  position: top-left\n  opacity: 0.8\nplacement:\n  margin_emu: 100000\n",
    )
    .unwrap();
    let out = fixture.path("out.pptx");

    let output = run_cli([
        fixture.presentation.as_os_str(),
        fixture.watermark.as_os_str(),
        OsStr::new("-o"),
        out.as_os_str(),
        OsStr::new("-c"),
        config.as_os_str(),
        OsStr::new("--position"),
        OsStr::new("bottom-left"),
        OsStr::new("--behind"),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let slide = read_part(&out, "ppt/slides/slide1.xml").unwrap();
    // bottom-left from the flag, 100000 EMU margin from the config
    assert!(slide.contains(r#"<a:off x="100000" y="5843600"/>"#));
    let pic = slide.find("<p:pic ").unwrap();
    assert!(slide[..pic].ends_with("</p:grpSpPr>"));
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let fixture = Fixture::new(1);
    let output = run_cli([
        fixture.presentation.as_os_str(),
        fixture.watermark.as_os_str(),
        OsStr::new("--position"),
        OsStr::new("diagonal-ribbon"),
        OsStr::new("--dry-run"),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("slides:    1"));
    assert!(stdout.contains("rotation:  29.3578 deg"));
    assert!(!fixture.path("deck_watermarked.pptx").exists());
}

#[test]
fn test_cli_rejects_unknown_position() {
    let fixture = Fixture::new(1);
    let output = run_cli([
        fixture.presentation.as_os_str(),
        fixture.watermark.as_os_str(),
        OsStr::new("--position"),
        OsStr::new("middle"),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("middle"));
}

#[test]
fn test_cli_invalid_opacity_exits_with_one() {
    let fixture = Fixture::new(1);
    let output = run_cli([
        fixture.presentation.as_os_str(),
        fixture.watermark.as_os_str(),
        OsStr::new("--opacity"),
        OsStr::new("1.5"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opacity"));
}

#[test]
fn test_cli_missing_presentation_exits_with_one() {
    let fixture = Fixture::new(1);
    let output = run_cli([
        fixture.path("missing.pptx").as_os_str(),
        fixture.watermark.as_os_str(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.pptx"));
}
