use std::io::Cursor;
use std::path::PathBuf;

use aqiscape::error::AqiscapeError;
use aqiscape::overlay::{OverlayStyle, finalize};
use image::{Rgba, RgbaImage};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

fn system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn style(font_path: PathBuf, custom_text: Option<&str>) -> OverlayStyle {
    OverlayStyle {
        font_path,
        font_size: 32.0,
        custom_text: custom_text.map(str::to_string),
    }
}

/// Mostly black canvas with a white band on the right, where the caption
/// lands. The dominant color (black) should then show up against the band.
fn fixture_image() -> RgbaImage {
    let black = Rgba([0, 0, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);
    RgbaImage::from_fn(400, 200, |x, _| if x < 240 { black } else { white })
}

fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encode fixture PNG");
    cursor.into_inner()
}

#[test]
fn undecodable_bytes_are_a_download_error() {
    let out_dir = tempfile::tempdir().expect("create tempdir");
    let err = finalize(
        b"definitely not a png",
        "Testville",
        Some(42),
        &style(PathBuf::from("/irrelevant.ttf"), None),
        out_dir.path(),
    )
    .expect_err("junk bytes must not decode");
    assert!(matches!(err, AqiscapeError::Download(_)));
}

#[test]
fn overlay_draws_the_caption_in_the_dominant_color() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping overlay rendering test");
        return;
    };
    let out_dir = tempfile::tempdir().expect("create tempdir");
    let fixture = fixture_image();

    let written = finalize(
        &png_bytes(&fixture),
        "Testville",
        Some(42),
        &style(font, None),
        out_dir.path(),
    )
    .expect("overlay pipeline should succeed");

    assert_eq!(written, out_dir.path().join("Testville_42.png"));
    let result = image::open(&written).expect("written image decodes").to_rgba8();

    let changed = result
        .pixels()
        .zip(fixture.pixels())
        .filter(|(after, before)| after != before)
        .count();
    assert!(changed > 0, "caption left no visible pixels on the canvas");
}

#[test]
fn aqi_free_run_writes_an_aqi_free_filename() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping overlay rendering test");
        return;
    };
    let out_dir = tempfile::tempdir().expect("create tempdir");

    let written = finalize(
        &png_bytes(&fixture_image()),
        "Testville",
        None,
        &style(font, None),
        out_dir.path(),
    )
    .expect("overlay pipeline should succeed");

    assert_eq!(written, out_dir.path().join("Testville.png"));
}

#[test]
fn oversized_caption_clips_instead_of_failing() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping overlay rendering test");
        return;
    };
    let out_dir = tempfile::tempdir().expect("create tempdir");
    let long_caption = "an extremely long caption that is far wider than the whole image";

    let written = finalize(
        &png_bytes(&fixture_image()),
        "Edgeville",
        Some(7),
        &style(font, Some(long_caption)),
        out_dir.path(),
    )
    .expect("clipping captions must still produce a file");

    assert!(written.exists());
}
