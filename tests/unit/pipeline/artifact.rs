use super::*;
use crate::{
    color::policy::PolicyPreset, raster::canvas::Canvas, serialize::frame::write_frame_file,
};
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "panelforge_artifact_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_sample(dir: &Path, policy: ColorFormatPolicy) -> (PathBuf, Size) {
    let size = Size::new(4, 2).unwrap();
    let mut canvas = Canvas::new(size, Rgb8::new(248, 0, 0));
    canvas.set(3, 1, Rgb8::new(0, 252, 248));
    let path = dir.join("sample.raw");
    write_frame_file(&canvas, policy, &path).unwrap();
    (path, size)
}

#[test]
fn preview_round_trips_through_png() {
    let dir = temp_dir("preview");
    let policy = PolicyPreset::SwappedInvertedLittleEndian.policy();
    let (raw, size) = write_sample(&dir, policy);
    let png = dir.join("out/sample.png");

    preview(&raw, size, policy, &png).unwrap();
    let img = image::open(&png).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [248, 0, 0]);
    assert_eq!(img.get_pixel(3, 1).0, [0, 252, 248]);
}

#[test]
fn preview_rejects_wrong_size() {
    let dir = temp_dir("preview_size");
    let policy = PolicyPreset::PlainLittleEndian.policy();
    let (raw, _) = write_sample(&dir, policy);
    let err = preview(&raw, Size::new(5, 2).unwrap(), policy, &dir.join("x.png")).unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[test]
fn embed_writes_c_source_named_after_the_file() {
    let dir = temp_dir("embed");
    let (raw, _) = write_sample(&dir, PolicyPreset::PlainBigEndian.policy());
    let out = dir.join("gen/sample.c");
    embed(&raw, None, &out).unwrap();

    let src = std::fs::read_to_string(&out).unwrap();
    assert!(src.starts_with("// Auto-generated from sample.raw\n"));
    assert!(src.contains("const uint32_t sample_size = 16;"));
    assert!(src.contains("const uint8_t sample[] = {"));
    // plain big-endian red: 0xF800
    assert!(src.contains("    0xf8, 0x00,"));
}

#[test]
fn c_identifier_is_sanitized() {
    assert_eq!(c_identifier_for(Path::new("data/boot-splash.raw")), "boot_splash");
    assert_eq!(c_identifier_for(Path::new("0_frame.raw")), "_0_frame");
}

#[test]
fn inspect_reports_size_and_first_pixel() {
    let dir = temp_dir("inspect");
    let policy = PolicyPreset::InvertedBigEndian.policy();
    let (raw, size) = write_sample(&dir, policy);

    let info = inspect(&raw, Some(size), policy).unwrap();
    assert_eq!(info.bytes, 16);
    assert_eq!(info.size_matches(), Some(true));
    assert_eq!(info.first_pixel, Some(Rgb8::new(248, 0, 0)));
    assert_eq!(info.sha256.len(), 64);

    let info = inspect(&raw, Some(Size::new(3, 3).unwrap()), policy).unwrap();
    assert_eq!(info.size_matches(), Some(false));
    assert!(info.to_string().contains("MISMATCH"));
}

#[test]
fn missing_artifact_is_missing_source() {
    let dir = temp_dir("inspect_missing");
    let err = inspect(&dir.join("nope.raw"), None, ColorFormatPolicy::default()).unwrap_err();
    assert_eq!(err.kind(), "missing-source");
}
