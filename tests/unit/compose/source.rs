use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "panelforge_source_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_rel_path_cleans_and_rejects() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("../up.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn missing_file_is_missing_source() {
    let dir = temp_dir("missing");
    let err = resolve_source(&dir, "nope.png").unwrap_err();
    assert_eq!(err.kind(), "missing-source");
    assert!(err.to_string().contains("nope.png"));
}

#[test]
fn transparent_pixels_become_matte() {
    let mut rgba = image::RgbaImage::new(3, 1);
    rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    rgba.put_pixel(1, 0, image::Rgba([255, 0, 0, 0]));
    rgba.put_pixel(2, 0, image::Rgba([255, 255, 255, 128]));
    let flat = flatten_alpha(&image::DynamicImage::ImageRgba8(rgba), Rgb8::BLACK);

    assert_eq!(flat.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
    assert_eq!(flat.get_pixel(2, 0).0, [128, 128, 128]);
}

#[test]
fn opaque_images_pass_through() {
    let rgb = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 8, 7]));
    let flat = flatten_alpha(&image::DynamicImage::ImageRgb8(rgb.clone()), Rgb8::WHITE);
    assert_eq!(flat, rgb);
}

#[test]
fn resize_exact_ignores_aspect_ratio() {
    let rgb = image::RgbImage::from_pixel(10, 4, image::Rgb([50, 60, 70]));
    let out = resize_exact(&rgb, Size::new(3, 9).unwrap(), Resample::Nearest);
    assert_eq!(out.dimensions(), (3, 9));
    assert!(out.pixels().all(|p| p.0 == [50, 60, 70]));
}

#[test]
fn load_canvas_decodes_flattens_and_resizes() {
    let dir = temp_dir("load");
    let mut rgba = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 0]));
    rgba.put_pixel(0, 0, image::Rgba([0, 255, 0, 255]));
    rgba.save(dir.join("logo.png")).unwrap();

    let c = load_canvas(&dir, "logo.png", Rgb8::new(0, 0, 255), None).unwrap();
    assert_eq!(c.get(0, 0), Some(Rgb8::new(0, 255, 0)));
    assert_eq!(c.get(3, 3), Some(Rgb8::new(0, 0, 255)));

    let c = load_canvas(
        &dir,
        "logo.png",
        Rgb8::BLACK,
        Some((Dimensions::new(8, 2), Resample::Nearest)),
    )
    .unwrap();
    assert_eq!((c.width(), c.height()), (8, 2));

    let err = load_canvas(
        &dir,
        "logo.png",
        Rgb8::BLACK,
        Some((Dimensions::new(0, 2), Resample::Nearest)),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "invalid-dimensions");
}
