use super::*;
use crate::compose::model::{FontSpec, TextPlacement};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "panelforge_text_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn caption(text: &str, source: Option<&str>, size_px: f32) -> TextSpec {
    TextSpec {
        text: text.to_owned(),
        font: FontSpec {
            source: source.map(str::to_owned),
            size_px,
        },
        color: Rgb8::WHITE,
        placement: TextPlacement::default(),
    }
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn no_font_requested_uses_builtin() {
    let mut engine = TextEngine::new();
    let p = engine.prepare(&caption("Hi", None, 20.0), Path::new("."));
    assert!(p.is_builtin());
    // FONT_10X20: ten pixels per character.
    assert_eq!(p.width(), 20);
}

#[test]
fn missing_font_falls_back_without_error() {
    let dir = temp_dir("missing");
    let mut engine = TextEngine::new();
    let p = engine.prepare(&caption("Touch to Start", Some("arial.ttf"), 20.0), &dir);
    assert!(p.is_builtin());
    assert_eq!(p.width(), 140);
}

#[test]
fn unparseable_font_falls_back_without_error() {
    let dir = temp_dir("garbage");
    std::fs::write(dir.join("broken.ttf"), b"definitely not a font").unwrap();
    let mut engine = TextEngine::new();
    let p = engine.prepare(&caption("x", Some("broken.ttf"), 20.0), &dir);
    assert!(p.is_builtin());
}

#[test]
fn builtin_face_tracks_requested_size() {
    assert_eq!(builtin_font(8.0).character_size.width, 6);
    assert_eq!(builtin_font(14.0).character_size.width, 8);
    assert_eq!(builtin_font(32.0).character_size.width, 10);
}

#[test]
fn builtin_draw_paints_inside_the_text_box_only() {
    let size = crate::foundation::core::Size::new(100, 40).unwrap();
    let mut canvas = Canvas::new(size, Rgb8::BLACK);
    let p = builtin(&caption("AB", None, 10.0));
    p.draw(&mut canvas, Point::new(10, 5));

    let mut lit = 0;
    for y in 0..40 {
        for x in 0..100 {
            if canvas.get(x, y) != Some(Rgb8::BLACK) {
                assert!((10..22).contains(&x) && (5..15).contains(&y), "({x},{y})");
                lit += 1;
            }
        }
    }
    assert!(lit > 0);
}

#[test]
fn builtin_draw_clips_off_canvas() {
    let size = crate::foundation::core::Size::new(8, 8).unwrap();
    let mut canvas = Canvas::new(size, Rgb8::BLACK);
    let p = builtin(&caption("WWWW", None, 20.0));
    p.draw(&mut canvas, Point::new(-5, -5));
    p.draw(&mut canvas, Point::new(1_000, 1_000));
}

#[test]
fn font_is_found_in_fonts_subdirectory() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = temp_dir("fonts_dir");
    std::fs::create_dir_all(dir.join("fonts")).unwrap();
    std::fs::copy(&font, dir.join("fonts").join("face.ttf")).unwrap();
    assert_eq!(
        find_font(&dir, "face.ttf").unwrap(),
        dir.join("fonts").join("face.ttf")
    );
}

#[test]
fn outline_text_measures_and_draws() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = temp_dir("outline");
    std::fs::copy(&font, dir.join("face.ttf")).unwrap();

    let mut engine = TextEngine::new();
    let short = engine.prepare(&caption("Hi", Some("face.ttf"), 20.0), &dir);
    let long = engine.prepare(&caption("Touch to Start", Some("face.ttf"), 20.0), &dir);
    assert!(!short.is_builtin());
    assert!(long.width() > short.width());

    let size = crate::foundation::core::Size::new(320, 240).unwrap();
    let mut canvas = Canvas::new(size, Rgb8::BLACK);
    long.draw(&mut canvas, Point::new(90, 200));
    assert!(canvas.pixels().iter().any(|p| *p != Rgb8::BLACK));
    // Nothing above the text origin.
    for y in 0..190 {
        for x in 0..320 {
            assert_eq!(canvas.get(x, y), Some(Rgb8::BLACK));
        }
    }
}

#[test]
fn outline_width_is_the_inked_extent() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = temp_dir("ink");
    std::fs::copy(&font, dir.join("face.ttf")).unwrap();

    let mut engine = TextEngine::new();
    let PreparedText::Outline(raster) = engine.prepare(&caption("Hi", Some("face.ttf"), 20.0), &dir)
    else {
        panic!("expected outline text");
    };
    let (left, right) = raster.ink.unwrap();
    assert_eq!(raster.ink_width(), right - left + 1);
    // Every inked column lies inside the measured box.
    for (i, px) in raster.data.chunks_exact(4).enumerate() {
        if px[3] != 0 {
            let x = i as u32 % raster.width;
            assert!((left..=right).contains(&x));
        }
    }
    // Whitespace has no ink.
    let blank = engine.prepare(&caption("   ", Some("face.ttf"), 20.0), &dir);
    assert_eq!(blank.width(), 0);
}

#[test]
fn outline_text_draws_on_canvases_wider_than_u16() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = temp_dir("wide");
    std::fs::copy(&font, dir.join("face.ttf")).unwrap();

    let mut engine = TextEngine::new();
    let p = engine.prepare(&caption("Touch to Start", Some("face.ttf"), 20.0), &dir);
    assert!(!p.is_builtin());
    let size = crate::foundation::core::Size::new(70_000, 30).unwrap();
    let mut canvas = Canvas::new(size, Rgb8::BLACK);
    p.draw(&mut canvas, Point::new(69_000, 2));
    assert!((0..30).any(|y| (69_000..70_000).any(|x| canvas.get(x, y) != Some(Rgb8::BLACK))));
    assert!((0..30).all(|y| canvas.get(100, y) == Some(Rgb8::BLACK)));
}

#[test]
fn oversized_outline_caption_falls_back_to_builtin() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = temp_dir("huge");
    std::fs::copy(&font, dir.join("face.ttf")).unwrap();

    let mut engine = TextEngine::new();
    let text = "W".repeat(4_000);
    let p = engine.prepare(&caption(&text, Some("face.ttf"), 40.0), &dir);
    assert!(p.is_builtin());
    assert_eq!(p.width(), 40_000);
}
