use super::*;

fn rolodex() -> StarfieldSpec {
    StarfieldSpec {
        base: Rgb8::new(10, 20, 40),
        count: 30,
        seed: 42,
        brightness: (150, 255),
    }
}

#[test]
fn same_seed_gives_identical_canvas() {
    let size = Size::new(320, 240).unwrap();
    let a = rolodex().generate(size).unwrap();
    let b = rolodex().generate(size).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seed_moves_stars() {
    let size = Size::new(320, 240).unwrap();
    let a = rolodex().generate(size).unwrap();
    let b = StarfieldSpec {
        seed: 43,
        ..rolodex()
    }
    .generate(size)
    .unwrap();
    assert_ne!(a, b);
}

#[test]
fn stars_are_monochrome_and_in_range() {
    let size = Size::new(320, 240).unwrap();
    let spec = rolodex();
    let c = spec.generate(size).unwrap();
    let stars: Vec<Rgb8> = c
        .pixels()
        .iter()
        .copied()
        .filter(|p| *p != spec.base)
        .collect();
    assert!(!stars.is_empty());
    assert!(stars.len() <= 30);
    for s in stars {
        assert_eq!(s.r, s.g);
        assert_eq!(s.g, s.b);
        assert!((150..=255).contains(&s.r));
    }
}

#[test]
fn zero_stars_is_a_solid_field() {
    let size = Size::new(8, 8).unwrap();
    let spec = StarfieldSpec {
        count: 0,
        ..rolodex()
    };
    let c = spec.generate(size).unwrap();
    assert!(c.pixels().iter().all(|p| *p == spec.base));
}

#[test]
fn single_pixel_canvas_is_supported() {
    let c = rolodex().generate(Size::new(1, 1).unwrap()).unwrap();
    assert_ne!(c.get(0, 0), Some(Rgb8::new(10, 20, 40)));
}

#[test]
fn inverted_brightness_is_rejected() {
    let spec = StarfieldSpec {
        brightness: (200, 100),
        ..rolodex()
    };
    assert!(spec.generate(Size::new(4, 4).unwrap()).is_err());
}

#[test]
fn brightness_defaults_when_omitted() {
    let spec: StarfieldSpec =
        serde_json::from_str(r#"{"base": [10, 20, 40], "count": 30, "seed": 42}"#).unwrap();
    assert_eq!(spec, rolodex());
}
