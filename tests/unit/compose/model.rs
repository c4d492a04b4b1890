use super::*;

#[test]
fn boot_splash_json_parses_with_defaults() {
    let spec: CompositionSpec = serde_json::from_str(
        r#"{
            "background": { "solid": [0, 0, 0] },
            "elements": [ { "source": "HPT.png" } ],
            "text": { "text": "Touch to Start", "font": { "source": "arial.ttf" } }
        }"#,
    )
    .unwrap();

    assert_eq!(spec.background, Background::Solid(Rgb8::BLACK));
    assert_eq!(spec.elements[0].placement, Placement::Center);
    assert!(spec.elements[0].resize.is_none());
    let text = spec.text.unwrap();
    assert_eq!(text.color, Rgb8::WHITE);
    assert_eq!(text.font.size_px, 20.0);
    assert_eq!(
        text.placement,
        TextPlacement::CenterAboveBottom { offset_px: 40 }
    );
}

#[test]
fn image_background_defaults_to_lanczos_on_black() {
    let bg: Background = serde_json::from_str(r#"{ "image": { "source": "bg.jpg" } }"#).unwrap();
    assert_eq!(bg.fill_color(), Rgb8::BLACK);
    let Background::Image { resample, .. } = bg else {
        panic!("expected image background");
    };
    assert_eq!(resample, Resample::Lanczos3);
}

#[test]
fn explicit_placement_and_resize_parse() {
    let el: ElementSpec = serde_json::from_str(
        r#"{
            "source": "frame_0.gif",
            "placement": { "at": { "x": -4, "y": 12 } },
            "resize": { "size": { "width": 120, "height": 84 }, "resample": "nearest" }
        }"#,
    )
    .unwrap();
    assert_eq!(el.placement, Placement::At(Point::new(-4, 12)));
    let r = el.resize.unwrap();
    assert_eq!(r.size, Dimensions::new(120, 84));
    assert_eq!(r.resample, Resample::Nearest);
}

#[test]
fn resample_names_are_kebab_case() {
    let r: Resample = serde_json::from_str("\"catmull-rom\"").unwrap();
    assert_eq!(r, Resample::CatmullRom);
    assert_eq!(
        Resample::Nearest.filter(),
        image::imageops::FilterType::Nearest
    );
}
