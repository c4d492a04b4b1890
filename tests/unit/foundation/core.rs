use super::*;

#[test]
fn size_rejects_zero_and_negative() {
    for (w, h) in [(0, 240), (320, 0), (-1, 240), (320, -240), (0, 0)] {
        let err = Size::new(w, h).unwrap_err();
        assert!(
            matches!(err, ForgeError::InvalidDimensions { width, height } if width == w && height == h)
        );
    }
}

#[test]
fn size_rejects_values_beyond_u32() {
    assert!(Size::new(i64::from(u32::MAX) + 1, 1).is_err());
}

#[test]
fn frame_bytes_is_two_per_pixel() {
    let s = Size::new(320, 240).unwrap();
    assert_eq!(s.pixel_count(), 76_800);
    assert_eq!(s.frame_bytes(), 153_600);
    assert_eq!(s.to_string(), "320x240");
}

#[test]
fn rgb8_serializes_as_triple() {
    let c: Rgb8 = serde_json::from_str("[10, 20, 40]").unwrap();
    assert_eq!(c, Rgb8::new(10, 20, 40));
    assert_eq!(serde_json::to_string(&Rgb8::gray(7)).unwrap(), "[7,7,7]");
}

#[test]
fn dimensions_parse_negative_then_fail_validation() {
    let d: Dimensions = serde_json::from_str(r#"{"width": -320, "height": 240}"#).unwrap();
    assert!(d.validate().is_err());
}
