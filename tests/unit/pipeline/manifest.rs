use super::*;
use crate::{color::policy::PolicyPreset, compose::model::Placement};

const BOOT: &str = r#"{
    "root": "assets",
    "out_dir": "data",
    "assets": [
        {
            "name": "boot_splash",
            "size": { "width": 320, "height": 240 },
            "policy": "swapped-inverted-le",
            "compose": {
                "background": { "solid": [0, 0, 0] },
                "elements": [ { "source": "HPT.png", "placement": "center" } ],
                "text": {
                    "text": "Touch to Start",
                    "font": { "source": "arial.ttf", "size_px": 20 },
                    "placement": { "center_above_bottom": { "offset_px": 40 } }
                }
            }
        },
        {
            "name": "rolodex_bg",
            "output": "rolodex/bg.raw",
            "size": { "width": 320, "height": 240 },
            "policy": { "byte_order": "big", "invert": true },
            "pattern": { "starfield": { "base": [10, 20, 40], "count": 30, "seed": 42 } }
        },
        {
            "name": "nyan",
            "size": { "width": 320, "height": 240 },
            "series": { "count": 12, "source": "frames/nyan_{i}", "output": "nyan_{i}.raw" }
        }
    ]
}"#;

#[test]
fn parses_every_asset_kind() {
    let m = Manifest::from_reader(BOOT.as_bytes()).unwrap();
    assert_eq!(m.assets.len(), 3);

    let boot = &m.assets[0];
    assert_eq!(boot.output_name(), "boot_splash.raw");
    assert_eq!(
        boot.policy,
        PolicySpec::Preset(PolicyPreset::SwappedInvertedLittleEndian)
    );
    let AssetSource::Compose(comp) = &boot.source else {
        panic!("expected composition");
    };
    assert_eq!(comp.elements[0].placement, Placement::Center);
    assert_eq!(comp.text.as_ref().unwrap().font.size_px, 20.0);

    let bg = &m.assets[1];
    assert_eq!(bg.output_name(), "rolodex/bg.raw");
    assert_eq!(bg.source.kind(), "starfield");
    assert_eq!(bg.policy.resolve(), PolicyPreset::InvertedBigEndian.policy());

    let nyan = &m.assets[2];
    assert_eq!(nyan.source.kind(), "series");
    assert_eq!(nyan.policy, PolicySpec::default());
}

#[test]
fn directories_resolve_against_the_manifest_file() {
    let dir = std::env::temp_dir().join(format!(
        "panelforge_manifest_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("assets.json");
    std::fs::write(&path, BOOT).unwrap();

    let m = Manifest::from_path(&path).unwrap();
    assert_eq!(m.base_dir(), dir.as_path());
    assert_eq!(m.root_dir(), dir.join("assets"));
    assert_eq!(m.output_dir(), dir.join("data"));
}

#[test]
fn output_dir_defaults_to_root() {
    let m = Manifest::from_reader(r#"{ "root": "a", "assets": [] }"#.as_bytes()).unwrap();
    assert_eq!(m.output_dir(), m.root_dir());
}

#[test]
fn negative_sizes_parse_and_fail_later() {
    let m = Manifest::from_reader(
        r#"{ "assets": [ { "name": "bad", "size": { "width": -1, "height": 240 },
             "compose": { "background": { "solid": [0, 0, 0] } } } ] }"#
            .as_bytes(),
    )
    .unwrap();
    let err = m.assets[0].size.validate().unwrap_err();
    assert_eq!(err.kind(), "invalid-dimensions");
}

#[test]
fn duplicate_names_and_bad_json_are_rejected() {
    let dup = r#"{ "assets": [
        { "name": "a", "size": { "width": 1, "height": 1 }, "compose": { "background": { "solid": [0,0,0] } } },
        { "name": "a", "size": { "width": 1, "height": 1 }, "compose": { "background": { "solid": [0,0,0] } } }
    ] }"#;
    assert_eq!(
        Manifest::from_reader(dup.as_bytes()).unwrap_err().kind(),
        "validation"
    );
    assert_eq!(
        Manifest::from_reader("{".as_bytes()).unwrap_err().kind(),
        "serde"
    );
    assert_eq!(
        Manifest::from_path("/definitely/not/here.json")
            .unwrap_err()
            .kind(),
        "validation"
    );
}
