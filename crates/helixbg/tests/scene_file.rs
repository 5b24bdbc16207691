use std::fs;

use helix::{HelixConfig, WaveId};
use tempfile::tempdir;

const SCENE: &str = r##"
gradient = ["#7a4d8f", "#d4bfe8"]
waves = ["top", "bottom"]
strand_count = [4, 6]
strand_spacing = 0.25
animation_speed = 0.5
smoothing = 0.2

[positions.bottom]
x = 1.0
y = -0.5
rotation = 0.3

[bend]
enabled = false

[parallax]
strength = 0.1
"##;

#[test]
fn scene_file_round_trips_through_resolution() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.toml");
    fs::write(&path, SCENE).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let config = HelixConfig::from_toml_str(&text).unwrap();
    let params = config.resolve();

    let top = params.waves[WaveId::Top.index()];
    assert!(top.enabled);
    assert_eq!(top.count, 4);
    assert_eq!(top.spacing, 0.25);

    let middle = params.waves[WaveId::Middle.index()];
    assert!(!middle.enabled);
    assert_eq!(middle.count, 0);

    let bottom = params.waves[WaveId::Bottom.index()];
    assert_eq!(bottom.count, 6);
    assert_eq!((bottom.origin_x, bottom.origin_y, bottom.rotation), (1.0, -0.5, 0.3));

    assert_eq!(params.gradient.len(), 2);
    assert_eq!(params.animation_speed, 0.5);
    assert_eq!(params.smoothing, 0.2);
    assert!(!params.bend.enabled);
    assert!(params.parallax.enabled);
    assert_eq!(params.parallax.strength, 0.1);
}

#[test]
fn truncated_scene_files_fail_loudly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "waves = [\"top\"").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(HelixConfig::from_toml_str(&text).is_err());
}
