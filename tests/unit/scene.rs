use super::*;
use crate::{Background, PixelFormat, TickOutcome};

const SCENE: &str = r#"{
  "compositor": { "format": "I420", "background": "black", "kernels": "scalar" },
  "streams": [
    { "width": 64, "height": 48, "fps": { "num": 30, "den": 1 }, "frames": 2,
      "pattern": { "kind": "checker" } },
    { "width": 32, "height": 24, "fps": { "num": 30, "den": 1 }, "frames": 2,
      "xpos": 16, "ypos": 12, "opacity": 0.5, "zorder": 7,
      "pattern": { "kind": "solid", "y": 235, "u": 128, "v": 128 } }
  ]
}"#;

#[test]
fn scene_parses_with_defaults() {
    let scene = SceneFile::from_json(SCENE).unwrap();
    assert_eq!(scene.compositor.format, PixelFormat::I420);
    assert_eq!(scene.compositor.background, Background::Black);
    assert_eq!(scene.streams[0].opacity, 1.0);
    assert_eq!(scene.streams[0].xpos, 0);
    assert_eq!(scene.streams[1].zorder, Some(7));
}

#[test]
fn scene_builds_a_runnable_compositor() {
    let scene = SceneFile::from_json(SCENE).unwrap();
    let (comp, handles) = scene.build().unwrap();
    assert_eq!(handles.len(), 2);
    assert_eq!(comp.output_size(), (64, 48));
    assert_eq!(comp.zorder(handles[1].id()).unwrap(), 7);
    assert_eq!(handles[1].properties().position(), (16, 12));

    let TickOutcome::Composed(frame) = comp.tick().unwrap() else {
        panic!("expected a frame");
    };
    let luma = frame.plane(0).unwrap();
    // Solid 235 at half opacity over the 160 checker tile at row 12, col 16.
    assert_eq!(luma.row(12).unwrap()[16], ((160 * 128 + 235 * 128) >> 8) as u8);
}

#[test]
fn invalid_scenes_are_rejected() {
    assert!(SceneFile::from_json(r#"{"streams":[]}"#).is_err());
    let zero_rate = r#"{"streams":[{"width":4,"height":4,"fps":{"num":0,"den":1},"frames":1}]}"#;
    assert!(matches!(
        SceneFile::from_json(zero_rate),
        Err(MixError::Validation(_))
    ));
    let typo = r#"{"streams":[{"width":4,"height":4,"fps":{"num":1,"den":1},"frame":1}]}"#;
    assert!(SceneFile::from_json(typo).is_err());
}
