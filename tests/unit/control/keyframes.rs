use super::*;

fn key<T>(at_ms: u64, value: T) -> Keyframe<T> {
    Keyframe {
        at_ms,
        value,
        ease: Ease::Linear,
    }
}

#[test]
fn sample_clamps_outside_the_keys() {
    let t = Track {
        keys: vec![key(100, 0.2), key(200, 0.8)],
    };
    assert_eq!(t.sample(ClockTime::ZERO), Some(0.2));
    assert_eq!(t.sample(ClockTime::from_millis(500)), Some(0.8));
}

#[test]
fn sample_interpolates_linearly() {
    let t = Track {
        keys: vec![key(0, 0.0), key(1000, 1.0)],
    };
    let v = t.sample(ClockTime::from_millis(250)).unwrap();
    assert!((v - 0.25).abs() < 1e-9);
}

#[test]
fn integer_tracks_round() {
    let t = Track {
        keys: vec![key(0, 0i32), key(1000, 3)],
    };
    assert_eq!(t.sample(ClockTime::from_millis(500)), Some(2));
}

#[test]
fn validate_rejects_unsorted_and_empty() {
    let empty: Track<f64> = Track { keys: vec![] };
    assert!(empty.validate().is_err());
    let unsorted = Track {
        keys: vec![key(10, 1.0), key(5, 0.0)],
    };
    assert!(unsorted.validate().is_err());
}

#[test]
fn controller_updates_only_present_tracks() {
    let props = StreamProperties::default();
    props.set_position(7, 9);
    let kf = Keyframes {
        opacity: Some(Track {
            keys: vec![key(0, 0.0), key(100, 1.0)],
        }),
        xpos: Some(Track {
            keys: vec![key(0, 0), key(100, 100)],
        }),
        ypos: None,
    };
    kf.sync(ClockTime::from_millis(50), &props);
    assert!((props.opacity() - 0.5).abs() < 1e-9);
    assert_eq!(props.position(), (50, 9));
}

#[test]
fn keyframes_deserialize_from_json() {
    let kf: Keyframes = serde_json::from_str(
        r#"{"opacity":[{"at_ms":0,"value":1.0},{"at_ms":500,"value":0.0,"ease":"in_out_sine"}]}"#,
    )
    .unwrap();
    kf.validate().unwrap();
    assert_eq!(kf.opacity.as_ref().unwrap().keys[1].ease, Ease::InOutSine);
    assert!(kf.xpos.is_none());
    assert!(!kf.is_empty());
}
