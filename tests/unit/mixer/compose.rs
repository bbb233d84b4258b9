use std::sync::Arc;

use crate::{
    Background, ClockTime, Compositor, CompositorConfig, Fps, Frame, FramePool, InMemorySink,
    Keyframe, Keyframes, MixError, PixelFormat, QueueSource, Registry, StreamFormat, TickOutcome,
    Track,
    control::ease::Ease,
    kernels::KernelTier,
};

fn compositor(format: PixelFormat, background: Background) -> Compositor {
    let cfg = CompositorConfig {
        format,
        background,
        ..CompositorConfig::default()
    };
    Compositor::with_parts(
        &cfg,
        Arc::new(Registry::with_tier(KernelTier::Scalar)),
        Box::new(FramePool::default()),
    )
    .unwrap()
}

fn solid(format: PixelFormat, w: u32, h: u32, px: &[u8]) -> Frame {
    let mut f = Frame::new(format, w, h).unwrap();
    for chunk in f.data_mut().chunks_exact_mut(px.len()) {
        chunk.copy_from_slice(px);
    }
    f
}

fn fps30() -> Option<Fps> {
    Some(Fps::new(30, 1).unwrap())
}

fn composed(outcome: TickOutcome) -> Frame {
    match outcome {
        TickOutcome::Composed(f) => f,
        other => panic!("expected a frame, got {other:?}"),
    }
}

#[test]
fn tick_without_streams_is_not_negotiated() {
    let c = compositor(PixelFormat::Ayuv, Background::Black);
    assert!(matches!(c.tick(), Err(MixError::NotNegotiated(_))));
}

#[test]
fn background_shows_where_no_stream_covers() {
    let c = compositor(PixelFormat::Ayuv, Background::White);
    let small = solid(PixelFormat::Ayuv, 2, 2, &[255, 50, 60, 70]);
    let h = c.attach_stream_with_format(
        Box::new(QueueSource::new([small])),
        StreamFormat::new(2, 2, fps30()),
    );
    c.attach_stream_with_format(
        Box::new(QueueSource::open()),
        StreamFormat::new(4, 2, fps30()),
    );
    h.properties().set_position(2, 0);

    let out = composed(c.tick().unwrap());
    assert_eq!((out.width(), out.height()), (4, 2));
    assert_eq!(&out.data()[..4], &[255, 240, 128, 128]);
    assert_eq!(&out.data()[8..12], &[255, 50, 60, 70]);
}

#[test]
fn zero_opacity_and_off_canvas_streams_are_skipped() {
    let c = compositor(PixelFormat::Ayuv, Background::Black);
    let a = c.attach_stream_with_format(
        Box::new(QueueSource::new([solid(PixelFormat::Ayuv, 2, 2, &[255, 1, 2, 3])])),
        StreamFormat::new(2, 2, fps30()),
    );
    let b = c.attach_stream_with_format(
        Box::new(QueueSource::new([solid(PixelFormat::Ayuv, 2, 2, &[255, 9, 9, 9])])),
        StreamFormat::new(2, 2, fps30()),
    );
    a.properties().set_opacity(0.0);
    b.properties().set_position(-2, 0);

    let out = composed(c.tick().unwrap());
    assert!(out.data().chunks_exact(4).all(|px| px == [255, 16, 128, 128]));
}

#[test]
fn controller_resolves_opacity_at_frame_time() {
    let c = compositor(PixelFormat::Y444, Background::Black);
    let frame = solid(PixelFormat::Y444, 4, 4, &[216])
        .with_timing(Some(ClockTime::from_millis(500)), None);
    let h = c.attach_stream_with_format(
        Box::new(QueueSource::new([frame])),
        StreamFormat::new(4, 4, fps30()),
    );
    let kf = Keyframes {
        opacity: Some(Track {
            keys: vec![
                Keyframe { at_ms: 0, value: 0.0, ease: Ease::Linear },
                Keyframe { at_ms: 1000, value: 1.0, ease: Ease::Linear },
            ],
        }),
        ..Keyframes::default()
    };
    c.set_controller(h.id(), Some(Arc::new(kf))).unwrap();

    let out = composed(c.tick().unwrap());
    assert_eq!(h.properties().opacity(), 0.5);
    // (16 * 128 + 216 * 128) >> 8
    assert_eq!(out.plane(0).unwrap().row(0).unwrap()[0], 116);
}

#[test]
fn output_timing_follows_master_frame() {
    let c = compositor(PixelFormat::Ayuv, Background::Black);
    let frame = Frame::new(PixelFormat::Ayuv, 2, 2)
        .unwrap()
        .with_timing(Some(ClockTime(777)), None);
    c.attach_stream_with_format(
        Box::new(QueueSource::new([frame])),
        StreamFormat::new(2, 2, fps30()),
    );
    let out = composed(c.tick().unwrap());
    assert_eq!(out.pts, Some(ClockTime(777)));
    assert_eq!(out.duration, Some(ClockTime(33_333_334)));
}

#[test]
fn output_timing_is_derived_without_master_timestamps() {
    let c = compositor(PixelFormat::Ayuv, Background::Black);
    let frames = (0..3).map(|_| Frame::new(PixelFormat::Ayuv, 2, 2).unwrap());
    c.attach_stream_with_format(
        Box::new(QueueSource::new(frames)),
        StreamFormat::new(2, 2, Some(Fps::new(25, 1).unwrap())),
    );
    let pts: Vec<_> = (0..3).map(|_| composed(c.tick().unwrap()).pts).collect();
    assert_eq!(
        pts,
        vec![Some(ClockTime(0)), Some(ClockTime(40_000_000)), Some(ClockTime(80_000_000))]
    );
    assert!(matches!(c.tick().unwrap(), TickOutcome::EndOfStream));
}

#[test]
fn transparent_background_accumulates_alpha() {
    let c = compositor(PixelFormat::Rgba, Background::Transparent);
    let h = c.attach_stream_with_format(
        Box::new(QueueSource::new([solid(PixelFormat::Rgba, 1, 1, &[200, 100, 0, 255])])),
        StreamFormat::new(1, 1, fps30()),
    );
    h.properties().set_opacity(0.5);
    let out = composed(c.tick().unwrap());
    assert_eq!(out.data(), &[200, 100, 0, 127]);
}

#[test]
fn geometry_change_purges_recycled_frames() {
    let c = compositor(PixelFormat::Ayuv, Background::Black);
    let frames = (0..3).map(|_| Frame::new(PixelFormat::Ayuv, 2, 2).unwrap());
    let h = c.attach_stream_with_format(
        Box::new(QueueSource::new(frames)),
        StreamFormat::new(2, 2, fps30()),
    );
    let f = composed(c.tick().unwrap());
    c.recycle(f);
    assert!(!c.geometry_changed());

    c.set_stream_format(h.id(), StreamFormat::new(4, 4, fps30()))
        .unwrap();
    assert!(c.geometry_changed());
    let f = composed(c.tick().unwrap());
    assert_eq!((f.width(), f.height()), (4, 4));
    assert!(!c.geometry_changed());
}

#[test]
fn run_describes_output_and_ends() {
    let c = compositor(PixelFormat::Ayuv, Background::Checker);
    let frames = (0..4).map(|_| Frame::new(PixelFormat::Ayuv, 8, 8).unwrap());
    c.attach_stream_with_format(
        Box::new(QueueSource::new(frames)),
        StreamFormat::new(8, 8, fps30()),
    );
    let mut sink = InMemorySink::new();
    let stats = c.run(&mut sink).unwrap();
    assert_eq!(stats.frames, 4);
    assert_eq!(stats.reconfigures, 1);
    assert_eq!(sink.frames().len(), 4);
    assert_eq!(sink.configs()[0].width, 8);
    assert!(sink.ended());
    assert_eq!(c.frames_composed(), 4);
}
