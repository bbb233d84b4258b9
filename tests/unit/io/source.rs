use super::*;
use crate::{foundation::core::ClockTime, kernels::KernelTier};

#[test]
fn closed_queue_drains_then_ends() {
    let f = Frame::new(PixelFormat::Ayuv, 1, 1).unwrap();
    let mut q = QueueSource::new([f.clone(), f]);
    assert!(matches!(q.try_pop_frame(), Pull::Frame(_)));
    assert!(matches!(q.try_pop_frame(), Pull::Frame(_)));
    assert!(matches!(q.try_pop_frame(), Pull::EndOfStream));
}

#[test]
fn open_queue_reports_empty_until_closed() {
    let mut q = QueueSource::open();
    assert!(matches!(q.try_pop_frame(), Pull::Empty));
    q.push(Frame::new(PixelFormat::Ayuv, 1, 1).unwrap());
    assert_eq!(q.len(), 1);
    assert!(matches!(q.try_pop_frame(), Pull::Frame(_)));
    q.close();
    assert!(matches!(q.try_pop_frame(), Pull::EndOfStream));
}

#[test]
fn pattern_source_stamps_timing() {
    let reg = Registry::with_tier(KernelTier::Scalar);
    let fps = Fps::new(25, 1).unwrap();
    let mut src = PatternSource::new(
        &reg,
        PixelFormat::Ayuv,
        (2, 2),
        Some(fps),
        Pattern::Solid { y: 16, u: 128, v: 128 },
        2,
    )
    .unwrap();
    assert_eq!(src.remaining(), 2);

    let Pull::Frame(a) = src.try_pop_frame() else { panic!("expected frame") };
    let Pull::Frame(b) = src.try_pop_frame() else { panic!("expected frame") };
    assert!(matches!(src.try_pop_frame(), Pull::EndOfStream));

    assert_eq!(a.pts, Some(ClockTime::ZERO));
    assert_eq!(b.pts, Some(ClockTime(40_000_000)));
    assert_eq!(b.duration, Some(ClockTime(40_000_000)));
    assert_eq!(&a.data()[..4], &[0xFF, 16, 128, 128]);
}

#[test]
fn pattern_source_without_rate_has_no_timing() {
    let reg = Registry::with_tier(KernelTier::Scalar);
    let mut src =
        PatternSource::new(&reg, PixelFormat::I420, (4, 4), None, Pattern::Checker, 1).unwrap();
    let Pull::Frame(f) = src.try_pop_frame() else { panic!("expected frame") };
    assert_eq!((f.pts, f.duration), (None, None));
}

#[test]
fn pattern_source_rejects_unsupported_formats() {
    let reg = Registry::with_tier(KernelTier::Scalar);
    assert!(PatternSource::new(&reg, PixelFormat::Nv12, (4, 4), None, Pattern::Checker, 1).is_err());
}

#[test]
fn pattern_serde_is_tagged() {
    let p: Pattern = serde_json::from_str(r#"{"kind":"solid","y":1,"u":2,"v":3}"#).unwrap();
    assert_eq!(p, Pattern::Solid { y: 1, u: 2, v: 3 });
    let p: Pattern = serde_json::from_str(r#"{"kind":"checker"}"#).unwrap();
    assert_eq!(p, Pattern::Checker);
}
