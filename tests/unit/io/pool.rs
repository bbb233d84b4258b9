use super::*;

fn opts(max_pool_bytes: usize, max_frames_per_bucket: usize) -> FramePoolOpts {
    FramePoolOpts {
        max_pool_bytes,
        max_frames_per_bucket,
        ..FramePoolOpts::default()
    }
}

#[test]
fn pool_honors_bucket_cap() {
    let mut p = FramePool::new(opts(1 << 30, 1));
    let a = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    let b = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_frames, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = 8 * 8 * 4;
    let mut p = FramePool::new(opts(bytes_8x8, 8));
    let a = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    let b = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_frames, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn released_frames_are_reused_without_timing() {
    let mut p = FramePool::default();
    let mut f = p.acquire(PixelFormat::I420, 16, 16).unwrap();
    f.pts = Some(crate::ClockTime(5));
    p.release(f);
    let again = p.acquire(PixelFormat::I420, 16, 16).unwrap();
    assert_eq!(again.pts, None);
    let st = p.stats();
    assert_eq!((st.alloc_frames, st.reused_frames, st.retained_frames), (1, 1, 0));
}

#[test]
fn buckets_are_keyed_by_geometry_and_format() {
    let mut p = FramePool::default();
    let f = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    p.release(f);
    p.acquire(PixelFormat::Ayuv, 8, 4).unwrap();
    p.acquire(PixelFormat::Bgra, 8, 8).unwrap();
    assert_eq!(p.stats().reused_frames, 0);
    assert_eq!(p.stats().retained_frames, 1);
}

#[test]
fn purge_drops_everything() {
    let mut p = FramePool::default();
    let f = p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    p.release(f);
    p.purge();
    assert_eq!(p.stats().retained_frames, 0);
    p.acquire(PixelFormat::Ayuv, 8, 8).unwrap();
    assert_eq!(p.stats().alloc_frames, 2);
}

#[test]
fn oversized_frames_fail_allocation() {
    let mut p = FramePool::new(FramePoolOpts {
        max_frame_bytes: 1024,
        ..FramePoolOpts::default()
    });
    assert!(matches!(
        p.acquire(PixelFormat::Ayuv, 64, 64),
        Err(MixError::Allocation(_))
    ));
    assert!(matches!(
        p.acquire(PixelFormat::Ayuv, u32::MAX, u32::MAX),
        Err(MixError::Allocation(_))
    ));
    assert!(p.acquire(PixelFormat::Ayuv, 16, 16).is_ok());
}
