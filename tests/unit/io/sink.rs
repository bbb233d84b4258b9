use super::*;

fn info() -> OutputInfo {
    OutputInfo {
        format: PixelFormat::Ayuv,
        width: 2,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_records_everything() {
    let mut sink = InMemorySink::new();
    sink.configure(&info()).unwrap();
    sink.push_frame(&Frame::new(PixelFormat::Ayuv, 2, 1).unwrap())
        .unwrap();
    sink.end().unwrap();
    assert_eq!(sink.configs(), &[info()]);
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.ended());
}

#[test]
fn raw_sink_appends_frames() {
    let path = std::env::temp_dir().join(format!("framemix-raw-{}.bin", std::process::id()));
    let mut sink = RawFileSink::create(&path).unwrap();
    sink.configure(&info()).unwrap();
    let mut f = Frame::new(PixelFormat::Ayuv, 2, 1).unwrap();
    f.data_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    sink.push_frame(&f).unwrap();
    sink.push_frame(&f).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.frames_written(), 2);
    assert_eq!(sink.bytes_written(), 16);
    assert_eq!(sink.last_frame().unwrap().data(), f.data());
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[8..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    std::fs::remove_file(&path).ok();

    assert!(matches!(sink.push_frame(&f), Err(crate::MixError::Sink(_))));
}
