use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicI32, AtomicU64, Ordering},
    },
};

use crate::{
    control::keyframes::PropertyController,
    foundation::core::{Fps, OwedDuration},
    io::source::FrameSource,
    video::frame::Frame,
};

/// Identifier of an attached stream, unique for the compositor's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(pub u64);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// Declared geometry and rate of a stream. Zero width or height means "not known yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamFormat {
    pub width: u32,
    pub height: u32,
    pub fps: Option<Fps>,
}

impl StreamFormat {
    pub fn new(width: u32, height: u32, fps: Option<Fps>) -> Self {
        Self { width, height, fps }
    }

    pub fn has_geometry(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Declared rate, ignoring degenerate fractions.
    pub fn rate(&self) -> Option<Fps> {
        self.fps.filter(|f| f.num > 0 && f.den > 0)
    }
}

/// Position and opacity of one stream.
///
/// Readable and writable from any thread without the compositor lock. Each field is its own
/// atomic: a reader may see a new x with an old y, never a torn value.
#[derive(Debug)]
pub struct StreamProperties {
    xpos: AtomicI32,
    ypos: AtomicI32,
    opacity_bits: AtomicU64,
}

impl Default for StreamProperties {
    fn default() -> Self {
        Self {
            xpos: AtomicI32::new(0),
            ypos: AtomicI32::new(0),
            opacity_bits: AtomicU64::new(1.0f64.to_bits()),
        }
    }
}

impl StreamProperties {
    pub fn position(&self) -> (i32, i32) {
        (
            self.xpos.load(Ordering::Relaxed),
            self.ypos.load(Ordering::Relaxed),
        )
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.xpos.store(x, Ordering::Relaxed);
        self.ypos.store(y, Ordering::Relaxed);
    }

    pub fn opacity(&self) -> f64 {
        f64::from_bits(self.opacity_bits.load(Ordering::Relaxed))
    }

    /// Values outside `0.0..=1.0` are clamped; NaN becomes 0.
    pub fn set_opacity(&self, opacity: f64) {
        let v = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self.opacity_bits.store(v.to_bits(), Ordering::Relaxed);
    }
}

/// Caller-side handle of an attached stream.
#[derive(Clone, Debug)]
pub struct StreamHandle {
    id: StreamId,
    props: Arc<StreamProperties>,
}

impl StreamHandle {
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Lock-free property access, usable from an animation thread.
    pub fn properties(&self) -> &StreamProperties {
        &self.props
    }
}

/// One attached input: upstream supply, one-frame buffer and scheduling state.
pub(crate) struct Stream {
    pub(crate) id: StreamId,
    /// Attach order, breaks z-order ties.
    pub(crate) seq: u64,
    pub(crate) zorder: u32,
    pub(crate) format: StreamFormat,
    pub(crate) props: Arc<StreamProperties>,
    pub(crate) source: Box<dyn FrameSource>,
    pub(crate) controller: Option<Arc<dyn PropertyController>>,
    pub(crate) buffered: Option<Frame>,
    pub(crate) owed: OwedDuration,
    pub(crate) eos: bool,
}

impl Stream {
    pub(crate) fn new(id: StreamId, seq: u64, zorder: u32, source: Box<dyn FrameSource>) -> Self {
        Self {
            id,
            seq,
            zorder,
            format: StreamFormat::default(),
            props: Arc::new(StreamProperties::default()),
            source,
            controller: None,
            buffered: None,
            owed: OwedDuration::default(),
            eos: false,
        }
    }

    pub(crate) fn handle(&self) -> StreamHandle {
        StreamHandle {
            id: self.id,
            props: self.props.clone(),
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("zorder", &self.zorder)
            .field("format", &self.format)
            .field("buffered", &self.buffered.is_some())
            .field("owed", &self.owed)
            .field("eos", &self.eos)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mixer/stream.rs"]
mod tests;
