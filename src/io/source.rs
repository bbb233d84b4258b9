use std::collections::VecDeque;

use crate::{
    foundation::{core::Fps, error::MixResult},
    registry::table::Registry,
    video::{format::PixelFormat, frame::Frame},
};

/// Result of asking an upstream supply for its next frame.
#[derive(Debug)]
pub enum Pull {
    Frame(Frame),
    /// Nothing available right now, more may follow.
    Empty,
    /// The supply is finished for good.
    EndOfStream,
}

/// Upstream frame supply of one stream.
pub trait FrameSource: Send {
    fn try_pop_frame(&mut self) -> Pull;
}

/// Frames pushed by the caller, handed out in order.
///
/// A closed queue reports end-of-stream once drained; an open one reports [`Pull::Empty`].
#[derive(Debug, Default)]
pub struct QueueSource {
    frames: VecDeque<Frame>,
    closed: bool,
}

impl QueueSource {
    /// Closed queue holding `frames`.
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            closed: true,
        }
    }

    /// Empty queue that stays open until [`QueueSource::close`].
    pub fn open() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for QueueSource {
    fn try_pop_frame(&mut self) -> Pull {
        match self.frames.pop_front() {
            Some(f) => Pull::Frame(f),
            None if self.closed => Pull::EndOfStream,
            None => Pull::Empty,
        }
    }
}

/// Synthetic picture content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// One video-range YUV colour, converted for RGB layouts.
    Solid { y: u8, u: u8, v: u8 },
    #[default]
    Checker,
}

/// Generates a fixed number of identical, timestamped frames.
#[derive(Debug)]
pub struct PatternSource {
    template: Frame,
    fps: Option<Fps>,
    next: u64,
    count: u64,
}

impl PatternSource {
    pub fn new(
        registry: &Registry,
        format: PixelFormat,
        (width, height): (u32, u32),
        fps: Option<Fps>,
        pattern: Pattern,
        count: u64,
    ) -> MixResult<Self> {
        let desc = registry.lookup(format)?;
        let mut template = Frame::new(format, width, height)?;
        match pattern {
            Pattern::Solid { y, u, v } => desc.fill_color(&mut template, [y, u, v])?,
            Pattern::Checker => desc.fill_checker(&mut template)?,
        }
        Ok(Self {
            template,
            fps,
            next: 0,
            count,
        })
    }

    pub fn remaining(&self) -> u64 {
        self.count - self.next
    }
}

impl FrameSource for PatternSource {
    fn try_pop_frame(&mut self) -> Pull {
        if self.next >= self.count {
            return Pull::EndOfStream;
        }
        let n = self.next;
        self.next += 1;
        let (pts, duration) = match self.fps {
            Some(fps) => (Some(fps.frames_to_time(n)), Some(fps.frame_duration())),
            None => (None, None),
        };
        Pull::Frame(self.template.clone().with_timing(pts, duration))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/source.rs"]
mod tests;
