use std::collections::HashMap;

use crate::{
    foundation::error::{MixError, MixResult},
    video::{
        format::PixelFormat,
        frame::{Frame, FrameLayout},
    },
};

/// Supplier of output frames, one per tick.
pub trait FrameAllocator: Send {
    /// A frame of the requested geometry. Contents are unspecified.
    fn acquire(&mut self, format: PixelFormat, width: u32, height: u32) -> MixResult<Frame>;

    /// Hand a delivered frame back for reuse.
    fn release(&mut self, frame: Frame);

    /// Drop every retained frame, e.g. after the output geometry changed.
    fn purge(&mut self);
}

/// Limits of a [`FramePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained frames per (width, height, format) bucket.
    pub max_frames_per_bucket: usize,
    /// Largest single frame the pool will hand out.
    pub max_frame_bytes: usize,
}

impl Default for FramePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_frames_per_bucket: 4,
            // 8K AYUV
            max_frame_bytes: 7680 * 4320 * 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrameKey {
    w: u32,
    h: u32,
    format: PixelFormat,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FramePoolStats {
    pub retained_frames: usize,
    pub retained_bytes: usize,
    pub alloc_frames: u64,
    pub alloc_bytes: u64,
    pub reused_frames: u64,
    pub dropped_on_release: u64,
}

/// Bounded pooled allocator for output frames, bucketed by geometry and format.
#[derive(Debug)]
pub struct FramePool {
    opts: FramePoolOpts,
    stats: FramePoolStats,
    buckets: HashMap<FrameKey, Vec<Frame>>,
}

impl FramePool {
    pub fn new(opts: FramePoolOpts) -> Self {
        Self {
            opts,
            stats: FramePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub fn stats(&self) -> FramePoolStats {
        self.stats.clone()
    }

    pub fn opts(&self) -> FramePoolOpts {
        self.opts
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new(FramePoolOpts::default())
    }
}

impl FrameAllocator for FramePool {
    fn acquire(&mut self, format: PixelFormat, width: u32, height: u32) -> MixResult<Frame> {
        let key = FrameKey {
            w: width,
            h: height,
            format,
        };
        if let Some(mut frame) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            let bytes = frame.data().len();
            self.stats.retained_frames = self.stats.retained_frames.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
            self.stats.reused_frames = self.stats.reused_frames.saturating_add(1);
            frame.pts = None;
            frame.duration = None;
            return Ok(frame);
        }

        let info = format
            .info()
            .ok_or_else(|| MixError::unsupported_format(format.name()))?;
        let size = FrameLayout::new(&info, width, height)?.size;
        if size > self.opts.max_frame_bytes {
            return Err(MixError::allocation(format!(
                "{format} {width}x{height} needs {size} bytes, limit is {}",
                self.opts.max_frame_bytes
            )));
        }

        self.stats.alloc_frames = self.stats.alloc_frames.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(size as u64);
        Frame::new(format, width, height)
    }

    fn release(&mut self, frame: Frame) {
        if self.opts.max_pool_bytes == 0 || self.opts.max_frames_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bytes = frame.data().len();
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let key = FrameKey {
            w: frame.width(),
            h: frame.height(),
            format: frame.format(),
        };
        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_frames_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.push(frame);
        self.stats.retained_frames = self.stats.retained_frames.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    fn purge(&mut self) {
        self.buckets.clear();
        self.stats.retained_frames = 0;
        self.stats.retained_bytes = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/pool.rs"]
mod tests;
