use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    config::{Background, CompositorConfig, KernelPreference},
    control::keyframes::PropertyController,
    foundation::{
        core::Fps,
        error::{MixError, MixResult},
    },
    io::{
        pool::{FrameAllocator, FramePool},
        sink::OutputInfo,
        source::FrameSource,
    },
    mixer::stream::{Stream, StreamFormat, StreamHandle, StreamId, StreamProperties},
    registry::table::Registry,
    video::format::PixelFormat,
};

/// Multi-stream compositor.
///
/// Structural state (stream list, z-order, output geometry) lives behind one mutex, taken by
/// every tick and by every structural change, so a tick never observes half of a re-sort.
/// Per-stream position and opacity bypass the lock through [`StreamProperties`].
pub struct Compositor {
    pub(crate) registry: Arc<Registry>,
    pub(crate) format: PixelFormat,
    pub(crate) state: Mutex<MixerState>,
}

pub(crate) struct MixerState {
    /// Sorted by `(zorder, seq)`.
    pub(crate) streams: Vec<Stream>,
    next_id: u64,
    next_seq: u64,
    pub(crate) background: Background,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) fps: Option<Fps>,
    pub(crate) master: Option<StreamId>,
    pub(crate) geometry_changed: bool,
    pub(crate) allocator: Box<dyn FrameAllocator>,
    pub(crate) frames_out: u64,
}

impl MixerState {
    pub(crate) fn new(background: Background, allocator: Box<dyn FrameAllocator>) -> Self {
        Self {
            streams: Vec::new(),
            next_id: 0,
            next_seq: 0,
            background,
            width: 0,
            height: 0,
            fps: None,
            master: None,
            geometry_changed: false,
            allocator,
            frames_out: 0,
        }
    }

    pub(crate) fn stream_mut(&mut self, id: StreamId) -> MixResult<&mut Stream> {
        self.streams
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(MixError::UnknownStream(id.0))
    }

    fn stream(&self, id: StreamId) -> MixResult<&Stream> {
        self.streams
            .iter()
            .find(|s| s.id == id)
            .ok_or(MixError::UnknownStream(id.0))
    }

    fn sort(&mut self) {
        self.streams.sort_by_key(|s| (s.zorder, s.seq));
    }

    /// Derive output geometry and rate from the attached streams.
    ///
    /// Returns whether anything changed; a change also raises the geometry-changed flag.
    pub(crate) fn recompute_master_geometry(&mut self) -> bool {
        let (mut width, mut height) = (0u32, 0u32);
        let mut finest: Option<(Fps, StreamId)> = None;

        for s in self.streams.iter().filter(|s| s.format.has_geometry()) {
            width = width.max(s.format.width);
            height = height.max(s.format.height);
            if let Some(rate) = s.format.rate()
                && finest.is_none_or(|(best, _)| rate.is_finer_than(best))
            {
                finest = Some((rate, s.id));
            }
        }

        let fps = match finest {
            Some((rate, _)) => Some(rate),
            None if width > 0 && height > 0 => Some(Fps::FALLBACK),
            None => None,
        };
        let master = finest.map(|(_, id)| id);

        let changed = (width, height, fps, master)
            != (self.width, self.height, self.fps, self.master);
        if changed {
            tracing::debug!(
                width,
                height,
                fps = ?fps,
                master = ?master,
                "output geometry changed"
            );
            self.width = width;
            self.height = height;
            self.fps = fps;
            self.master = master;
            self.geometry_changed = true;
        }
        changed
    }
}

impl Compositor {
    /// Compositor using the process-wide registry (or a scalar one when configured so) and a
    /// [`FramePool`] sized by `config.pool`.
    pub fn new(config: CompositorConfig) -> MixResult<Self> {
        let registry = match config.kernels {
            KernelPreference::Auto => Registry::shared(),
            KernelPreference::Scalar => Arc::new(Registry::probe(KernelPreference::Scalar)),
        };
        let pool = Box::new(FramePool::new(config.pool));
        Self::with_parts(&config, registry, pool)
    }

    /// Fails with [`MixError::UnsupportedFormat`] when `config.format` has no registry entry.
    pub fn with_parts(
        config: &CompositorConfig,
        registry: Arc<Registry>,
        allocator: Box<dyn FrameAllocator>,
    ) -> MixResult<Self> {
        let desc = registry.lookup(config.format)?;
        tracing::debug!(
            format = %config.format,
            tier = %desc.tier(),
            background = ?config.background,
            "compositor configured"
        );
        Ok(Self {
            format: config.format,
            registry,
            state: Mutex::new(MixerState::new(config.background, allocator)),
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Attach a new input on top of the stack (z-order = current stream count).
    ///
    /// Geometry stays unknown until [`Compositor::set_stream_format`] or the first frame.
    pub fn attach_stream(&self, source: Box<dyn FrameSource>) -> StreamHandle {
        let mut st = self.state.lock();
        let id = StreamId(st.next_id);
        st.next_id += 1;
        let seq = st.next_seq;
        st.next_seq += 1;
        let zorder = u32::try_from(st.streams.len()).unwrap_or(u32::MAX);
        let stream = Stream::new(id, seq, zorder, source);
        let handle = stream.handle();
        st.streams.push(stream);
        st.sort();
        tracing::debug!(%id, zorder, "stream attached");
        handle
    }

    /// Attach and declare geometry in one step.
    pub fn attach_stream_with_format(
        &self,
        source: Box<dyn FrameSource>,
        format: StreamFormat,
    ) -> StreamHandle {
        let handle = self.attach_stream(source);
        let mut st = self.state.lock();
        if let Ok(s) = st.stream_mut(handle.id()) {
            s.format = format;
        }
        st.recompute_master_geometry();
        handle
    }

    /// Remove a stream, dropping any frame it still buffers.
    pub fn detach_stream(&self, id: StreamId) -> MixResult<()> {
        let mut st = self.state.lock();
        let idx = st
            .streams
            .iter()
            .position(|s| s.id == id)
            .ok_or(MixError::UnknownStream(id.0))?;
        st.streams.remove(idx);
        st.recompute_master_geometry();
        tracing::debug!(%id, "stream detached");
        Ok(())
    }

    /// Declare a stream's geometry and rate, re-deriving the output.
    pub fn set_stream_format(&self, id: StreamId, format: StreamFormat) -> MixResult<()> {
        let mut st = self.state.lock();
        st.stream_mut(id)?.format = format;
        st.recompute_master_geometry();
        Ok(())
    }

    pub fn stream_format(&self, id: StreamId) -> MixResult<StreamFormat> {
        Ok(self.state.lock().stream(id)?.format)
    }

    pub fn set_zorder(&self, id: StreamId, zorder: u32) -> MixResult<()> {
        let mut st = self.state.lock();
        st.stream_mut(id)?.zorder = zorder;
        st.sort();
        Ok(())
    }

    pub fn zorder(&self, id: StreamId) -> MixResult<u32> {
        Ok(self.state.lock().stream(id)?.zorder)
    }

    /// Install (or clear) the controller resolving this stream's animated properties.
    pub fn set_controller(
        &self,
        id: StreamId,
        controller: Option<Arc<dyn PropertyController>>,
    ) -> MixResult<()> {
        self.state.lock().stream_mut(id)?.controller = controller;
        Ok(())
    }

    pub fn properties(&self, id: StreamId) -> MixResult<Arc<StreamProperties>> {
        Ok(self.state.lock().stream(id)?.props.clone())
    }

    pub fn set_background(&self, background: Background) {
        self.state.lock().background = background;
    }

    pub fn background(&self) -> Background {
        self.state.lock().background
    }

    /// Current output description, `None` until some stream has known geometry.
    pub fn output_info(&self) -> Option<OutputInfo> {
        let st = self.state.lock();
        if st.width == 0 || st.height == 0 {
            return None;
        }
        Some(OutputInfo {
            format: self.format,
            width: st.width,
            height: st.height,
            fps: st.fps.unwrap_or(Fps::FALLBACK),
        })
    }

    pub fn output_size(&self) -> (u32, u32) {
        let st = self.state.lock();
        (st.width, st.height)
    }

    pub fn output_fps(&self) -> Option<Fps> {
        self.state.lock().fps
    }

    /// Stream whose rate paces the output, if any stream declares one.
    pub fn master(&self) -> Option<StreamId> {
        self.state.lock().master
    }

    /// Re-derive output geometry. Returns `false` when nothing changed.
    pub fn recompute_master_geometry(&self) -> bool {
        self.state.lock().recompute_master_geometry()
    }

    /// Whether a geometry change is pending for the next composed frame.
    pub fn geometry_changed(&self) -> bool {
        self.state.lock().geometry_changed
    }

    /// Attached streams, bottom to top.
    pub fn stream_ids(&self) -> Vec<StreamId> {
        self.state.lock().streams.iter().map(|s| s.id).collect()
    }

    pub fn frames_composed(&self) -> u64 {
        self.state.lock().frames_out
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mixer/state.rs"]
mod tests;
