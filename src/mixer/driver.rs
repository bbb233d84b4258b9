use crate::{
    foundation::{
        core::Fps,
        error::{MixError, MixResult},
    },
    io::sink::{FrameSink, OutputInfo},
    mixer::{scheduler::FillStatus, state::Compositor},
    video::frame::Frame,
};

/// Result of one composition cycle.
#[derive(Debug)]
pub enum TickOutcome {
    /// A new output frame. Hand it back with [`Compositor::recycle`] once delivered.
    Composed(Frame),
    /// No stream has a frame yet; try again when upstream produced more.
    NeedData,
    /// Every stream is exhausted. Terminal.
    EndOfStream,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated counters of a [`Compositor::run`] call.
pub struct RunStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Output descriptions sent to the sink.
    pub reconfigures: u64,
    /// Ticks that found no buffered frame.
    pub need_data: u64,
}

impl Compositor {
    /// Run one tick: fill stream buffers, compose, then drain.
    ///
    /// Fails with [`MixError::NotNegotiated`] while no output geometry is known, and with
    /// [`MixError::Allocation`] when no output frame can be obtained.
    #[tracing::instrument(skip(self), fields(format = %self.format))]
    pub fn tick(&self) -> MixResult<TickOutcome> {
        let mut st = self.state.lock();
        if st.streams.is_empty() {
            return Err(MixError::not_negotiated("no streams attached"));
        }

        match st.fill_queues(self.format)? {
            FillStatus::Ready => {}
            FillStatus::NeedData => return Ok(TickOutcome::NeedData),
            FillStatus::EndOfStream => {
                tracing::debug!(frames = st.frames_out, "end of stream");
                return Ok(TickOutcome::EndOfStream);
            }
        }
        if st.width == 0 || st.height == 0 {
            return Err(MixError::not_negotiated("output geometry is unknown"));
        }

        let frame = st.compose(&self.registry, self.format)?;
        st.drain_queues();
        st.frames_out += 1;
        tracing::trace!(n = st.frames_out, pts = ?frame.pts, "composed frame");
        Ok(TickOutcome::Composed(frame))
    }

    /// Return a delivered frame to the allocator.
    pub fn recycle(&self, frame: Frame) {
        self.state.lock().allocator.release(frame);
    }

    /// Drive ticks into `sink` until every stream reaches end-of-stream.
    ///
    /// The sink is described before the first frame and again whenever the output changes.
    /// While upstream has nothing ready the loop yields the thread and polls again.
    pub fn run(&self, sink: &mut dyn FrameSink) -> MixResult<RunStats> {
        let mut stats = RunStats::default();
        let mut described: Option<OutputInfo> = None;

        loop {
            match self.tick()? {
                TickOutcome::Composed(frame) => {
                    let info = OutputInfo {
                        format: self.format,
                        width: frame.width(),
                        height: frame.height(),
                        fps: self.output_fps().unwrap_or(Fps::FALLBACK),
                    };
                    if described != Some(info) {
                        sink.configure(&info)?;
                        described = Some(info);
                        stats.reconfigures += 1;
                    }
                    sink.push_frame(&frame)?;
                    stats.frames += 1;
                    self.recycle(frame);
                }
                TickOutcome::NeedData => {
                    stats.need_data += 1;
                    std::thread::yield_now();
                }
                TickOutcome::EndOfStream => {
                    sink.end()?;
                    return Ok(stats);
                }
            }
        }
    }
}
