use crate::{
    foundation::{
        core::OwedDuration,
        error::{MixError, MixResult},
    },
    io::source::Pull,
    mixer::state::MixerState,
    video::format::PixelFormat,
};

/// Outcome of the fill phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FillStatus {
    /// At least one stream holds a frame.
    Ready,
    /// Nothing buffered, but some supply may still produce frames.
    NeedData,
    /// Every stream is exhausted.
    EndOfStream,
}

impl MixerState {
    /// Pull one frame into every stream whose buffer is empty and credit its duration.
    ///
    /// A stream with unknown geometry adopts the geometry of its first frame.
    pub(crate) fn fill_queues(&mut self, format: PixelFormat) -> MixResult<FillStatus> {
        let mut adopted = false;

        for s in self.streams.iter_mut() {
            if s.buffered.is_some() || s.eos {
                continue;
            }
            match s.source.try_pop_frame() {
                Pull::Frame(frame) => {
                    if frame.format() != format {
                        return Err(MixError::validation(format!(
                            "{} delivered {} frame, compositor outputs {format}",
                            s.id,
                            frame.format()
                        )));
                    }
                    let duration = match (frame.duration, s.format.rate()) {
                        (Some(d), _) => OwedDuration::from_time(d),
                        (None, Some(rate)) => OwedDuration::from_time(rate.frame_duration()),
                        (None, None) => OwedDuration::Unbounded,
                    };
                    s.owed = s.owed.credit(duration);
                    if !s.format.has_geometry() {
                        s.format.width = frame.width();
                        s.format.height = frame.height();
                        adopted = true;
                    }
                    tracing::trace!(id = %s.id, pts = ?frame.pts, owed = ?s.owed, "buffered frame");
                    s.buffered = Some(frame);
                }
                Pull::Empty => {}
                Pull::EndOfStream => {
                    tracing::debug!(id = %s.id, "stream reached end of stream");
                    s.eos = true;
                }
            }
        }

        if adopted {
            self.recompute_master_geometry();
        }

        if self.streams.iter().any(|s| s.buffered.is_some()) {
            return Ok(FillStatus::Ready);
        }
        if self.streams.iter().all(|s| s.eos && !s.owed.is_positive()) {
            return Ok(FillStatus::EndOfStream);
        }
        Ok(FillStatus::NeedData)
    }

    /// Length of the output tick just composed.
    pub(crate) fn tick_interval(&self) -> OwedDuration {
        let master_owed = self
            .master
            .and_then(|id| self.streams.iter().find(|s| s.id == id))
            .filter(|s| s.buffered.is_some())
            .map(|s| s.owed);
        match (master_owed, self.fps) {
            (Some(OwedDuration::Finite(v)), _) if v > 0 => OwedDuration::Finite(v),
            (_, Some(fps)) => OwedDuration::from_time(fps.frame_duration()),
            _ => OwedDuration::Unbounded,
        }
    }

    /// Charge one tick to every buffered stream and release frames whose time is used up.
    pub(crate) fn drain_queues(&mut self) {
        let interval = self.tick_interval();
        for s in self.streams.iter_mut() {
            if s.buffered.is_none() || matches!(s.owed, OwedDuration::Unbounded) {
                continue;
            }
            s.owed = s.owed.consume(interval);
            if s.owed.is_exhausted() {
                tracing::trace!(id = %s.id, owed = ?s.owed, "released frame");
                s.buffered = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mixer/scheduler.rs"]
mod tests;
