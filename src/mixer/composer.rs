use crate::{
    config::Background,
    foundation::{core::ClockTime, error::MixResult},
    kernels::{clip::clip_placement, opacity_to_alpha},
    mixer::state::MixerState,
    registry::table::Registry,
    video::{format::PixelFormat, frame::Frame},
};

impl MixerState {
    /// Produce one output frame from the currently buffered stream frames.
    pub(crate) fn compose(&mut self, registry: &Registry, format: PixelFormat) -> MixResult<Frame> {
        let desc = registry.lookup(format)?;

        if self.geometry_changed {
            self.allocator.purge();
            self.geometry_changed = false;
        }
        let mut out = self.allocator.acquire(format, self.width, self.height)?;

        match self.background {
            Background::Checker => desc.fill_checker(&mut out)?,
            Background::Black | Background::White => {
                if let Some(yuv) = self.background.solid_yuv() {
                    desc.fill_color(&mut out, yuv)?;
                }
            }
            Background::Transparent => desc.fill_transparent(&mut out)?,
        }
        let overlay = self.background == Background::Transparent && desc.info().has_alpha();
        let align = desc.alignment();
        let canvas = (self.width, self.height);

        for s in &self.streams {
            let Some(frame) = s.buffered.as_ref() else {
                continue;
            };
            if let Some(ctrl) = &s.controller {
                ctrl.sync(frame.pts.unwrap_or(ClockTime::ZERO), &s.props);
            }
            let a = opacity_to_alpha(s.props.opacity());
            if a == 0 {
                continue;
            }
            let (x, y) = s.props.position();
            let Some(rect) = clip_placement(x, y, (frame.width(), frame.height()), canvas, align)
            else {
                tracing::trace!(id = %s.id, x, y, "stream off canvas");
                continue;
            };
            if overlay {
                desc.overlay(frame, &mut out, rect, a)?;
            } else {
                desc.blend(frame, &mut out, rect, a)?;
            }
        }

        let master_frame = self
            .master
            .and_then(|id| self.streams.iter().find(|s| s.id == id))
            .and_then(|s| s.buffered.as_ref());
        let derived_duration = self.fps.map(|f| f.frame_duration());
        out.pts = master_frame
            .and_then(|f| f.pts)
            .or_else(|| self.fps.map(|f| f.frames_to_time(self.frames_out)));
        out.duration = master_frame
            .and_then(|f| f.duration)
            .or(derived_duration);
        Ok(out)
    }
}
