use crate::{
    foundation::error::{MixError, MixResult},
    kernels::{
        KernelTier, RowKernels,
        blend::{self, BlendOp},
        clip::BlendRect,
        fill,
    },
    video::{
        format::{FormatInfo, PixelFormat},
        frame::Frame,
    },
};

/// Everything the composer needs to work in one pixel layout.
///
/// Built once by the [`Registry`](crate::Registry) and never mutated. The kernel tier is fixed
/// at construction; all tiers produce identical bytes.
#[derive(Clone, Copy, Debug)]
pub struct FormatDescriptor {
    info: FormatInfo,
    rows: &'static dyn RowKernels,
}

impl FormatDescriptor {
    pub(crate) fn new(info: FormatInfo, rows: &'static dyn RowKernels) -> Self {
        Self { info, rows }
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn info(&self) -> &FormatInfo {
        &self.info
    }

    pub fn tier(&self) -> KernelTier {
        self.rows.tier()
    }

    /// Coordinate rounding granularity on X and Y.
    pub fn alignment(&self) -> (i32, i32) {
        (self.info.x_align, self.info.y_align)
    }

    fn check(&self, frame: &Frame) -> MixResult<()> {
        if frame.format() != self.info.format {
            return Err(MixError::validation(format!(
                "frame is {}, descriptor is {}",
                frame.format(),
                self.info.format
            )));
        }
        Ok(())
    }

    /// Blend `rect` of `src` onto an opaque `dst`.
    pub fn blend(&self, src: &Frame, dst: &mut Frame, rect: BlendRect, a: u32) -> MixResult<()> {
        self.check(src)?;
        self.check(dst)?;
        blend::blend_frame(self.rows, &self.info, src, dst, rect, a, BlendOp::Blend);
        Ok(())
    }

    /// Blend `rect` of `src` onto a possibly transparent `dst`, accumulating alpha.
    pub fn overlay(&self, src: &Frame, dst: &mut Frame, rect: BlendRect, a: u32) -> MixResult<()> {
        self.check(src)?;
        self.check(dst)?;
        blend::blend_frame(self.rows, &self.info, src, dst, rect, a, BlendOp::Overlay);
        Ok(())
    }

    pub fn fill_checker(&self, dst: &mut Frame) -> MixResult<()> {
        self.check(dst)?;
        fill::fill_checker(self.rows, &self.info, dst);
        Ok(())
    }

    /// Solid fill from a video-range YUV triple (converted for RGB layouts).
    pub fn fill_color(&self, dst: &mut Frame, yuv: [u8; 3]) -> MixResult<()> {
        self.check(dst)?;
        fill::fill_color(self.rows, &self.info, dst, yuv);
        Ok(())
    }

    pub fn fill_transparent(&self, dst: &mut Frame) -> MixResult<()> {
        self.check(dst)?;
        fill::fill_transparent(dst);
        Ok(())
    }
}
