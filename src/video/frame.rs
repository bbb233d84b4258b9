use crate::{
    foundation::{
        core::ClockTime,
        error::{MixError, MixResult},
    },
    video::format::{FormatInfo, PixelFormat},
};

/// Placement of one plane inside a frame buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaneLayout {
    pub offset: usize,
    pub stride: usize,
    /// Samples per row (pixels for packed formats, macropixels are not counted separately).
    pub width: usize,
    pub height: usize,
}

impl PlaneLayout {
    fn bytes(&self) -> Option<usize> {
        self.stride.checked_mul(self.height)
    }
}

/// All planes of a frame plus the total buffer length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    pub n_planes: usize,
    pub planes: [PlaneLayout; 3],
    pub size: usize,
}

impl FrameLayout {
    /// Compute plane offsets and strides for `width`x`height` in `info`'s layout.
    pub fn new(info: &FormatInfo, width: u32, height: u32) -> MixResult<Self> {
        let mut planes = [PlaneLayout::default(); 3];
        let mut size = 0usize;
        for (i, plane) in planes.iter_mut().enumerate().take(info.n_planes) {
            let stride = info
                .row_stride(i, width)
                .ok_or_else(|| overflow(info.format, width, height))?;
            *plane = PlaneLayout {
                offset: size,
                stride,
                width: info.plane_width(i, width),
                height: info.plane_height(i, height),
            };
            size = plane
                .bytes()
                .and_then(|b| size.checked_add(b))
                .ok_or_else(|| overflow(info.format, width, height))?;
        }
        Ok(Self {
            n_planes: info.n_planes,
            planes,
            size,
        })
    }
}

fn overflow(format: PixelFormat, width: u32, height: u32) -> MixError {
    MixError::allocation(format!("{format} frame {width}x{height} overflows usize"))
}

/// One video frame: pixel bytes plus the timing the producer attached.
#[derive(Clone, Debug)]
pub struct Frame {
    format: PixelFormat,
    width: u32,
    height: u32,
    layout: FrameLayout,
    data: Vec<u8>,
    pub pts: Option<ClockTime>,
    pub duration: Option<ClockTime>,
}

impl Frame {
    /// Zeroed frame.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> MixResult<Self> {
        let info = format
            .info()
            .ok_or_else(|| MixError::unsupported_format(format.name()))?;
        let layout = FrameLayout::new(&info, width, height)?;
        Ok(Self {
            format,
            width,
            height,
            layout,
            data: vec![0; layout.size],
            pts: None,
            duration: None,
        })
    }

    /// Wrap caller bytes. The length must match the computed layout exactly.
    pub fn from_bytes(
        format: PixelFormat,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> MixResult<Self> {
        let info = format
            .info()
            .ok_or_else(|| MixError::unsupported_format(format.name()))?;
        let layout = FrameLayout::new(&info, width, height)?;
        if data.len() != layout.size {
            return Err(MixError::validation(format!(
                "{format} {width}x{height} needs {} bytes, got {}",
                layout.size,
                data.len()
            )));
        }
        Ok(Self {
            format,
            width,
            height,
            layout,
            data,
            pts: None,
            duration: None,
        })
    }

    pub fn with_timing(mut self, pts: Option<ClockTime>, duration: Option<ClockTime>) -> Self {
        self.pts = pts;
        self.duration = duration;
        self
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read-only view of plane `i`.
    pub fn plane(&self, i: usize) -> Option<Plane<'_>> {
        if i >= self.layout.n_planes {
            return None;
        }
        let p = self.layout.planes[i];
        let end = p.offset + p.stride * p.height;
        Some(Plane {
            layout: p,
            bytes: self.data.get(p.offset..end)?,
        })
    }

    /// Mutable view of plane `i`.
    pub fn plane_mut(&mut self, i: usize) -> Option<PlaneMut<'_>> {
        if i >= self.layout.n_planes {
            return None;
        }
        let p = self.layout.planes[i];
        let end = p.offset + p.stride * p.height;
        Some(PlaneMut {
            layout: p,
            bytes: self.data.get_mut(p.offset..end)?,
        })
    }
}

/// Borrowed plane of a [`Frame`].
#[derive(Clone, Copy, Debug)]
pub struct Plane<'a> {
    pub layout: PlaneLayout,
    pub bytes: &'a [u8],
}

impl<'a> Plane<'a> {
    /// Full row `y` including stride padding.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        let start = y.checked_mul(self.layout.stride)?;
        self.bytes.get(start..start + self.layout.stride)
    }
}

/// Mutably borrowed plane of a [`Frame`].
#[derive(Debug)]
pub struct PlaneMut<'a> {
    pub layout: PlaneLayout,
    pub bytes: &'a mut [u8],
}

impl PlaneMut<'_> {
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        let start = y.checked_mul(self.layout.stride)?;
        self.bytes.get_mut(start..start + self.layout.stride)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/frame.rs"]
mod tests;
