use std::{fmt, str::FromStr};

use crate::foundation::error::{MixError, MixResult};

/// Pixel layout identifiers understood by the engine.
///
/// Every variant parses and prints under its conventional FourCC-style name. `NV12`/`NV21`
/// are recognized names without a registry entry, so configuring them fails with
/// [`MixError::UnsupportedFormat`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PixelFormat {
    #[serde(rename = "AYUV")]
    Ayuv,
    #[serde(rename = "VUYA")]
    Vuya,
    #[serde(rename = "ARGB")]
    Argb,
    #[serde(rename = "BGRA")]
    Bgra,
    #[serde(rename = "ABGR")]
    Abgr,
    #[serde(rename = "RGBA")]
    Rgba,
    #[serde(rename = "I420")]
    I420,
    #[serde(rename = "YV12")]
    Yv12,
    #[serde(rename = "Y444")]
    Y444,
    #[serde(rename = "Y42B")]
    Y42b,
    #[serde(rename = "Y41B")]
    Y41b,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "BGR")]
    Bgr,
    #[serde(rename = "xRGB")]
    Xrgb,
    #[serde(rename = "xBGR")]
    Xbgr,
    #[serde(rename = "RGBx")]
    Rgbx,
    #[serde(rename = "BGRx")]
    Bgrx,
    #[serde(rename = "YUY2")]
    Yuy2,
    #[serde(rename = "YVYU")]
    Yvyu,
    #[serde(rename = "UYVY")]
    Uyvy,
    #[serde(rename = "NV12")]
    Nv12,
    #[serde(rename = "NV21")]
    Nv21,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 22] = [
        Self::Ayuv,
        Self::Vuya,
        Self::Argb,
        Self::Bgra,
        Self::Abgr,
        Self::Rgba,
        Self::I420,
        Self::Yv12,
        Self::Y444,
        Self::Y42b,
        Self::Y41b,
        Self::Rgb,
        Self::Bgr,
        Self::Xrgb,
        Self::Xbgr,
        Self::Rgbx,
        Self::Bgrx,
        Self::Yuy2,
        Self::Yvyu,
        Self::Uyvy,
        Self::Nv12,
        Self::Nv21,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Ayuv => "AYUV",
            Self::Vuya => "VUYA",
            Self::Argb => "ARGB",
            Self::Bgra => "BGRA",
            Self::Abgr => "ABGR",
            Self::Rgba => "RGBA",
            Self::I420 => "I420",
            Self::Yv12 => "YV12",
            Self::Y444 => "Y444",
            Self::Y42b => "Y42B",
            Self::Y41b => "Y41B",
            Self::Rgb => "RGB",
            Self::Bgr => "BGR",
            Self::Xrgb => "xRGB",
            Self::Xbgr => "xBGR",
            Self::Rgbx => "RGBx",
            Self::Bgrx => "BGRx",
            Self::Yuy2 => "YUY2",
            Self::Yvyu => "YVYU",
            Self::Uyvy => "UYVY",
            Self::Nv12 => "NV12",
            Self::Nv21 => "NV21",
        }
    }

    /// Layout metadata, or `None` for names the engine cannot composite.
    pub fn info(self) -> Option<FormatInfo> {
        FormatInfo::of(self)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = MixError;

    fn from_str(s: &str) -> MixResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MixError::unsupported_format(s))
    }
}

/// Byte arrangement of one format family.
///
/// Offsets are byte positions inside one pixel (or one 2-pixel macropixel for 4:2:2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// 4 bytes per pixel with a per-pixel alpha byte. `color` holds Y/U/V or R/G/B offsets.
    PackedAlpha {
        alpha: usize,
        color: [usize; 3],
        rgb: bool,
    },
    /// Three planes. `swap_chroma` means plane 1 carries V and plane 2 carries U.
    Planar { swap_chroma: bool },
    /// 3 or 4 bytes per pixel, no alpha. `pad` is the unused byte of 4-byte layouts.
    PackedRgb {
        rgb: [usize; 3],
        pad: Option<usize>,
    },
    /// Y0 U Y1 V in some byte order, one macropixel per two pixels.
    Packed422 {
        y0: usize,
        u: usize,
        y1: usize,
        v: usize,
    },
}

/// Immutable description of a pixel layout: planes, subsampling, alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: PixelFormat,
    pub layout: Layout,
    pub n_planes: usize,
    /// Bytes per sample in each plane (bytes per pixel for packed layouts).
    pub pixel_stride: [usize; 3],
    /// log2 horizontal subsampling per plane.
    pub w_sub: [u32; 3],
    /// log2 vertical subsampling per plane.
    pub h_sub: [u32; 3],
    /// Positions are rounded down to a multiple of these.
    pub x_align: i32,
    pub y_align: i32,
}

impl FormatInfo {
    pub fn of(format: PixelFormat) -> Option<Self> {
        use PixelFormat as F;

        let packed_alpha = |alpha, color, rgb| Self {
            format,
            layout: Layout::PackedAlpha { alpha, color, rgb },
            n_planes: 1,
            pixel_stride: [4, 0, 0],
            w_sub: [0; 3],
            h_sub: [0; 3],
            x_align: 1,
            y_align: 1,
        };
        let planar = |swap_chroma, w, h| Self {
            format,
            layout: Layout::Planar { swap_chroma },
            n_planes: 3,
            pixel_stride: [1, 1, 1],
            w_sub: [0, w, w],
            h_sub: [0, h, h],
            x_align: 1 << w,
            y_align: 1 << h,
        };
        let packed_rgb = |bpp, rgb, pad| Self {
            format,
            layout: Layout::PackedRgb { rgb, pad },
            n_planes: 1,
            pixel_stride: [bpp, 0, 0],
            w_sub: [0; 3],
            h_sub: [0; 3],
            x_align: 1,
            y_align: 1,
        };
        let packed_422 = |y0, u, y1, v| Self {
            format,
            layout: Layout::Packed422 { y0, u, y1, v },
            n_planes: 1,
            pixel_stride: [2, 0, 0],
            w_sub: [0; 3],
            h_sub: [0; 3],
            x_align: 2,
            y_align: 1,
        };

        Some(match format {
            F::Ayuv => packed_alpha(0, [1, 2, 3], false),
            F::Vuya => packed_alpha(3, [2, 1, 0], false),
            F::Argb => packed_alpha(0, [1, 2, 3], true),
            F::Bgra => packed_alpha(3, [2, 1, 0], true),
            F::Abgr => packed_alpha(0, [3, 2, 1], true),
            F::Rgba => packed_alpha(3, [0, 1, 2], true),
            F::I420 => planar(false, 1, 1),
            F::Yv12 => planar(true, 1, 1),
            F::Y444 => planar(false, 0, 0),
            F::Y42b => planar(false, 1, 0),
            F::Y41b => planar(false, 2, 0),
            F::Rgb => packed_rgb(3, [0, 1, 2], None),
            F::Bgr => packed_rgb(3, [2, 1, 0], None),
            F::Xrgb => packed_rgb(4, [1, 2, 3], Some(0)),
            F::Xbgr => packed_rgb(4, [3, 2, 1], Some(0)),
            F::Rgbx => packed_rgb(4, [0, 1, 2], Some(3)),
            F::Bgrx => packed_rgb(4, [2, 1, 0], Some(3)),
            F::Yuy2 => packed_422(0, 1, 2, 3),
            F::Yvyu => packed_422(0, 3, 2, 1),
            F::Uyvy => packed_422(1, 0, 3, 2),
            F::Nv12 | F::Nv21 => return None,
        })
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self.layout, Layout::PackedAlpha { .. })
    }

    /// True when the colour components are R/G/B rather than Y/U/V.
    pub fn is_rgb(&self) -> bool {
        match self.layout {
            Layout::PackedAlpha { rgb, .. } => rgb,
            Layout::PackedRgb { .. } => true,
            Layout::Planar { .. } | Layout::Packed422 { .. } => false,
        }
    }

    /// Samples per row of `plane` for a frame `width` pixels wide (ceil subsampling).
    pub fn plane_width(&self, plane: usize, width: u32) -> usize {
        scale_ceil(width as usize, self.w_sub[plane])
    }

    /// Rows of `plane` for a frame `height` pixels tall (ceil subsampling).
    pub fn plane_height(&self, plane: usize, height: u32) -> usize {
        scale_ceil(height as usize, self.h_sub[plane])
    }

    /// Row stride in bytes, rounded up to 4.
    pub fn row_stride(&self, plane: usize, width: u32) -> Option<usize> {
        let bytes = match self.layout {
            Layout::Packed422 { .. } => (width as usize).checked_add(1)? / 2 * 4,
            _ => self
                .plane_width(plane, width)
                .checked_mul(self.pixel_stride[plane])?,
        };
        bytes.checked_add(3).map(|b| b & !3)
    }
}

/// `ceil(v / 2^shift)`.
pub(crate) fn scale_ceil(v: usize, shift: u32) -> usize {
    if shift == 0 {
        v
    } else {
        v.div_ceil(1usize << shift)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/format.rs"]
mod tests;
