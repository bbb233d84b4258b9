use crate::{
    kernels::{OPAQUE, RowKernels, clip::BlendRect, scalar},
    video::{
        format::{FormatInfo, Layout, scale_ceil},
        frame::Frame,
    },
};

/// How source pixels are combined with the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    /// Onto an opaque canvas. Alpha formats force destination alpha to opaque.
    Blend,
    /// Alpha-accumulating over, for transparent canvases. Formats without alpha blend normally.
    Overlay,
}

/// Byte-level extent of a [`BlendRect`] inside one plane.
#[derive(Clone, Copy, Debug)]
struct PlaneSpan {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    bytes: usize,
    rows: usize,
    /// Packed 4:2:2 only: the last macropixel covers a single pixel.
    half_tail: bool,
}

impl PlaneSpan {
    fn new(info: &FormatInfo, plane: usize, r: BlendRect) -> Self {
        let (src_x, src_y, dst_x, dst_y) = (
            r.src_x as usize,
            r.src_y as usize,
            r.dst_x as usize,
            r.dst_y as usize,
        );
        let (width, height) = (r.width as usize, r.height as usize);
        match info.layout {
            Layout::Packed422 { .. } => Self {
                src_x: src_x / 2 * 4,
                src_y,
                dst_x: dst_x / 2 * 4,
                dst_y,
                bytes: width.div_ceil(2) * 4,
                rows: height,
                half_tail: width % 2 == 1,
            },
            _ => {
                let (ws, hs) = (info.w_sub[plane], info.h_sub[plane]);
                let bpp = info.pixel_stride[plane];
                Self {
                    src_x: (src_x >> ws) * bpp,
                    src_y: src_y >> hs,
                    dst_x: (dst_x >> ws) * bpp,
                    dst_y: dst_y >> hs,
                    bytes: scale_ceil(width, ws) * bpp,
                    rows: scale_ceil(height, hs),
                    half_tail: false,
                }
            }
        }
    }
}

/// Blend `rect` of `src` into `dst`, both in `info`'s layout.
///
/// `a` is the integer opacity in `0..=256`. Rows that would fall outside either buffer are
/// skipped, so a bad rectangle can never write out of bounds.
pub fn blend_frame(
    rows: &dyn RowKernels,
    info: &FormatInfo,
    src: &Frame,
    dst: &mut Frame,
    rect: BlendRect,
    a: u32,
    op: BlendOp,
) {
    let a = a.min(OPAQUE);
    if a == 0 || rect.width == 0 || rect.height == 0 {
        return;
    }

    for p in 0..info.n_planes {
        let Some(sp) = src.plane(p) else { continue };
        let Some(dp) = dst.plane_mut(p) else { continue };
        let span = PlaneSpan::new(info, p, rect);
        let (s_stride, d_stride) = (sp.layout.stride, dp.layout.stride);

        for r in 0..span.rows {
            let s_start = (span.src_y + r) * s_stride + span.src_x;
            let d_start = (span.dst_y + r) * d_stride + span.dst_x;
            let Some(s) = sp.bytes.get(s_start..s_start + span.bytes) else {
                break;
            };
            let Some(d) = dp.bytes.get_mut(d_start..d_start + span.bytes) else {
                break;
            };
            blend_row(rows, info.layout, d, s, a, op, span.half_tail);
        }
    }
}

fn blend_row(
    rows: &dyn RowKernels,
    layout: Layout,
    d: &mut [u8],
    s: &[u8],
    a: u32,
    op: BlendOp,
    half_tail: bool,
) {
    if half_tail && let Layout::Packed422 { y0, u, v, .. } = layout {
        let split = d.len().saturating_sub(4);
        let (d_head, d_tail) = d.split_at_mut(split);
        blend_row(rows, layout, d_head, &s[..split], a, op, false);
        for i in [y0, u, v] {
            if a == OPAQUE {
                d_tail[i] = s[split + i];
            } else {
                rows.blend_bytes(&mut d_tail[i..=i], &s[split + i..=split + i], a);
            }
        }
        return;
    }

    if a == OPAQUE {
        d.copy_from_slice(s);
        return;
    }
    match (layout, op) {
        (Layout::PackedAlpha { alpha, .. }, BlendOp::Blend) => {
            rows.blend_alpha_pixels(d, s, alpha, a)
        }
        (Layout::PackedAlpha { alpha, .. }, BlendOp::Overlay) => {
            scalar::overlay_alpha_pixels(d, s, alpha, a)
        }
        _ => rows.blend_bytes(d, s, a),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/blend.rs"]
mod tests;
