use crate::{
    foundation::error::{MixError, MixResult},
    kernels::fill::yuv_to_rgb,
    video::{
        format::{FormatInfo, Layout},
        frame::Frame,
    },
};

/// Convert any supported frame to tightly packed RGBA8 for inspection.
///
/// YUV formats go through the same BT.601 conversion the fills use. Formats without alpha come
/// out opaque.
pub fn to_rgba8(frame: &Frame) -> MixResult<Vec<u8>> {
    let info = FormatInfo::of(frame.format())
        .ok_or_else(|| MixError::unsupported_format(frame.format().name()))?;
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let mut out = Vec::with_capacity(w * h * 4);

    let missing = || MixError::validation("frame buffer shorter than its layout");

    match info.layout {
        Layout::PackedAlpha { alpha, color, rgb } => {
            let plane = frame.plane(0).ok_or_else(missing)?;
            for y in 0..h {
                let row = plane.row(y).ok_or_else(missing)?;
                for px in row.chunks_exact(4).take(w) {
                    let c = [px[color[0]], px[color[1]], px[color[2]]];
                    let c = if rgb { c } else { yuv_to_rgb(c[0], c[1], c[2]) };
                    out.extend_from_slice(&[c[0], c[1], c[2], px[alpha]]);
                }
            }
        }
        Layout::PackedRgb { rgb, .. } => {
            let plane = frame.plane(0).ok_or_else(missing)?;
            let bpp = info.pixel_stride[0];
            for y in 0..h {
                let row = plane.row(y).ok_or_else(missing)?;
                for px in row.chunks_exact(bpp).take(w) {
                    out.extend_from_slice(&[px[rgb[0]], px[rgb[1]], px[rgb[2]], 0xFF]);
                }
            }
        }
        Layout::Planar { swap_chroma } => {
            let (ui, vi) = if swap_chroma { (2, 1) } else { (1, 2) };
            let luma = frame.plane(0).ok_or_else(missing)?;
            let cb = frame.plane(ui).ok_or_else(missing)?;
            let cr = frame.plane(vi).ok_or_else(missing)?;
            let (ws, hs) = (info.w_sub[1], info.h_sub[1]);
            for y in 0..h {
                let yr = luma.row(y).ok_or_else(missing)?;
                let ur = cb.row(y >> hs).ok_or_else(missing)?;
                let vr = cr.row(y >> hs).ok_or_else(missing)?;
                for x in 0..w {
                    let [r, g, b] = yuv_to_rgb(yr[x], ur[x >> ws], vr[x >> ws]);
                    out.extend_from_slice(&[r, g, b, 0xFF]);
                }
            }
        }
        Layout::Packed422 { y0, u, y1, v } => {
            let plane = frame.plane(0).ok_or_else(missing)?;
            for y in 0..h {
                let row = plane.row(y).ok_or_else(missing)?;
                for x in 0..w {
                    let m = &row[(x / 2) * 4..(x / 2) * 4 + 4];
                    let luma = if x % 2 == 0 { m[y0] } else { m[y1] };
                    let [r, g, b] = yuv_to_rgb(luma, m[u], m[v]);
                    out.extend_from_slice(&[r, g, b, 0xFF]);
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/video/preview.rs"]
mod tests;
