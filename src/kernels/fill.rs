use crate::{
    kernels::RowKernels,
    video::{
        format::{FormatInfo, Layout},
        frame::Frame,
    },
};

/// Luma tones of the background checkerboard, indexed by tile parity.
const CHECKER_TONES: [u8; 4] = [80, 160, 80, 160];
const TILE: usize = 8;
const NEUTRAL: u8 = 128;

/// Convert a BT.601 video-range YUV triple to RGB.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = 1.164 * (f64::from(y) - 16.0);
    let u = f64::from(u) - 128.0;
    let v = f64::from(v) - 128.0;
    let clamp = |c: f64| c.clamp(0.0, 255.0) as u8;
    [
        clamp(y + 1.596 * v),
        clamp(y - 0.813 * v - 0.391 * u),
        clamp(y + 2.018 * u),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Color {
    yuv: [u8; 3],
    rgb: [u8; 3],
}

impl Color {
    fn from_yuv(y: u8, u: u8, v: u8) -> Self {
        Self {
            yuv: [y, u, v],
            rgb: yuv_to_rgb(y, u, v),
        }
    }

    fn grey(tone: u8) -> Self {
        Self {
            yuv: [tone, NEUTRAL, NEUTRAL],
            rgb: [tone; 3],
        }
    }
}

/// Smallest repeating byte group of a plane: one pixel, or one macropixel for 4:2:2.
#[derive(Clone, Copy, Debug)]
struct Unit {
    bytes: [u8; 4],
    len: usize,
    pixels: usize,
}

impl Unit {
    fn new(info: &FormatInfo, plane: usize, c: Color) -> Self {
        let mut bytes = [0u8; 4];
        match info.layout {
            Layout::PackedAlpha { alpha, color, rgb } => {
                let comps = if rgb { c.rgb } else { c.yuv };
                bytes[alpha] = 0xFF;
                for (off, val) in color.into_iter().zip(comps) {
                    bytes[off] = val;
                }
                Self { bytes, len: 4, pixels: 1 }
            }
            Layout::Planar { swap_chroma } => {
                let [y, u, v] = c.yuv;
                bytes[0] = match (plane, swap_chroma) {
                    (0, _) => y,
                    (1, false) | (2, true) => u,
                    _ => v,
                };
                Self { bytes, len: 1, pixels: 1 }
            }
            Layout::PackedRgb { rgb, .. } => {
                for (off, val) in rgb.into_iter().zip(c.rgb) {
                    bytes[off] = val;
                }
                Self {
                    bytes,
                    len: info.pixel_stride[0],
                    pixels: 1,
                }
            }
            Layout::Packed422 { y0, u, y1, v } => {
                bytes[y0] = c.yuv[0];
                bytes[y1] = c.yuv[0];
                bytes[u] = c.yuv[1];
                bytes[v] = c.yuv[2];
                Self { bytes, len: 4, pixels: 2 }
            }
        }
    }

    fn fill(&self, rows: &dyn RowKernels, dst: &mut [u8]) {
        match self.len {
            1 => rows.fill_repeat(dst, [self.bytes[0]; 4]),
            4 => rows.fill_repeat(dst, self.bytes),
            n => {
                for px in dst.chunks_exact_mut(n) {
                    px.copy_from_slice(&self.bytes[..n]);
                }
            }
        }
    }
}

/// Bytes of one row actually covered by pixels, excluding stride padding.
fn covered_bytes(unit: &Unit, plane_width: usize, width: u32) -> usize {
    if unit.pixels == 2 {
        (width as usize).div_ceil(2) * unit.len
    } else {
        plane_width * unit.len
    }
}

/// Fill every plane with one solid colour given as YUV.
pub fn fill_color(rows: &dyn RowKernels, info: &FormatInfo, frame: &mut Frame, yuv: [u8; 3]) {
    let color = Color::from_yuv(yuv[0], yuv[1], yuv[2]);
    let width = frame.width();
    for p in 0..info.n_planes {
        let unit = Unit::new(info, p, color);
        let Some(mut plane) = frame.plane_mut(p) else {
            continue;
        };
        let n = covered_bytes(&unit, plane.layout.width, width);
        for y in 0..plane.layout.height {
            if let Some(row) = plane.row_mut(y) {
                let end = n.min(row.len());
                unit.fill(rows, &mut row[..end]);
            }
        }
    }
}

/// Fill with an 8x8 checkerboard of two grey tones and neutral chroma.
pub fn fill_checker(rows: &dyn RowKernels, info: &FormatInfo, frame: &mut Frame) {
    let width = frame.width();
    let planar = matches!(info.layout, Layout::Planar { .. });
    for p in 0..info.n_planes {
        let Some(mut plane) = frame.plane_mut(p) else {
            continue;
        };
        if planar && p > 0 {
            let n = plane.layout.width;
            for y in 0..plane.layout.height {
                if let Some(row) = plane.row_mut(y) {
                    let end = n.min(row.len());
                    rows.fill_repeat(&mut row[..end], [NEUTRAL; 4]);
                }
            }
            continue;
        }

        let units: Vec<Unit> = CHECKER_TONES[..2]
            .iter()
            .map(|&t| Unit::new(info, p, Color::grey(t)))
            .collect();
        let n = covered_bytes(&units[0], plane.layout.width, width);
        let tile_bytes = TILE / units[0].pixels * units[0].len;

        for y in 0..plane.layout.height {
            let Some(row) = plane.row_mut(y) else { continue };
            let end = n.min(row.len());
            let row = &mut row[..end];
            for (i, seg) in row.chunks_mut(tile_bytes).enumerate() {
                let col = i * TILE;
                let tone = CHECKER_TONES[((y & 8) >> 3) + ((col & 8) >> 3)];
                let unit = if tone == CHECKER_TONES[0] {
                    &units[0]
                } else {
                    &units[1]
                };
                unit.fill(rows, seg);
            }
        }
    }
}

/// Zero the whole buffer: fully transparent for alpha formats.
pub fn fill_transparent(frame: &mut Frame) {
    frame.data_mut().fill(0);
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/fill.rs"]
mod tests;
