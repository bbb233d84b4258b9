use super::{KernelTier, RowKernels};

/// Portable byte-at-a-time kernels. Reference semantics for every other tier.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarRows;

#[inline]
pub(crate) fn blend_byte(d: u8, s: u8, a: u32) -> u8 {
    ((u32::from(d) * (256 - a) + u32::from(s) * a) >> 8) as u8
}

#[inline]
pub(crate) fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}

impl RowKernels for ScalarRows {
    fn tier(&self) -> KernelTier {
        KernelTier::Scalar
    }

    fn blend_bytes(&self, dst: &mut [u8], src: &[u8], a: u32) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = blend_byte(*d, *s, a);
        }
    }

    fn blend_alpha_pixels(&self, dst: &mut [u8], src: &[u8], alpha_at: usize, a: u32) {
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let pa = (u32::from(s[alpha_at]) * a) >> 8;
            for i in 0..4 {
                d[i] = blend_byte(d[i], s[i], pa);
            }
            d[alpha_at] = 0xFF;
        }
    }

    fn fill_repeat(&self, dst: &mut [u8], pattern: [u8; 4]) {
        for (i, d) in dst.iter_mut().enumerate() {
            *d = pattern[i & 3];
        }
    }
}

/// Alpha-accumulating "over" for 4-byte pixels with alpha at `alpha_at`.
///
/// Used for transparent backgrounds, where destination alpha must survive. There is a single
/// implementation, so every tier shares it.
pub fn overlay_alpha_pixels(dst: &mut [u8], src: &[u8], alpha_at: usize, a: u32) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = (u32::from(s[alpha_at]) * a) >> 8;
        if sa == 0 {
            continue;
        }
        let da = mul_div255(u32::from(d[alpha_at]), 255 - sa);
        let out_a = sa + da;
        for i in 0..4 {
            if i == alpha_at {
                continue;
            }
            d[i] = if out_a == 0 {
                0
            } else {
                ((u32::from(s[i]) * sa + u32::from(d[i]) * da) / out_a) as u8
            };
        }
        d[alpha_at] = out_a.min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/scalar.rs"]
mod tests;
