use super::{KernelTier, RowKernels, scalar::ScalarRows};

/// Kernels operating on eight bytes per step, packed as 16-bit lanes inside a `u64`.
///
/// Each lane holds one byte widened to 16 bits. `d * (256 - a) + s * a` never exceeds
/// `255 * 256`, so lanes cannot carry into each other and the result matches
/// [`ScalarRows`] exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwarRows;

const LANES: u64 = 0x00FF_00FF_00FF_00FF;

#[inline]
fn load(bytes: &[u8]) -> u64 {
    let mut w = [0u8; 8];
    w.copy_from_slice(bytes);
    u64::from_le_bytes(w)
}

#[inline]
fn blend_word(d: u64, s: u64, a: u64) -> u64 {
    let inv = 256 - a;
    let even = (((d & LANES) * inv + (s & LANES) * a) >> 8) & LANES;
    let odd = ((((d >> 8) & LANES) * inv + ((s >> 8) & LANES) * a) >> 8) & LANES;
    even | (odd << 8)
}

/// One 4-byte pixel spread over four 16-bit lanes.
#[inline]
fn spread(px: &[u8]) -> u64 {
    u64::from(px[0])
        | u64::from(px[1]) << 16
        | u64::from(px[2]) << 32
        | u64::from(px[3]) << 48
}

impl RowKernels for SwarRows {
    fn tier(&self) -> KernelTier {
        KernelTier::Swar64
    }

    fn blend_bytes(&self, dst: &mut [u8], src: &[u8], a: u32) {
        let n = dst.len().min(src.len());
        let (dst, src) = (&mut dst[..n], &src[..n]);
        let a = u64::from(a);

        let mut d_words = dst.chunks_exact_mut(8);
        let mut s_words = src.chunks_exact(8);
        for (d, s) in (&mut d_words).zip(&mut s_words) {
            let out = blend_word(load(d), load(s), a);
            d.copy_from_slice(&out.to_le_bytes());
        }
        ScalarRows.blend_bytes(d_words.into_remainder(), s_words.remainder(), a as u32);
    }

    fn blend_alpha_pixels(&self, dst: &mut [u8], src: &[u8], alpha_at: usize, a: u32) {
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let pa = (u64::from(s[alpha_at]) * u64::from(a)) >> 8;
            let out = ((spread(d) * (256 - pa) + spread(s) * pa) >> 8) & LANES;
            for (i, byte) in d.iter_mut().enumerate() {
                *byte = (out >> (16 * i)) as u8;
            }
            d[alpha_at] = 0xFF;
        }
    }

    fn fill_repeat(&self, dst: &mut [u8], pattern: [u8; 4]) {
        let p = u64::from(u32::from_le_bytes(pattern));
        let word = (p | p << 32).to_le_bytes();
        let mut chunks = dst.chunks_exact_mut(8);
        for c in &mut chunks {
            c.copy_from_slice(&word);
        }
        // Full words consumed a multiple of 4 bytes, so the remainder starts on a pattern boundary.
        ScalarRows.fill_repeat(chunks.into_remainder(), pattern);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/swar.rs"]
mod tests;
