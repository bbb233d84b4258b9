//! Per-format pixel arithmetic.
//!
//! Row-level primitives live behind [`RowKernels`], one implementation per capability tier.
//! Every tier must produce byte-identical output for the same inputs; the format-level
//! drivers in [`blend`] and [`fill`] only ever talk to the trait.

pub mod blend;
pub mod clip;
pub mod fill;
pub mod scalar;
pub mod swar;

use std::fmt;

/// Integer opacity meaning "fully opaque".
pub const OPAQUE: u32 = 256;

/// Map a `0.0..=1.0` opacity to the integer kernel scale `0..=256`.
///
/// Out-of-range values are clamped; NaN maps to 0.
pub fn opacity_to_alpha(opacity: f64) -> u32 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * f64::from(OPAQUE)).round() as u32
}

/// Implementation family of a kernel set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelTier {
    Scalar,
    /// SIMD-within-a-register on 64-bit words.
    Swar64,
}

impl KernelTier {
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Swar64 => "swar64",
        }
    }
}

impl fmt::Display for KernelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the running CPU can do, probed once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuCaps {
    pub swar64: bool,
}

impl CpuCaps {
    pub fn detect() -> Self {
        Self {
            swar64: cfg!(target_pointer_width = "64"),
        }
    }

    pub fn scalar_only() -> Self {
        Self { swar64: false }
    }

    /// Fastest tier available.
    pub fn best_tier(self) -> KernelTier {
        if self.swar64 {
            KernelTier::Swar64
        } else {
            KernelTier::Scalar
        }
    }
}

/// Row primitives shared by every format family.
///
/// `a` is always strictly between 0 and [`OPAQUE`]; the callers handle the two boundary
/// values themselves. Slices of unequal length are processed up to the shorter one.
pub trait RowKernels: Send + Sync + fmt::Debug {
    fn tier(&self) -> KernelTier;

    /// `dst = (dst * (256 - a) + src * a) >> 8` on every byte.
    fn blend_bytes(&self, dst: &mut [u8], src: &[u8], a: u32);

    /// Same formula on 4-byte pixels, with the per-pixel factor
    /// `(src[alpha_at] * a) >> 8`. The destination alpha byte ends up `0xFF`.
    fn blend_alpha_pixels(&self, dst: &mut [u8], src: &[u8], alpha_at: usize, a: u32);

    /// Repeat a 4-byte pattern over `dst`. A trailing partial pattern is written too.
    fn fill_repeat(&self, dst: &mut [u8], pattern: [u8; 4]);
}

/// Kernel set for `tier`.
pub fn rows_for(tier: KernelTier) -> &'static dyn RowKernels {
    match tier {
        KernelTier::Scalar => &scalar::ScalarRows,
        KernelTier::Swar64 => &swar::SwarRows,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernels/mod.rs"]
mod tests;
