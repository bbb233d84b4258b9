use std::cmp::Ordering;

use crate::foundation::error::{MixError, MixResult};

/// Nanoseconds per second.
pub const SECOND: u64 = 1_000_000_000;

/// A point or span on a stream timeline, in nanoseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ClockTime(pub u64);

impl ClockTime {
    /// Time zero.
    pub const ZERO: Self = Self(0);

    /// Build a time from whole milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000_000))
    }

    /// Raw nanosecond count.
    pub fn nanos(self) -> u64 {
        self.0
    }

    /// Seconds as a float, for display and interpolation.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / SECOND as f64
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

/// Frame rate as an exact fraction.
///
/// Rates are compared by cross-multiplication, never through floats, so `30/1` and `60/2`
/// are equal and `30000/1001` is strictly coarser than `30/1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    /// Rate used when streams carry geometry but no rate at all.
    pub const FALLBACK: Self = Self { num: 25, den: 1 };

    pub fn new(num: u32, den: u32) -> MixResult<Self> {
        if den == 0 {
            return Err(MixError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MixError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Exact rate comparison: `Greater` means `self` is the finer (faster) rate.
    pub fn cmp_rate(self, other: Self) -> Ordering {
        let lhs = u64::from(self.num) * u64::from(other.den);
        let rhs = u64::from(other.num) * u64::from(self.den);
        lhs.cmp(&rhs)
    }

    /// True when `self` is strictly finer than `other`.
    pub fn is_finer_than(self, other: Self) -> bool {
        self.cmp_rate(other) == Ordering::Greater
    }

    /// Same rate, possibly spelled with a different fraction.
    pub fn same_rate(self, other: Self) -> bool {
        self.cmp_rate(other) == Ordering::Equal
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame, rounded up to the next nanosecond.
    ///
    /// Rounding up keeps integer rate ratios exact when durations are drained tick by tick:
    /// three 30 fps ticks always cover one 10 fps frame.
    pub fn frame_duration(self) -> ClockTime {
        let num = u128::from(self.num.max(1));
        let scaled = u128::from(SECOND) * u128::from(self.den);
        ClockTime(u64::try_from(scaled.div_ceil(num)).unwrap_or(u64::MAX))
    }

    /// Timestamp of frame `n`, rounded down.
    pub fn frames_to_time(self, n: u64) -> ClockTime {
        let num = u128::from(self.num.max(1));
        let scaled = u128::from(n) * u128::from(SECOND) * u128::from(self.den);
        ClockTime(u64::try_from(scaled / num).unwrap_or(u64::MAX))
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Remaining output time a buffered frame is entitled to stay visible.
///
/// Finite values are signed: draining may overshoot below zero and the remainder carries
/// into the next frame's credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwedDuration {
    Finite(i64),
    Unbounded,
}

impl Default for OwedDuration {
    fn default() -> Self {
        Self::Finite(0)
    }
}

impl OwedDuration {
    /// Credit for one frame lasting `d`.
    pub fn from_time(d: ClockTime) -> Self {
        Self::Finite(i64::try_from(d.0).unwrap_or(i64::MAX))
    }

    /// Add another frame's credit. Unbounded absorbs everything.
    pub fn credit(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_add(b)),
            _ => Self::Unbounded,
        }
    }

    /// Consume one output tick. An unbounded tick exhausts any finite credit.
    pub fn consume(self, interval: Self) -> Self {
        match (self, interval) {
            (Self::Unbounded, _) => Self::Unbounded,
            (Self::Finite(a), Self::Finite(i)) => Self::Finite(a.saturating_sub(i)),
            (Self::Finite(_), Self::Unbounded) => Self::Finite(0),
        }
    }

    pub fn is_positive(self) -> bool {
        match self {
            Self::Finite(v) => v > 0,
            Self::Unbounded => true,
        }
    }

    pub fn is_exhausted(self) -> bool {
        !self.is_positive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
