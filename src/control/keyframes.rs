use crate::{
    control::ease::Ease,
    foundation::{
        core::ClockTime,
        error::{MixError, MixResult},
    },
    mixer::stream::StreamProperties,
};

/// Resolves time-varying stream properties right before a stream is blended.
///
/// `at` is the timestamp of the stream's buffered frame (zero when the frame has none).
pub trait PropertyController: Send + Sync {
    fn sync(&self, at: ClockTime, props: &StreamProperties);
}

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for i32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let (a, b) = (f64::from(*a), f64::from(*b));
        (a + (b - a) * t).round() as i32
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Stream time in milliseconds.
    pub at_ms: u64,
    pub value: T,
    /// Curve used toward the next key.
    #[serde(default)]
    pub ease: Ease,
}

/// Keys sorted by time. Before the first key the first value holds, after the last the last.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Track<T> {
    pub keys: Vec<Keyframe<T>>,
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    pub fn validate(&self) -> MixResult<()> {
        if self.keys.is_empty() {
            return Err(MixError::validation("keyframe track must have at least one key"));
        }
        if !self.keys.windows(2).all(|w| w[0].at_ms <= w[1].at_ms) {
            return Err(MixError::validation("keyframe keys must be sorted by time"));
        }
        Ok(())
    }

    pub fn sample(&self, at: ClockTime) -> Option<T> {
        let (first, last) = (self.keys.first()?, self.keys.last()?);
        let t = at.nanos();
        let idx = self
            .keys
            .partition_point(|k| ClockTime::from_millis(k.at_ms).nanos() <= t);
        if idx == 0 {
            return Some(first.value.clone());
        }
        if idx >= self.keys.len() {
            return Some(last.value.clone());
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let start = ClockTime::from_millis(a.at_ms).nanos();
        let span = ClockTime::from_millis(b.at_ms).nanos().saturating_sub(start);
        if span == 0 {
            return Some(a.value.clone());
        }
        let progress = (t - start) as f64 / span as f64;
        Some(T::lerp(&a.value, &b.value, a.ease.apply(progress)))
    }
}

/// Keyframed opacity and position. Absent tracks leave the property alone.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keyframes {
    pub opacity: Option<Track<f64>>,
    pub xpos: Option<Track<i32>>,
    pub ypos: Option<Track<i32>>,
}

impl Keyframes {
    pub fn validate(&self) -> MixResult<()> {
        if let Some(t) = &self.opacity {
            t.validate()?;
        }
        if let Some(t) = &self.xpos {
            t.validate()?;
        }
        if let Some(t) = &self.ypos {
            t.validate()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_none() && self.xpos.is_none() && self.ypos.is_none()
    }
}

impl PropertyController for Keyframes {
    fn sync(&self, at: ClockTime, props: &StreamProperties) {
        if let Some(v) = self.opacity.as_ref().and_then(|t| t.sample(at)) {
            props.set_opacity(v);
        }
        let x = self.xpos.as_ref().and_then(|t| t.sample(at));
        let y = self.ypos.as_ref().and_then(|t| t.sample(at));
        if x.is_some() || y.is_some() {
            let (cx, cy) = props.position();
            props.set_position(x.unwrap_or(cx), y.unwrap_or(cy));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/keyframes.rs"]
mod tests;
