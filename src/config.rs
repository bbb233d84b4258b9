use crate::{io::pool::FramePoolOpts, video::format::PixelFormat};

/// Environment variable that overrides kernel selection for the shared registry.
pub const KERNELS_ENV: &str = "FRAMEMIX_KERNELS";

/// What is drawn under the streams before compositing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Checker,
    Black,
    White,
    /// Zeroed canvas; alpha formats accumulate alpha instead of forcing it opaque.
    Transparent,
}

impl Background {
    /// Video-range YUV of the solid modes.
    pub fn solid_yuv(self) -> Option<[u8; 3]> {
        match self {
            Self::Black => Some([16, 128, 128]),
            Self::White => Some([240, 128, 128]),
            Self::Checker | Self::Transparent => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelPreference {
    /// Fastest tier the CPU supports.
    #[default]
    Auto,
    Scalar,
}

impl KernelPreference {
    /// Read [`KERNELS_ENV`]. Anything other than `scalar` means [`KernelPreference::Auto`].
    pub fn from_env() -> Self {
        Self::parse_env_value(std::env::var(KERNELS_ENV).ok().as_deref())
    }

    fn parse_env_value(v: Option<&str>) -> Self {
        match v.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("scalar") => Self::Scalar,
            _ => Self::Auto,
        }
    }
}

/// Construction-time settings of a [`Compositor`](crate::Compositor).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Output layout. Every input frame must already be in this layout.
    pub format: PixelFormat,
    pub background: Background,
    pub kernels: KernelPreference,
    pub pool: FramePoolOpts,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            format: PixelFormat::Ayuv,
            background: Background::default(),
            kernels: KernelPreference::default(),
            pool: FramePoolOpts::default(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
