//! framemix composites several raw video streams into one output stream on the CPU.
//!
//! A [`Compositor`] owns the attached streams. Each [`Compositor::tick`] pulls at most one
//! frame per stream, keeps every frame visible for as long as its duration covers, and blends
//! the current frames bottom-to-top over a background. Pixel work goes through the
//! [`Registry`], which maps each [`PixelFormat`] to blend and fill kernels picked once by a CPU
//! capability probe.
#![forbid(unsafe_code)]

pub mod config;
pub mod control;
pub mod foundation;
pub mod io;
pub mod kernels;
pub mod mixer;
pub mod registry;
pub mod scene;
pub mod video;

pub use crate::config::{Background, CompositorConfig, KernelPreference};
pub use crate::control::{
    ease::Ease,
    keyframes::{Keyframe, Keyframes, PropertyController, Track},
};
pub use crate::foundation::core::{ClockTime, Fps, OwedDuration};
pub use crate::foundation::error::{MixError, MixResult};
pub use crate::io::pool::{FrameAllocator, FramePool, FramePoolOpts, FramePoolStats};
pub use crate::io::sink::{FrameSink, InMemorySink, OutputInfo, RawFileSink};
pub use crate::io::source::{FrameSource, Pattern, PatternSource, Pull, QueueSource};
pub use crate::kernels::{KernelTier, OPAQUE, opacity_to_alpha};
pub use crate::mixer::driver::{RunStats, TickOutcome};
pub use crate::mixer::state::Compositor;
pub use crate::mixer::stream::{StreamFormat, StreamHandle, StreamId, StreamProperties};
pub use crate::registry::{descriptor::FormatDescriptor, table::Registry};
pub use crate::scene::{SceneFile, StreamSpec};
pub use crate::video::format::{FormatInfo, PixelFormat};
pub use crate::video::frame::Frame;
