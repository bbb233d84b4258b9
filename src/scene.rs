use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    config::CompositorConfig,
    control::keyframes::Keyframes,
    foundation::{
        core::Fps,
        error::{MixError, MixResult},
    },
    io::source::{Pattern, PatternSource},
    mixer::{
        state::Compositor,
        stream::{StreamFormat, StreamHandle},
    },
};

/// JSON scene: a compositor configuration plus synthetic streams to feed it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub compositor: CompositorConfig,
    pub streams: Vec<StreamSpec>,
}

fn default_opacity() -> f64 {
    1.0
}

/// One generated input stream.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamSpec {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    #[serde(default)]
    pub xpos: i32,
    #[serde(default)]
    pub ypos: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Defaults to the attach position.
    #[serde(default)]
    pub zorder: Option<u32>,
    #[serde(default)]
    pub pattern: Pattern,
    /// Number of frames before end-of-stream.
    pub frames: u64,
    #[serde(default)]
    pub keyframes: Option<Keyframes>,
}

impl SceneFile {
    pub fn from_json(json: &str) -> MixResult<Self> {
        let scene: Self = serde_json::from_str(json).context("parse scene json")?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> MixResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> MixResult<()> {
        if self.streams.is_empty() {
            return Err(MixError::validation("scene has no streams"));
        }
        for (i, s) in self.streams.iter().enumerate() {
            if s.width == 0 || s.height == 0 {
                return Err(MixError::validation(format!(
                    "stream {i}: width and height must be > 0"
                )));
            }
            Fps::new(s.fps.num, s.fps.den)
                .map_err(|e| MixError::validation(format!("stream {i}: {e}")))?;
            if let Some(kf) = &s.keyframes {
                kf.validate()
                    .map_err(|e| MixError::validation(format!("stream {i}: {e}")))?;
            }
        }
        Ok(())
    }

    /// Build a compositor with every stream attached, positioned and animated.
    pub fn build(&self) -> MixResult<(Compositor, Vec<StreamHandle>)> {
        self.validate()?;
        let comp = Compositor::new(self.compositor.clone())?;
        let mut handles = Vec::with_capacity(self.streams.len());

        for spec in &self.streams {
            let source = PatternSource::new(
                comp.registry(),
                self.compositor.format,
                (spec.width, spec.height),
                Some(spec.fps),
                spec.pattern,
                spec.frames,
            )?;
            let handle = comp.attach_stream_with_format(
                Box::new(source),
                StreamFormat::new(spec.width, spec.height, Some(spec.fps)),
            );
            handle.properties().set_position(spec.xpos, spec.ypos);
            handle.properties().set_opacity(spec.opacity);
            if let Some(z) = spec.zorder {
                comp.set_zorder(handle.id(), z)?;
            }
            if let Some(kf) = spec.keyframes.as_ref().filter(|k| !k.is_empty()) {
                comp.set_controller(handle.id(), Some(Arc::new(kf.clone())))?;
            }
            handles.push(handle);
        }
        Ok((comp, handles))
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
