use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::{core::Fps, error::MixResult},
    video::{format::PixelFormat, frame::Frame},
};

/// Output description handed to a [`FrameSink`] whenever geometry becomes known or changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputInfo {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Downstream consumer of composed frames.
///
/// Ordering contract: `configure` precedes the first `push_frame`, and is called again before
/// any frame whose geometry differs from the last description. `end` is called once, after the
/// final frame.
pub trait FrameSink: Send {
    fn configure(&mut self, info: &OutputInfo) -> MixResult<()>;
    fn push_frame(&mut self, frame: &Frame) -> MixResult<()>;
    fn end(&mut self) -> MixResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    configs: Vec<OutputInfo>,
    frames: Vec<Frame>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every output description received, oldest first.
    pub fn configs(&self) -> &[OutputInfo] {
        &self.configs
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn configure(&mut self, info: &OutputInfo) -> MixResult<()> {
        self.configs.push(*info);
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> MixResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> MixResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Appends raw frame buffers, back to back, to one file.
pub struct RawFileSink {
    path: PathBuf,
    out: Option<BufWriter<File>>,
    frames: u64,
    bytes: u64,
    last: Option<Frame>,
}

impl RawFileSink {
    pub fn create(path: impl AsRef<Path>) -> MixResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("create raw output '{}'", path.display()))?;
        Ok(Self {
            path,
            out: Some(BufWriter::new(file)),
            frames: 0,
            bytes: 0,
            last: None,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Copy of the most recent frame, kept for previews.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

impl FrameSink for RawFileSink {
    fn configure(&mut self, info: &OutputInfo) -> MixResult<()> {
        tracing::debug!(
            path = %self.path.display(),
            format = %info.format,
            width = info.width,
            height = info.height,
            fps = %info.fps,
            "raw sink configured"
        );
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> MixResult<()> {
        let Some(out) = self.out.as_mut() else {
            return Err(crate::MixError::sink("raw sink already ended"));
        };
        out.write_all(frame.data())
            .with_context(|| format!("write frame to '{}'", self.path.display()))?;
        self.frames += 1;
        self.bytes += frame.data().len() as u64;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> MixResult<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()
                .with_context(|| format!("flush '{}'", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/sink.rs"]
mod tests;
