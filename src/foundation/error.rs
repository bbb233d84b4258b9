/// Convenience result type used across framemix.
pub type MixResult<T> = Result<T, MixError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// End-of-stream is not an error; it is reported through
/// [`TickOutcome::EndOfStream`](crate::TickOutcome::EndOfStream).
#[derive(thiserror::Error, Debug)]
pub enum MixError {
    /// A pixel layout has no registry entry.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The frame allocator could not supply an output frame.
    #[error("allocation failure: {0}")]
    Allocation(String),

    /// Invalid caller-provided data (geometry, rates, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// A tick was requested before any output geometry is known.
    #[error("not negotiated: {0}")]
    NotNegotiated(String),

    /// The stream handle does not refer to an attached stream.
    #[error("unknown stream: {0}")]
    UnknownStream(u64),

    /// Downstream delivery failed.
    #[error("sink error: {0}")]
    Sink(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MixError {
    /// Build a [`MixError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`MixError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`MixError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MixError::NotNegotiated`] value.
    pub fn not_negotiated(msg: impl Into<String>) -> Self {
        Self::NotNegotiated(msg.into())
    }

    /// Build a [`MixError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
