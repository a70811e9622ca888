/// Convenience result type used across infogrid.
pub type GridResult<T> = Result<T, GridError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Everything except [`GridError::Transient`] is fatal: it aborts page activation and, in the
/// binary, terminates the process. A transient failure only skips the tick it happened in.
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// Invalid or incomplete configuration data.
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or corrupt font file.
    #[error("font error: {0}")]
    Font(String),

    /// Missing or undecodable local asset (image file).
    #[error("asset error: {0}")]
    Asset(String),

    /// Output device could not be opened or written.
    #[error("device error: {0}")]
    Device(String),

    /// Recoverable network failure (remote image fetch, liveness probe).
    #[error("transient error: {0}")]
    Transient(String),

    /// Internal rendering or scheduling failure (poisoned lock, panicked task).
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridError {
    /// Build a [`GridError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GridError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`GridError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`GridError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`GridError::Transient`] value.
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Build a [`GridError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Return `true` for failures the next scheduled tick is expected to retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
