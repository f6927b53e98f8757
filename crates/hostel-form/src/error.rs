use thiserror::Error;

/// Failures while configuring the toggler or pushing a display state into the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// The auxiliary region is absent from the markup.
    #[error("auxiliary region `{id}` not found")]
    MissingRegion { id: String },
    /// The host rejected a DOM call (style write, listener registration).
    #[error("DOM call on `{id}` failed: {message}")]
    Dom { id: String, message: String },
    /// The host page handed over a config that is not a valid JSON object.
    #[error("invalid toggle config: {message}")]
    InvalidConfig { message: String },
}

pub type ToggleResult<T> = Result<T, ToggleError>;
