/// Convenience result type used across storyreel.
pub type StoryreelResult<T> = Result<T, StoryreelError>;

/// Why a creative-API call (image or speech) produced nothing usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The request was rejected by the provider's safety filter.
    SafetyFilter {
        /// Provider-supplied reason, if any.
        reason: String,
    },
    /// The request never completed (network, auth, quota, bad response).
    Transport(String),
    /// The provider answered but returned no bytes.
    EmptyResponse,
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SafetyFilter { reason } => write!(f, "rejected by safety filter: {reason}"),
            Self::Transport(msg) => write!(f, "transport failure: {msg}"),
            Self::EmptyResponse => f.write_str("response contained no media data"),
        }
    }
}

/// Top-level error taxonomy used by compiler and tool APIs.
#[derive(thiserror::Error, Debug)]
pub enum StoryreelError {
    /// Malformed timing, resolution, or frame-rate strings.
    #[error("format error: {0}")]
    Format(String),

    /// A referenced file (image, audio, scenario) does not exist.
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// An image or speech generation collaborator failed.
    #[error("generation error: {failure}")]
    Generation {
        /// Distinguishes safety rejections from transport failures.
        failure: GenerationFailure,
    },

    /// The external renderer exited unsuccessfully.
    #[error("render error: renderer exited with {}: {stderr}", status_label(.status))]
    Render {
        /// Renderer exit code (`None` when killed by a signal).
        status: Option<i32>,
        /// Trimmed renderer stderr.
        stderr: String,
    },

    /// Invalid configuration or inputs that are well-formed but unusable.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl StoryreelError {
    /// Build a [`StoryreelError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`StoryreelError::MissingResource`] value.
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingResource(msg.into())
    }

    /// Build a [`StoryreelError::Generation`] value.
    pub fn generation(failure: GenerationFailure) -> Self {
        Self::Generation { failure }
    }

    /// Build a [`StoryreelError::Render`] value.
    pub fn render(status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Render {
            status,
            stderr: stderr.into(),
        }
    }

    /// Build a [`StoryreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Exit code a CLI should use for this error.
    ///
    /// Render failures forward the renderer's own exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Render {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
