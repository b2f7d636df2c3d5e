use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a run.
///
/// All variants except `ObjectiveShape` are raised while validating a
/// configuration, before the objective is ever called.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration field is missing, unknown, or has the wrong type
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The named objective does not resolve to anything callable
    #[error("objective `{0}` is not callable")]
    NotCallable(String),

    /// A field is present but its value is out of range
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String
    },

    #[error("objective returned {got} fitness values for {expected} particles")]
    ObjectiveShape {
        expected: usize,
        got: usize
    }
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Error::InvalidValue { field, reason: reason.into() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Configuration(e.to_string())
    }
}
