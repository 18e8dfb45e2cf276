/// A route template is malformed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{msg}")]
pub struct PatternParseError {
    msg: String,
    pattern: String,
}

impl PatternParseError {
    pub(super) fn new(msg: impl Into<String>, pattern: &str) -> Self {
        Self {
            msg: msg.into(),
            pattern: pattern.to_owned(),
        }
    }

    pub fn message(&self) -> &str {
        &self.msg
    }

    /// The offending template text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A pattern can not be assembled from its parts, defaults or policies.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{msg}")]
pub struct PatternBuildError {
    msg: String,
}

impl PatternBuildError {
    pub(super) fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] PatternParseError),
    #[error(transparent)]
    Build(#[from] PatternBuildError),
}

impl Error {
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    pub fn is_build(&self) -> bool {
        matches!(self, Error::Build(_))
    }
}
