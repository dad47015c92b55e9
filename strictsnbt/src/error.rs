//! Contains the Error and Result type used by the parser.

/// An error from parsing SNBT text. Carries a message with the offending
/// position and an [`ErrorKind`] callers can match on.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A complete value was parsed but non-whitespace input followed it.
    TrailingData,

    /// A compound needed a key (bare or quoted) and found something else.
    ExpectedKey,

    /// A value was required and the input has none.
    ExpectedValue,

    /// A compound key was not followed by `:`.
    ExpectedColon,

    /// A list literal mixed two element types.
    MixedListTypes,

    /// An array literal held an element of the wrong type for its prefix.
    MixedArrayTypes,

    /// `[X;` for an `X` that is not `B`, `I` or `L`.
    InvalidArrayPrefix,

    /// The input stopped part way through a value.
    UnexpectedEof,

    /// Anything else, e.g. a missing separator or a bad escape. Match with a
    /// wildcard: errors here may move to their own variants.
    Other,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
        }
    }

    pub(crate) fn trailing_data(pos: usize) -> Self {
        Self::new(
            ErrorKind::TrailingData,
            format!("input continues after a complete value, at {pos}"),
        )
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "unexpectedly ran out of input")
    }
}

impl From<strictnbt::error::Error> for Error {
    fn from(err: strictnbt::error::Error) -> Self {
        Self::new(ErrorKind::Other, err.to_string())
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}
