//! Contains the Error and Result type used throughout the crate.

use crate::Tag;

/// Error produced while reading, writing or manipulating NBT data. Carries a
/// human readable message and a [`ErrorKind`] that callers can match on.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An error from the underlying byte source or sink.
    Io,

    /// The byte source ended part way through a value.
    UnexpectedEof,

    /// Structurally invalid NBT, for example an unknown tag byte, a negative
    /// array length, or an End tag where a value was required.
    Format,

    /// The cumulative decoded size passed the quota given to the
    /// [`Accounter`][`crate::Accounter`]. The decode cannot be resumed.
    QuotaExceeded,

    /// Values were nested deeper than the accounter's depth cap.
    DepthExceeded,

    /// A value of one type was used where another type was required, e.g.
    /// pushing a `Short` into a list of `Byte`.
    TypeMismatch,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == ErrorKind::QuotaExceeded
    }

    pub fn is_depth_exceeded(&self) -> bool {
        self.kind == ErrorKind::DepthExceeded
    }

    pub fn is_type_mismatch(&self) -> bool {
        self.kind == ErrorKind::TypeMismatch
    }

    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
        }
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::new(ErrorKind::Format, format!("invalid nbt tag value: {tag}"))
    }

    pub(crate) fn no_root_value() -> Self {
        Self::new(ErrorKind::Format, "invalid nbt: root tag was End")
    }

    pub(crate) fn nonunicode(data: &[u8]) -> Self {
        Self::new(
            ErrorKind::Format,
            format!(
                "invalid nbt string, non-unicode: {}",
                String::from_utf8_lossy(data)
            ),
        )
    }

    pub(crate) fn negative_length(len: i32) -> Self {
        Self::new(ErrorKind::Format, format!("negative length: {len}"))
    }

    pub(crate) fn list_of_end(len: i32) -> Self {
        Self::new(
            ErrorKind::Format,
            format!("list of End with nonzero length: {len}"),
        )
    }

    pub(crate) fn length_overflow() -> Self {
        Self::new(ErrorKind::Format, "length too large")
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "unexpectedly ran out of input")
    }

    pub(crate) fn quota_exceeded(quota: u64, needed: u64) -> Self {
        Self::new(
            ErrorKind::QuotaExceeded,
            format!("decode passed quota of {quota} bytes (needed {needed})"),
        )
    }

    pub(crate) fn depth_exceeded(max_depth: usize) -> Self {
        Self::new(
            ErrorKind::DepthExceeded,
            format!("nbt nested deeper than {max_depth} levels"),
        )
    }

    pub(crate) fn list_type_mismatch(expected: Tag, found: Tag) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!(
                "list of {} cannot hold {}",
                expected.name(),
                found.name()
            ),
        )
    }

    pub(crate) fn key_type_mismatch(key: &str, expected: Tag, found: Option<Tag>) -> Self {
        let found = found.map_or("nothing", Tag::name);
        Self::new(
            ErrorKind::TypeMismatch,
            format!("key '{key}': expected {}, found {found}", expected.name()),
        )
    }

    pub(crate) fn bespoke(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, msg)
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::new(ErrorKind::UnexpectedEof, e.to_string()),
            _ => Self::new(ErrorKind::Io, e.to_string()),
        }
    }
}
