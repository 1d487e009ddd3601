//! Error types for the binding layer.

use thiserror::Error;

/// Main error type for NeXus operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A native library primitive reported failure
    #[error("{0}")]
    Io(String),

    /// Write-path operation; this binding is read-only
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Attribute lookup scanned every attribute without a match
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// Decoding or internal consistency failure
    #[error("{0}")]
    Runtime(String),

    /// Unrecognised element type, result kind token or malformed argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A directory cursor was stepped before being initialised
    #[error("{0} directory not initialised")]
    CursorNotInitialized(&'static str),

    /// The handle was already closed
    #[error("file handle is closed")]
    ClosedHandle,

    /// Host I/O error while reading or writing a container
    #[error("I/O error: {0}")]
    HostIo(#[from] std::io::Error),

    /// Malformed text container
    #[error("invalid container: {0}")]
    Json(#[from] serde_json::Error),
}

/// Taxonomy class of an [`Error`], as seen by scripting callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Library or host I/O failure
    Io,
    /// Unimplemented write path
    NotImplemented,
    /// Decode failure, missing attribute, misuse of a handle
    Runtime,
    /// Bad type tag or token
    InvalidArgument,
}

impl Error {
    /// Create a library failure error for the named primitive.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a runtime error from a string.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// The write-path stub error.
    pub fn writing() -> Self {
        Self::NotImplemented("Writing")
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::HostIo(_) | Self::Json(_) => ErrorKind::Io,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::AttributeNotFound(_)
            | Self::Runtime(_)
            | Self::CursorNotInitialized(_)
            | Self::ClosedHandle => ErrorKind::Runtime,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Result type alias for NeXus operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::writing().to_string(), "Writing is not implemented");

        let e = Error::AttributeNotFound("units".into());
        assert!(e.to_string().contains("not found"));
        assert!(e.to_string().contains("units"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::io("opengroup failed").kind(), ErrorKind::Io);
        assert_eq!(Error::writing().kind(), ErrorKind::NotImplemented);
        assert_eq!(Error::AttributeNotFound("x".into()).kind(), ErrorKind::Runtime);
        assert_eq!(Error::invalid("bad").kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::CursorNotInitialized("group").kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::HostIo(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
