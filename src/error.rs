use crate::format::FormatKind;
use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FnaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not determine the file format")]
    UnknownFormat,

    #[error("Broken {format} format: {msg}")]
    BrokenFormat { format: FormatKind, msg: String },

    #[error("Corrupt record buffer: {msg}")]
    CorruptRecord { msg: String },

    #[error("Out of memory while assembling a record")]
    OutOfMemory,

    #[error("Record field of {len} bytes exceeds the 4 GiB limit")]
    FieldTooLarge { len: usize },

    #[error("Unsupported GFA version 0x{version:06x} (1.0.0 or later required)")]
    UnsupportedVersion { version: u32 },

    #[error("{format} support is not compiled into this build")]
    UnsupportedBuild { format: FormatKind },
}

impl FnaError {
    pub(crate) fn broken(format: FormatKind, msg: impl Into<String>) -> Self {
        FnaError::BrokenFormat {
            format,
            msg: msg.into(),
        }
    }

    /// A copy of this error for reporting it again. I/O errors keep their
    /// kind and message but lose the source chain.
    pub(crate) fn replay(&self) -> Self {
        match self {
            FnaError::Io(e) => FnaError::Io(io::Error::new(e.kind(), e.to_string())),
            FnaError::UnknownFormat => FnaError::UnknownFormat,
            FnaError::BrokenFormat { format, msg } => FnaError::broken(*format, msg.clone()),
            FnaError::CorruptRecord { msg } => FnaError::CorruptRecord { msg: msg.clone() },
            FnaError::OutOfMemory => FnaError::OutOfMemory,
            FnaError::FieldTooLarge { len } => FnaError::FieldTooLarge { len: *len },
            FnaError::UnsupportedVersion { version } => {
                FnaError::UnsupportedVersion { version: *version }
            }
            FnaError::UnsupportedBuild { format } => FnaError::UnsupportedBuild { format: *format },
        }
    }
}

impl From<TryReserveError> for FnaError {
    fn from(_: TryReserveError) -> Self {
        FnaError::OutOfMemory
    }
}

pub type Result<T> = std::result::Result<T, FnaError>;

/// Outcome of the last session call.
///
/// `Eof` is not an error: it is reported when the input is exhausted, and
/// callers should check it to tell a finished stream from a broken one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Success,
    Eof,
    FileOpen,
    UnknownFormat,
    BrokenFormat,
    OutOfMemory,
    UnsupportedVersion,
    UnsupportedBuild,
}

impl Status {
    #[inline]
    pub fn is_error(&self) -> bool {
        !matches!(self, Status::Success | Status::Eof)
    }
}

impl From<&FnaError> for Status {
    fn from(err: &FnaError) -> Self {
        match err {
            FnaError::Io(_) => Status::FileOpen,
            FnaError::UnknownFormat => Status::UnknownFormat,
            FnaError::BrokenFormat { .. } | FnaError::CorruptRecord { .. } => {
                Status::BrokenFormat
            }
            FnaError::OutOfMemory | FnaError::FieldTooLarge { .. } => Status::OutOfMemory,
            FnaError::UnsupportedVersion { .. } => Status::UnsupportedVersion,
            FnaError::UnsupportedBuild { .. } => Status::UnsupportedBuild,
        }
    }
}
