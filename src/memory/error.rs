// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Bounds,
    Io,
}

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of bounds: address {address} not in [0, {size})")]
    OutOfBounds { address: i64, size: usize },
    #[error("Out of bounds: range {address}+{length} exceeds size {size}")]
    RangeOutOfBounds { address: i64, length: i64, size: usize },
    #[error("Invalid bounds: [{lower}, {upper}) in region of size {size}")]
    InvalidBounds { lower: i64, upper: i64, size: usize },
}

impl MemoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::OutOfBounds { .. } | Self::RangeOutOfBounds { .. } | Self::InvalidBounds { .. } => {
                ErrorKind::Bounds
            }
        }
    }

    pub fn is_bounds(&self) -> bool {
        self.kind() == ErrorKind::Bounds
    }

    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    /// The descriptor-state failure raised by every `File` operation after `close()`.
    pub fn invalid_descriptor() -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::Other, "invalid file descriptor"))
    }

    /// Captures `errno` from the syscall that just failed.
    pub fn last_os_error() -> Self {
        Self::Io(std::io::Error::last_os_error())
    }
}
