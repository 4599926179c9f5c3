// Tue Jan 13 2026 - Alex

pub mod access;
pub mod anon;
pub mod atomic;
pub mod bulk;
pub mod error;
pub mod region;
pub mod scalar;

pub use anon::AnonData;
pub use error::{ErrorKind, MemoryError};
pub use region::{MemoryRegion, REGION_ALIGN};
pub use scalar::{Access, Scalar, ScalarKind, Swappable, Value};
