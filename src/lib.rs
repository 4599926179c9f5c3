// Tue Jan 15 2026 - Alex

//! Bounds-checked scalar, atomic and bulk access to raw memory regions, plus
//! POSIX files and file-backed mappings that produce those regions.

pub mod config;
pub mod memory;
pub mod posix;
pub mod utils;

pub use config::Config;
pub use memory::{Access, AnonData, ErrorKind, MemoryError, MemoryRegion, ScalarKind, Value};
pub use posix::{File, FileData, FileMode, MapMode, MapProt, OpenMode, PlatformConstants};

/// Native pointer width of the host, in bytes.
pub fn unit() -> usize {
    MemoryRegion::unit()
}
