// Tue Jan 13 2026 - Alex

//! Range operations.
//!
//! `move_bytes` and `clear` run as plain `memmove`/`memset` over the validated
//! span: they are not atomic, and the caller must keep them from racing with
//! any other access to the same bytes. `read_bytes` and `write_bytes` go byte by
//! byte through relaxed atomics and may overlap concurrent access.

use crate::memory::{MemoryError, MemoryRegion};
use std::ptr;
use std::sync::atomic::Ordering;

impl<'a> MemoryRegion<'a> {
    /// Copies `length` bytes from `from` to `to`; the ranges may overlap.
    pub fn move_bytes(&self, from: i64, to: i64, length: i64) -> Result<(), MemoryError> {
        let source = self.check_range(from, length)?;
        let target = self.check_range(to, length)?;
        unsafe { ptr::copy(self.ptr_at(source), self.ptr_at(target), length as usize) };
        Ok(())
    }

    /// Zero-fills `[from, until)`.
    pub fn clear(&self, from: i64, until: i64) -> Result<(), MemoryError> {
        let (lower, upper) = self.check_bounds(from, until)?;
        unsafe { ptr::write_bytes(self.ptr_at(lower), 0, upper - lower) };
        Ok(())
    }

    pub fn read_bytes(&self, address: i64, length: i64) -> Result<Vec<u8>, MemoryError> {
        let offset = self.check_range(address, length)?;
        let bytes = (offset..offset + length as usize)
            .map(|i| unsafe { self.byte_at(i) }.load(Ordering::Relaxed))
            .collect();
        Ok(bytes)
    }

    pub fn write_bytes(&self, address: i64, data: &[u8]) -> Result<(), MemoryError> {
        let length = i64::try_from(data.len()).unwrap_or(i64::MAX);
        let offset = self.check_range(address, length)?;
        for (i, byte) in data.iter().enumerate() {
            unsafe { self.byte_at(offset + i) }.store(*byte, Ordering::Relaxed);
        }
        Ok(())
    }
}
