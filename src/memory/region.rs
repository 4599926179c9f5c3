// Tue Jan 13 2026 - Alex

//! Bounds-checked view over a flat span of bytes.
//!
//! Addresses are signed 64-bit offsets from the start of the region so that
//! negative requests are representable and rejected instead of wrapping. Every
//! operation in [`access`](super::access), [`atomic`](super::atomic) and
//! [`bulk`](super::bulk) validates through the `check_*` methods here before it
//! touches memory, so a rejected request never writes anything.

use crate::memory::MemoryError;
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Minimum alignment of a region base. Aligned accesses of every width then
/// land on naturally aligned native addresses after truncation.
pub const REGION_ALIGN: usize = 8;

/// Non-owning `{base, size}` view borrowed from its backing storage for `'a`.
#[derive(Clone, Copy)]
pub struct MemoryRegion<'a> {
    base: NonNull<u8>,
    size: usize,
    _marker: PhantomData<&'a UnsafeCell<[u8]>>,
}

// All per-access operations go through atomics; bulk operations document their
// own race obligations.
unsafe impl Send for MemoryRegion<'_> {}
unsafe impl Sync for MemoryRegion<'_> {}

impl<'a> MemoryRegion<'a> {
    /// # Safety
    ///
    /// `base` must be aligned to [`REGION_ALIGN`] and valid for reads and writes
    /// of `size` bytes for all of `'a`, and nothing else may create references
    /// to those bytes while the view is alive.
    pub unsafe fn from_raw_parts(base: NonNull<u8>, size: usize) -> Self {
        debug_assert_eq!(base.as_ptr() as usize % REGION_ALIGN, 0, "region base must be 8-byte aligned");
        Self {
            base,
            size,
            _marker: PhantomData,
        }
    }

    /// Views a caller-owned word buffer as a region of `words.len() * 8` bytes.
    pub fn from_words(words: &'a mut [u64]) -> Self {
        let size = std::mem::size_of_val(words);
        let base = NonNull::from(words).cast::<u8>();
        unsafe { Self::from_raw_parts(base, size) }
    }

    /// Native pointer width of the host, in bytes.
    pub fn unit() -> usize {
        std::mem::size_of::<usize>()
    }

    pub fn base(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains(&self, address: i64) -> bool {
        address >= 0 && address < self.limit()
    }

    fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }

    /// Accepts `0 <= address < size`.
    pub fn check_address(&self, address: i64) -> Result<usize, MemoryError> {
        if !self.contains(address) {
            return Err(MemoryError::OutOfBounds {
                address,
                size: self.size,
            });
        }
        Ok(address as usize)
    }

    /// Accepts `0 <= address`, `0 <= length` and `address + length <= size`.
    pub fn check_range(&self, address: i64, length: i64) -> Result<usize, MemoryError> {
        let fits = address >= 0
            && length >= 0
            && address
                .checked_add(length)
                .map_or(false, |end| end <= self.limit());
        if !fits {
            return Err(MemoryError::RangeOutOfBounds {
                address,
                length,
                size: self.size,
            });
        }
        Ok(address as usize)
    }

    /// Accepts `lower <= upper`, `0 <= lower < size` and `0 <= upper <= size`.
    pub fn check_bounds(&self, lower: i64, upper: i64) -> Result<(usize, usize), MemoryError> {
        let limit = self.limit();
        if lower > upper || lower < 0 || lower >= limit || upper < 0 || upper > limit {
            return Err(MemoryError::InvalidBounds {
                lower,
                upper,
                size: self.size,
            });
        }
        Ok((lower as usize, upper as usize))
    }

    /// Validates `address`, truncates it to a multiple of `width` and checks
    /// that the whole truncated word lies inside the region.
    pub fn check_aligned(&self, address: i64, width: usize) -> Result<usize, MemoryError> {
        debug_assert!(width.is_power_of_two());
        let truncated = self.check_address(address)? & !(width - 1);
        if truncated + width > self.size {
            return Err(MemoryError::RangeOutOfBounds {
                address: truncated as i64,
                length: width as i64,
                size: self.size,
            });
        }
        Ok(truncated)
    }

    /// # Safety
    ///
    /// `offset` must have been validated by one of the `check_*` methods.
    pub(crate) unsafe fn ptr_at(&self, offset: usize) -> *mut u8 {
        unsafe { self.base.as_ptr().add(offset) }
    }
}

impl fmt::Debug for MemoryRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRegion")
            .field("base", &self.base.as_ptr())
            .field("size", &self.size)
            .finish()
    }
}

impl fmt::Display for MemoryRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:p}, +{}]", self.base.as_ptr(), self.size)
    }
}
