// Tue Jan 13 2026 - Alex

use crate::memory::{MemoryError, MemoryRegion};
use memmap2::MmapMut;
use std::fmt;
use std::ptr::NonNull;

/// Zero-filled anonymous memory that owns the bytes its regions view.
pub struct AnonData {
    mmap: MmapMut,
    base: NonNull<u8>,
}

unsafe impl Send for AnonData {}
unsafe impl Sync for AnonData {}

impl AnonData {
    pub fn allocate(size: usize) -> Result<Self, MemoryError> {
        let mut mmap = MmapMut::map_anon(size)?;
        let base = NonNull::new(mmap.as_mut_ptr())
            .ok_or_else(|| MemoryError::Io(std::io::Error::new(std::io::ErrorKind::Other, "null anonymous mapping")))?;
        log::debug!("allocated {} anonymous bytes at {:p}", size, base.as_ptr());
        Ok(Self { mmap, base })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    pub fn region(&self) -> MemoryRegion<'_> {
        unsafe { MemoryRegion::from_raw_parts(self.base, self.mmap.len()) }
    }
}

impl fmt::Debug for AnonData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonData")
            .field("base", &self.base.as_ptr())
            .field("len", &self.mmap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let data = AnonData::allocate(64).unwrap();
        assert_eq!(data.len(), 64);
        let region = data.region();
        assert_eq!(region.size(), 64);
        assert!(region.read_bytes(0, 64).unwrap().iter().all(|b| *b == 0));
        assert_eq!(region.base() as usize % crate::memory::REGION_ALIGN, 0);
    }

    #[test]
    fn test_regions_share_storage() {
        let data = AnonData::allocate(32).unwrap();
        data.region().store_long(8, 77).unwrap();
        assert_eq!(data.region().load_long(8).unwrap(), 77);
        assert!(data.region().load_long(32).is_err());
    }
}
