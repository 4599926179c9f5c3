// Wed Jan 14 2026 - Alex

use crate::memory::{MemoryError, MemoryRegion};
use crate::posix::{File, MapMode, MapProt};
use std::fmt;
use std::ptr::NonNull;

/// A memory mapping of a file, unmapped exactly once when dropped.
///
/// Regions borrowed through [`region`](FileData::region) cannot outlive it.
pub struct FileData {
    base: NonNull<u8>,
    length: usize,
}

unsafe impl Send for FileData {}
unsafe impl Sync for FileData {}

impl FileData {
    /// Maps `length` bytes of `file` starting at `offset`.
    ///
    /// `address` is a placement hint (0 for none). `prot` and `flags` go to
    /// `mmap(2)` untouched.
    ///
    /// # Safety
    ///
    /// With [`MapMode::FIXED`] the mapping replaces whatever lived at `address`,
    /// which must not be memory Rust code still uses. Shared mappings also see
    /// writes and truncation by other processes; shrinking the file underneath a
    /// live mapping makes later accesses past the new end fault.
    ///
    /// `prot` is not checked against what [`region`](FileData::region) allows:
    /// stores through a `PROT_READ` or `PROT_NONE` mapping, and any access to a
    /// `PROT_NONE` one, kill the process with `SIGSEGV`. Likewise `length` may
    /// exceed the file; bytes in whole pages past end of file raise `SIGBUS`
    /// when touched, even though the region's bounds checks accept them.
    pub unsafe fn map(
        address: usize,
        length: usize,
        prot: MapProt,
        flags: MapMode,
        file: &File,
        offset: i64,
    ) -> Result<Self, MemoryError> {
        let fd = file.fd()?;
        let offset = libc::off_t::try_from(offset)
            .map_err(|e| MemoryError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

        let ptr = unsafe {
            libc::mmap(address as *mut libc::c_void, length, prot.bits(), flags.bits(), fd, offset)
        };
        if ptr == libc::MAP_FAILED {
            let err = MemoryError::last_os_error();
            log::debug!("mmap of fd {} ({} bytes at offset {}) failed: {}", fd, length, offset, err);
            return Err(err);
        }

        let base = match NonNull::new(ptr.cast::<u8>()) {
            Some(base) => base,
            None => {
                unsafe { libc::munmap(ptr, length) };
                return Err(MemoryError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "mapping placed at null address",
                )));
            }
        };

        log::debug!("mapped fd {} ({} bytes at offset {}) at {:p}", fd, length, offset, ptr);
        Ok(Self { base, length })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn region(&self) -> MemoryRegion<'_> {
        unsafe { MemoryRegion::from_raw_parts(self.base, self.length) }
    }

    /// Flushes dirty pages of a shared mapping back to the file.
    pub fn sync(&self) -> Result<(), MemoryError> {
        if unsafe { libc::msync(self.base.as_ptr().cast(), self.length, libc::MS_SYNC) } < 0 {
            return Err(MemoryError::last_os_error());
        }
        Ok(())
    }
}

impl Drop for FileData {
    fn drop(&mut self) {
        if unsafe { libc::munmap(self.base.as_ptr().cast(), self.length) } < 0 {
            log::warn!("munmap of {:p} failed: {}", self.base.as_ptr(), std::io::Error::last_os_error());
        } else {
            log::debug!("unmapped {} bytes at {:p}", self.length, self.base.as_ptr());
        }
    }
}

impl fmt::Debug for FileData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileData")
            .field("base", &self.base.as_ptr())
            .field("length", &self.length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posix::{FileMode, OpenMode, PlatformConstants};
    use std::path::Path;
    use tempfile::tempdir;

    const READ_WRITE: MapProt = MapProt::READ.union(MapProt::WRITE);

    fn create(path: &Path, size: u64) -> File {
        let file = File::open(path, OpenMode::RDWR | OpenMode::CREAT, FileMode::from_bits_retain(0o600)).unwrap();
        file.set_size(size).unwrap();
        file
    }

    #[test]
    fn test_shared_mapping_writes_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        let file = create(&path, 64);

        let data = unsafe { FileData::map(0, 64, READ_WRITE, MapMode::SHARED, &file, 0) }.unwrap();
        assert_eq!(data.len(), 64);
        let region = data.region();
        region.store_int(8, 0x0102_0304).unwrap();
        region.store_unaligned_long(33, -2).unwrap();
        data.sync().unwrap();
        drop(data);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[8..12], &0x0102_0304i32.to_ne_bytes());
        assert_eq!(&bytes[33..41], &(-2i64).to_ne_bytes());
    }

    #[test]
    fn test_private_mapping_does_not_write_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        let file = create(&path, 16);

        let data = unsafe { FileData::map(0, 16, READ_WRITE, MapMode::PRIVATE, &file, 0) }.unwrap();
        data.region().store_long(0, -1).unwrap();
        assert_eq!(data.region().load_long(0).unwrap(), -1);
        drop(data);

        assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn test_tail_of_last_page_reads_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, [0xaau8; 100]).unwrap();
        let file = File::open(&path, OpenMode::RDONLY, FileMode::empty()).unwrap();
        let page = PlatformConstants::get().page_size;

        let data = unsafe { FileData::map(0, page, MapProt::READ, MapMode::PRIVATE, &file, 0) }.unwrap();
        let region = data.region();
        assert_eq!(region.load_byte(99).unwrap(), 0xaau8 as i8);
        assert_eq!(region.load_byte(100).unwrap(), 0);
        assert!(region.read_bytes(100, page as i64 - 100).unwrap().iter().all(|b| *b == 0));
        assert!(region.load_byte(page as i64).unwrap_err().is_bounds());
    }

    #[test]
    fn test_map_at_page_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        let page = PlatformConstants::get().page_size;
        let mut contents = vec![0u8; page * 2];
        contents[page] = 42;
        std::fs::write(&path, &contents).unwrap();
        let file = File::open(&path, OpenMode::RDONLY, FileMode::empty()).unwrap();

        let data = unsafe { FileData::map(0, page, MapProt::READ, MapMode::SHARED, &file, page as i64) }.unwrap();
        assert_eq!(data.region().load_byte(0).unwrap(), 42);
    }

    #[test]
    fn test_map_failures_surface_os_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        let file = create(&path, 16);

        let empty = unsafe { FileData::map(0, 0, MapProt::READ, MapMode::SHARED, &file, 0) };
        assert!(empty.unwrap_err().is_io());

        let unaligned = unsafe { FileData::map(0, 16, MapProt::READ, MapMode::SHARED, &file, 3) };
        assert!(unaligned.unwrap_err().is_io());

        let read_only = File::open(&path, OpenMode::RDONLY, FileMode::empty()).unwrap();
        let denied = unsafe { FileData::map(0, 16, READ_WRITE, MapMode::SHARED, &read_only, 0) };
        assert!(denied.unwrap_err().is_io());
    }

    #[test]
    fn test_map_closed_file_fails() {
        let dir = tempdir().unwrap();
        let mut file = create(&dir.path().join("data"), 16);
        file.close().unwrap();
        let err = unsafe { FileData::map(0, 16, MapProt::READ, MapMode::SHARED, &file, 0) }.unwrap_err();
        assert!(err.to_string().contains("invalid file descriptor"));
    }

    #[test]
    fn test_mapping_outlives_closed_file() {
        let dir = tempdir().unwrap();
        let mut file = create(&dir.path().join("data"), 32);
        let data = unsafe { FileData::map(0, 32, READ_WRITE, MapMode::SHARED, &file, 0) }.unwrap();
        file.close().unwrap();

        let region = data.region();
        assert!(region.compare_and_swap_double(16, 0.0, 3.5).unwrap());
        assert_eq!(region.load_double(16).unwrap(), 3.5);
    }
}
