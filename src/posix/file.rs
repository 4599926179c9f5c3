// Wed Jan 14 2026 - Alex

use crate::memory::MemoryError;
use crate::posix::{FileMode, OpenMode};
use std::ffi::CString;
use std::fmt;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

const CLOSED: RawFd = -1;

/// Exclusive owner of one platform file descriptor.
///
/// Once closed the descriptor is gone for good: every operation except
/// [`close`](File::close) then fails with "invalid file descriptor".
pub struct File {
    fd: RawFd,
}

impl File {
    pub fn open<P: AsRef<Path>>(path: P, flags: OpenMode, mode: FileMode) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| MemoryError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

        let fd = unsafe { libc::open(c_path.as_ptr(), flags.bits(), mode.bits() as libc::c_uint) };
        if fd < 0 {
            let err = MemoryError::last_os_error();
            log::debug!("open {} failed: {}", path.display(), err);
            return Err(err);
        }

        log::debug!("opened {} as fd {}", path.display(), fd);
        Ok(Self { fd })
    }

    pub fn is_open(&self) -> bool {
        self.fd >= 0
    }

    pub fn fd(&self) -> Result<RawFd, MemoryError> {
        if !self.is_open() {
            return Err(MemoryError::invalid_descriptor());
        }
        Ok(self.fd)
    }

    /// Closes the descriptor. Calling it again is a no-op.
    ///
    /// The descriptor is forgotten before `close(2)` runs, so a failed close
    /// still leaves this `File` closed and cannot be retried.
    pub fn close(&mut self) -> Result<(), MemoryError> {
        let fd = std::mem::replace(&mut self.fd, CLOSED);
        if fd < 0 {
            return Ok(());
        }

        if unsafe { libc::close(fd) } < 0 {
            return Err(MemoryError::last_os_error());
        }
        log::debug!("closed fd {}", fd);
        Ok(())
    }

    pub fn size(&self) -> Result<u64, MemoryError> {
        let fd = self.fd()?;
        let mut info = MaybeUninit::<libc::stat>::uninit();
        if unsafe { libc::fstat(fd, info.as_mut_ptr()) } < 0 {
            return Err(MemoryError::last_os_error());
        }
        let info = unsafe { info.assume_init() };
        Ok(info.st_size as u64)
    }

    /// Grows (zero-filled) or shrinks the file to `size` bytes.
    pub fn set_size(&self, size: u64) -> Result<(), MemoryError> {
        let fd = self.fd()?;
        let length = libc::off_t::try_from(size)
            .map_err(|e| MemoryError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
        if unsafe { libc::ftruncate(fd, length) } < 0 {
            return Err(MemoryError::last_os_error());
        }
        log::debug!("truncated fd {} to {} bytes", fd, size);
        Ok(())
    }
}

impl Drop for File {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("close on drop failed: {}", e);
        }
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File").field("fd", &self.fd).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create(path: &Path) -> File {
        File::open(path, OpenMode::RDWR | OpenMode::CREAT, FileMode::from_bits_retain(0o600)).unwrap()
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = File::open(dir.path().join("missing"), OpenMode::RDONLY, FileMode::empty()).unwrap_err();
        assert!(err.is_io());
        match err {
            MemoryError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_open_rejects_interior_nul() {
        let err = File::open("bad\0path", OpenMode::RDONLY, FileMode::empty()).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_size_and_set_size() {
        let dir = tempdir().unwrap();
        let file = create(&dir.path().join("data"));
        assert_eq!(file.size().unwrap(), 0);

        file.set_size(10_000).unwrap();
        assert_eq!(file.size().unwrap(), 10_000);

        file.set_size(3).unwrap();
        assert_eq!(file.size().unwrap(), 3);
        assert_eq!(std::fs::metadata(dir.path().join("data")).unwrap().len(), 3);
    }

    #[test]
    fn test_grow_zero_fills() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, [7u8; 4]).unwrap();
        let file = create(&path);
        file.set_size(8).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![7, 7, 7, 7, 0, 0, 0, 0]);
    }

    #[test]
    fn test_closed_file_rejects_operations() {
        let dir = tempdir().unwrap();
        let mut file = create(&dir.path().join("data"));
        file.close().unwrap();
        assert!(!file.is_open());

        for err in [file.size().unwrap_err(), file.set_size(1).unwrap_err(), file.fd().unwrap_err()] {
            assert!(err.is_io());
            assert!(err.to_string().contains("invalid file descriptor"));
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut first = create(&dir.path().join("first"));
        let second = create(&dir.path().join("second"));

        first.close().unwrap();
        first.close().unwrap();
        first.close().unwrap();

        assert!(second.is_open());
        second.set_size(16).unwrap();
        assert_eq!(second.size().unwrap(), 16);
    }

    #[test]
    fn test_failed_close_still_closes() {
        // Above any RLIMIT_NOFILE, so close(2) fails with EBADF.
        let mut file = File { fd: RawFd::MAX };
        assert!(file.is_open());

        let err = file.close().unwrap_err();
        assert!(err.is_io());
        assert!(!file.is_open());
        file.close().unwrap();
        assert!(file.size().unwrap_err().to_string().contains("invalid file descriptor"));
    }

    #[test]
    fn test_set_size_rejects_oversized_length() {
        let dir = tempdir().unwrap();
        let file = create(&dir.path().join("data"));
        assert!(file.set_size(u64::MAX).unwrap_err().is_io());
    }
}
