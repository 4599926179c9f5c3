// Wed Jan 14 2026 - Alex

//! Host constants for `open(2)`, `mmap(2)` and file modes.
//!
//! Values come straight from `libc`, so they are bit-for-bit the platform's.
//! The flag types are opaque carriers: `from_bits_retain` keeps bits this table
//! does not name, and nothing here reinterprets them.

use crate::utils;
use bitflags::{bitflags, Flags};
use libc::{c_int, mode_t};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenMode: c_int {
        const RDONLY = libc::O_RDONLY;
        const WRONLY = libc::O_WRONLY;
        const RDWR = libc::O_RDWR;
        const CREAT = libc::O_CREAT;
        const EXCL = libc::O_EXCL;
        const NOCTTY = libc::O_NOCTTY;
        const TRUNC = libc::O_TRUNC;
        const APPEND = libc::O_APPEND;
        const DSYNC = libc::O_DSYNC;
        const NONBLOCK = libc::O_NONBLOCK;
        const SYNC = libc::O_SYNC;
        #[cfg(any(target_os = "linux", target_os = "android"))]
        const RSYNC = libc::O_RSYNC;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapMode: c_int {
        const SHARED = libc::MAP_SHARED;
        const PRIVATE = libc::MAP_PRIVATE;
        const FIXED = libc::MAP_FIXED;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapProt: c_int {
        const NONE = libc::PROT_NONE;
        const READ = libc::PROT_READ;
        const WRITE = libc::PROT_WRITE;
        const EXEC = libc::PROT_EXEC;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMode: mode_t {
        const IFMT = libc::S_IFMT;
        const IFSOCK = libc::S_IFSOCK;
        const IFLNK = libc::S_IFLNK;
        const IFREG = libc::S_IFREG;
        const IFBLK = libc::S_IFBLK;
        const IFDIR = libc::S_IFDIR;
        const IFCHR = libc::S_IFCHR;
        const IFIFO = libc::S_IFIFO;
        const ISUID = libc::S_ISUID;
        const ISGID = libc::S_ISGID;
        const ISVTX = libc::S_ISVTX;
        const IRWXU = libc::S_IRWXU;
        const IRUSR = libc::S_IRUSR;
        const IWUSR = libc::S_IWUSR;
        const IXUSR = libc::S_IXUSR;
        const IRWXG = libc::S_IRWXG;
        const IRGRP = libc::S_IRGRP;
        const IWGRP = libc::S_IWGRP;
        const IXGRP = libc::S_IXGRP;
        const IRWXO = libc::S_IRWXO;
        const IROTH = libc::S_IROTH;
        const IWOTH = libc::S_IWOTH;
        const IXOTH = libc::S_IXOTH;
    }
}

/// Name -> value tables for every constant above, built once per process.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformConstants {
    pub pointer_width: usize,
    pub page_size: usize,
    pub open_mode: BTreeMap<String, i64>,
    pub map_mode: BTreeMap<String, i64>,
    pub map_prot: BTreeMap<String, i64>,
    pub file_mode: BTreeMap<String, i64>,
}

static PLATFORM: Lazy<PlatformConstants> = Lazy::new(PlatformConstants::build);

impl PlatformConstants {
    pub fn get() -> &'static PlatformConstants {
        &PLATFORM
    }

    fn build() -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        Self {
            pointer_width: std::mem::size_of::<usize>(),
            page_size: usize::try_from(page_size).unwrap_or(4096),
            open_mode: table::<OpenMode>("O_", |bits| bits as i64),
            map_mode: table::<MapMode>("MAP_", |bits| bits as i64),
            map_prot: table::<MapProt>("PROT_", |bits| bits as i64),
            file_mode: table::<FileMode>("S_", |bits| bits as i64),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn table<F: Flags>(prefix: &str, widen: impl Fn(F::Bits) -> i64) -> BTreeMap<String, i64> {
    F::FLAGS
        .iter()
        .map(|flag| (format!("{}{}", prefix, flag.name()), widen(flag.value().bits())))
        .collect()
}

/// Parses `"RDWR|CREAT"`, `"O_RDWR, O_CREAT"` or numeric literals such as `0o644`.
fn parse_flags<F>(text: &str, prefix: &str) -> Result<F, String>
where
    F: Flags,
    F::Bits: TryFrom<i128>,
{
    let mut flags = F::empty();
    for part in text.split(|c| c == '|' || c == ',').map(str::trim).filter(|p| !p.is_empty()) {
        let flag = if let Some(number) = utils::parse_int(part) {
            let bits = F::Bits::try_from(number).map_err(|_| format!("flag value out of range: {}", part))?;
            F::from_bits_retain(bits)
        } else {
            let upper = part.to_uppercase();
            let name = upper.strip_prefix(prefix).unwrap_or(&upper);
            F::from_name(name).ok_or_else(|| format!("unknown flag: {}", part))?
        };
        flags.insert(flag);
    }
    Ok(flags)
}

pub fn parse_open_mode(text: &str) -> Result<OpenMode, String> {
    parse_flags(text, "O_")
}

pub fn parse_map_mode(text: &str) -> Result<MapMode, String> {
    parse_flags(text, "MAP_")
}

pub fn parse_map_prot(text: &str) -> Result<MapProt, String> {
    parse_flags(text, "PROT_")
}

pub fn parse_file_mode(text: &str) -> Result<FileMode, String> {
    parse_flags(text, "S_")
}
