// Tue Jan 13 2026 - Alex

use crate::posix::{FileMode, MapMode, MapProt, OpenMode};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults for opening and mapping files from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub read_only: bool,
    pub create: bool,
    pub shared: bool,
    pub mode: u32,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_only: false,
            create: false,
            shared: true,
            mode: 0o644,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.read_only && self.create {
            return Err("create requires a writable file".to_string());
        }
        if self.mode & !0o7777 != 0 {
            return Err(format!("mode {:o} has bits outside permission and sticky bits", self.mode));
        }
        if !matches!(
            self.log_level.to_lowercase().as_str(),
            "off" | "error" | "warn" | "warning" | "info" | "debug" | "trace"
        ) {
            return Err(format!("unknown log level: {}", self.log_level));
        }
        Ok(())
    }

    pub fn open_mode(&self) -> OpenMode {
        let mut flags = if self.read_only { OpenMode::RDONLY } else { OpenMode::RDWR };
        if self.create {
            flags |= OpenMode::CREAT;
        }
        flags
    }

    pub fn file_mode(&self) -> FileMode {
        FileMode::from_bits_retain(self.mode as libc::mode_t)
    }

    pub fn map_prot(&self) -> MapProt {
        if self.read_only {
            MapProt::READ
        } else {
            MapProt::READ | MapProt::WRITE
        }
    }

    pub fn map_mode(&self) -> MapMode {
        if self.shared {
            MapMode::SHARED
        } else {
            MapMode::PRIVATE
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        crate::utils::LoggingUtils::level_from_str(&self.log_level)
    }
}
