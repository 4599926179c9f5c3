// Tue Jan 13 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the process logger.
    ///
    /// `RUST_LOG` wins when set and hands control to `env_logger`. Otherwise records
    /// go to `log_file` when given, or to a colored stderr logger.
    pub fn init(level: LevelFilter, log_file: Option<&Path>) -> std::io::Result<()> {
        if std::env::var_os("RUST_LOG").is_some() {
            let _ = env_logger::try_init();
            return Ok(());
        }
        match log_file {
            Some(path) => Self::init_logger_with_file(level, path),
            None => {
                Self::init_logger(level);
                Ok(())
            }
        }
    }

    pub fn init_logger(level: LevelFilter) {
        let logger = Box::new(ColoredLogger::new(level));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    pub fn init_logger_with_file(level: LevelFilter, file_path: &Path) -> std::io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        let logger = Box::new(FileLogger::new(level, file));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
        Ok(())
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    /// Raises `base` by one level per `-v`.
    pub fn level_with_verbosity(base: LevelFilter, verbosity: u8) -> LevelFilter {
        let mut level = base;
        for _ in 0..verbosity {
            level = match level {
                LevelFilter::Off => LevelFilter::Error,
                LevelFilter::Error => LevelFilter::Warn,
                LevelFilter::Warn => LevelFilter::Info,
                LevelFilter::Info => LevelFilter::Debug,
                LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
            };
        }
        level
    }
}

struct ColoredLogger {
    level: LevelFilter,
}

impl ColoredLogger {
    fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn format_level(&self, level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let target = format!("[{}]", record.target());
            eprintln!("{} {} {}", self.format_level(record.level()), target.dimmed(), record.args());
        }
    }

    fn flush(&self) {}
}

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    fn new(level: LevelFilter, file: File) -> Self {
        Self {
            level,
            file: Mutex::new(file),
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format!(
                "{} {:5} [{}] {}\n",
                timestamp(),
                record.level(),
                record.target(),
                record.args()
            );

            if let Ok(mut file) = self.file.lock() {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn timestamp() -> String {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("{} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("{} took {}", self.name, super::format_duration(self.start.elapsed()));
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("WARNING"), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_str("trace"), LevelFilter::Trace);
        assert_eq!(LoggingUtils::level_from_str("bogus"), LevelFilter::Info);
    }

    #[test]
    fn test_level_with_verbosity() {
        assert_eq!(LoggingUtils::level_with_verbosity(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_with_verbosity(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_with_verbosity(LevelFilter::Info, 9), LevelFilter::Trace);
    }
}
