// Tue Jan 13 2026 - Alex

pub mod logging;

pub use logging::{scoped_timer, LoggingUtils, ScopedTimer};

use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();

    if total_secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if total_secs < 1.0 {
        format!("{:.2}ms", total_secs * 1000.0)
    } else {
        format!("{:.2}s", total_secs)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn hex_string_spaced(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

pub fn has_hex_prefix(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.starts_with("0x") || digits.starts_with("0X")
}

/// Parses a decimal, `0x` hex or `0o` octal integer with an optional leading `-`.
pub fn parse_int(s: &str) -> Option<i128> {
    let s = s.trim().replace('_', "");
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.as_str()),
    };
    // from_str_radix takes its own sign; only the single leading '-' is ours.
    if digits.contains(|c| c == '+' || c == '-') {
        return None;
    }
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()?
    } else if let Some(octal) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        i128::from_str_radix(octal, 8).ok()?
    } else {
        digits.parse::<i128>().ok()?
    };
    if negative {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Like [`parse_int`], narrowed to `i64`; the form addresses and lengths take on the command line.
pub fn parse_i64(s: &str) -> Result<i64, String> {
    parse_int(s)
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| format!("invalid integer: {}", s))
}
