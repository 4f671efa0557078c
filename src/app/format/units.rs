//! Byte, latency, duration and percentage formatting.

use crate::domain::BytesUnit;

const KB: i64 = 1024;
const MB: i64 = KB * 1024;
const GB: i64 = MB * 1024;
const TB: i64 = GB * 1024;

/// Group an integer with thousands separators.
pub fn format_large_integer(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a byte count in the requested unit.
pub fn format_bytes(bytes: i64, unit: BytesUnit) -> String {
    match unit {
        BytesUnit::Bytes => format_bytes_only(bytes),
        BytesUnit::Kilo => format_kb_only(bytes),
        BytesUnit::Mega => format_mb_only(bytes),
        BytesUnit::Giga => format_gb_only(bytes),
        BytesUnit::Tera => format_tb_only(bytes),
    }
}

/// Byte count with thousands separators.
pub fn format_bytes_only(bytes: i64) -> String {
    format_large_integer(bytes)
}

/// Whole kilobytes, truncated.
pub fn format_kb_only(bytes: i64) -> String {
    format!("{} KB", format_large_integer(bytes / KB))
}

/// Whole megabytes, truncated.
pub fn format_mb_only(bytes: i64) -> String {
    format!("{} MB", format_large_integer(bytes / MB))
}

pub fn format_gb_only(bytes: i64) -> String {
    format!("{:.1} GB", bytes as f64 / GB as f64)
}

pub fn format_tb_only(bytes: i64) -> String {
    format!("{:.1} TB", bytes as f64 / TB as f64)
}

/// Megabyte values reported by members, rendered in the requested unit.
pub fn format_megabytes(megabytes: i64, unit: BytesUnit) -> String {
    format_bytes(megabytes.saturating_mul(MB), unit)
}

pub fn format_latency(millis: f64) -> String {
    format!("{millis:.3}ms")
}

pub fn format_latency0(millis: f64) -> String {
    format!("{millis:.0}ms")
}

/// Format an elapsed time in milliseconds.
///
/// Under a minute the value is truncated to tenths of a second; longer
/// values are rounded to the nearest second.
pub fn format_connection_millis(millis: i64) -> String {
    let millis = millis.max(0);
    if millis < 60_000 {
        return format!("{}.{}s", millis / 1000, (millis % 1000) / 100);
    }
    let total = millis.saturating_add(500) / 1000;
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, rest) = (rest / 3600, rest % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else if hours > 0 {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes:02}m {seconds:02}s")
    }
}

/// Render a 0..1 fraction as a percentage; negative values are not applicable.
pub fn format_percent(fraction: f64) -> String {
    if fraction < 0.0 { "n/a".to_string() } else { format!("{:.2}%", fraction * 100.0) }
}
