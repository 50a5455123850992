//! Shared utility functions.

use crate::constants::BYTES_PER_MB;

/// Format bytes in human-readable form, using the same decimal units as the
/// upload size limit.
///
/// # Examples
///
/// ```
/// use assetlib::utils::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 bytes");
/// assert_eq!(format_bytes(1000), "1.0 KB");
/// assert_eq!(format_bytes(1500), "1.5 KB");
/// assert_eq!(format_bytes(10_000_000), "10.0 MB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1000;
    const MB: u64 = BYTES_PER_MB;
    const GB: u64 = 1000 * BYTES_PER_MB;

    if bytes == 0 {
        "0 bytes".to_string()
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

/// Singular or plural noun for a count.
#[must_use]
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
