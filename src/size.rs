//! Human-readable byte sizes
//!
//! Sizes use binary multiples (1 KB = 1024 B) and the short labels
//! B, KB, MB, GB, TB. Formatting picks the largest unit whose value is at
//! least 1 and prints one decimal place; plain bytes print as an integer.

use crate::error::{Result, WastearrError};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const STEP: f64 = 1024.0;

/// Format a byte count, e.g. `5368709120` → `"5.0 GB"`
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    // 1023.96 KB would print as "1024.0 KB"
    if (value * 10.0).round() / 10.0 >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Parse a size such as `12M`, `3GB`, `1.5 gb` or `500` (bytes)
pub fn parse_size(s: &str) -> Result<u64> {
    let trimmed = s.trim();
    let invalid = || {
        WastearrError::InvalidArgument(format!(
            "Invalid size '{}'. Use a number with an optional unit: B, KB, MB, GB, TB (e.g. 500MB, 3GB)",
            s
        ))
    };

    let split_idx = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (num_str, unit) = trimmed.split_at(split_idx);

    let number: f64 = num_str.parse().map_err(|_| invalid())?;
    if !number.is_finite() {
        return Err(invalid());
    }

    let exponent = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" => 1,
        "M" | "MB" => 2,
        "G" | "GB" => 3,
        "T" | "TB" => 4,
        _ => return Err(invalid()),
    };

    let bytes = number * STEP.powi(exponent);
    if bytes > u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(bytes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    // ─────────────────────────────────────────────────────────────────────────
    // format_size Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_format_five_gib() {
        assert_eq!(format_size(5_368_709_120), "5.0 GB");
    }

    #[test]
    fn test_format_bytes_without_decimals() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_switches_unit_at_boundary() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024 - 1), "1.0 MB");
        assert_eq!(format_size(1023 * 1024), "1023.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1536 * 1024 * 1024), "1.5 GB");
    }

    #[test]
    fn test_format_caps_at_terabytes() {
        assert_eq!(format_size(3 * 1024 * GIB), "3.0 TB");
        assert_eq!(format_size(2048 * 1024 * GIB), "2048.0 TB");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // parse_size Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_size("500").unwrap(), 500);
        assert_eq!(parse_size("500B").unwrap(), 500);
        assert_eq!(parse_size("2KB").unwrap(), 2048);
        assert_eq!(parse_size("12M").unwrap(), 12 * 1024 * 1024);
        assert_eq!(parse_size("3GB").unwrap(), 3 * GIB);
        assert_eq!(parse_size("1TB").unwrap(), 1024 * GIB);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(parse_size(" 2gb ").unwrap(), 2 * GIB);
        assert_eq!(parse_size("2 Gb").unwrap(), 2 * GIB);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_size("1.5GB").unwrap(), 3 * GIB / 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "GB", "abc", "12XB", "1.2.3GB", "-5GB", "5 PB"] {
            let err = parse_size(input).unwrap_err();
            assert!(
                matches!(err, WastearrError::InvalidArgument(_)),
                "{input:?} should be rejected"
            );
        }
    }
}
