//! Human-readable size parsing (e.g., "10MB", "512KB").

use thiserror::Error;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '10MB', '512KB', or '1048576'")]
pub struct SizeParseError {
    input: String,
}

impl SizeParseError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Parse a human-readable size string into bytes.
///
/// Supports bare numbers (bytes) and case-insensitive `KB`/`K`, `MB`/`M`
/// and `GB`/`G` suffixes with optional whitespace.
///
/// # Examples
///
/// ```
/// use trackspeed::config::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1 KB").unwrap(), 1024);
/// assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let trimmed = s.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (number, multiplier) = [("GB", GB), ("G", GB), ("MB", MB), ("M", MB), ("KB", KB), ("K", KB)]
        .iter()
        .find_map(|(suffix, mult)| {
            upper
                .strip_suffix(suffix)
                .map(|n| (n.trim().to_string(), *mult))
        })
        .unwrap_or_else(|| (upper.clone(), 1));

    let value: u64 = number.parse().map_err(|_| SizeParseError::new(s))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| SizeParseError::new(s))
}

/// Format a byte count as a human-readable string.
///
/// ```
/// use trackspeed::config::format_size;
///
/// assert_eq!(format_size(1024), "1KB");
/// assert_eq!(format_size(10 * 1024 * 1024), "10MB");
/// assert_eq!(format_size(1500), "1500B");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes >= GB && bytes % GB == 0 {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_size("512KB").unwrap(), 512 * KB);
        assert_eq!(parse_size("512k").unwrap(), 512 * KB);
        assert_eq!(parse_size("2 GB").unwrap(), 2 * GB);
        assert_eq!(parse_size(" 7M ").unwrap(), 7 * MB);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-1MB").is_err());
        assert!(parse_size("1.5GB").is_err());
    }

    #[test]
    fn test_format_uses_largest_exact_unit() {
        assert_eq!(format_size(4 * GB), "4GB");
        assert_eq!(format_size(GB + MB), "1025MB");
        assert_eq!(format_size(0), "0B");
    }
}
