//! Speed unit normalization.

use std::fmt;

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Unit attached to a provider speed limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Kilometres per hour.
    Kmph,
    /// Miles per hour.
    Mph,
    /// Any other unit string; values pass through unchanged.
    Other(String),
}

impl SpeedUnit {
    /// Parse a provider unit string, case-insensitively.
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_lowercase().as_str() {
            "kmph" | "kph" | "km/h" | "kmh" => SpeedUnit::Kmph,
            "mph" => SpeedUnit::Mph,
            _ => SpeedUnit::Other(unit.to_string()),
        }
    }

    /// Convert a limit in this unit to whole km/h.
    ///
    /// Miles per hour are scaled and rounded to the nearest integer; other
    /// units are only rounded. Negative and non-finite values yield `None`.
    pub fn to_kmh(&self, value: f64) -> Option<u32> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }

        let kmh = match self {
            SpeedUnit::Mph => value * KM_PER_MILE,
            SpeedUnit::Kmph | SpeedUnit::Other(_) => value,
        };

        let rounded = kmh.round();
        (rounded <= u32::MAX as f64).then_some(rounded as u32)
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::Kmph => write!(f, "kmph"),
            SpeedUnit::Mph => write!(f, "mph"),
            SpeedUnit::Other(unit) => write!(f, "{}", unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(SpeedUnit::parse("MPH"), SpeedUnit::Mph);
        assert_eq!(SpeedUnit::parse("mph"), SpeedUnit::Mph);
        assert_eq!(SpeedUnit::parse("KMPH"), SpeedUnit::Kmph);
        assert_eq!(SpeedUnit::parse("kmph"), SpeedUnit::Kmph);
        assert_eq!(
            SpeedUnit::parse("knots"),
            SpeedUnit::Other("knots".to_string())
        );
    }

    #[test]
    fn test_mph_converted_and_rounded() {
        // 60 × 1.60934 = 96.56
        assert_eq!(SpeedUnit::Mph.to_kmh(60.0), Some(97));
        // 25 × 1.60934 = 40.23
        assert_eq!(SpeedUnit::Mph.to_kmh(25.0), Some(40));
    }

    #[test]
    fn test_kmph_passes_through() {
        assert_eq!(SpeedUnit::Kmph.to_kmh(50.0), Some(50));
        assert_eq!(SpeedUnit::Other("knots".into()).to_kmh(20.0), Some(20));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(SpeedUnit::Kmph.to_kmh(-5.0), None);
        assert_eq!(SpeedUnit::Kmph.to_kmh(f64::NAN), None);
        assert_eq!(SpeedUnit::Mph.to_kmh(f64::INFINITY), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SpeedUnit::Mph.to_string(), "mph");
        assert_eq!(SpeedUnit::Other("knots".into()).to_string(), "knots");
    }
}
