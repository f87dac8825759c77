//! Track point and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speed limits per track point in km/h.
///
/// Same length and order as the input track. `None` means the limit could
/// not be determined.
pub type SpeedLimitResult = Vec<Option<u32>>;

/// A single GPS sample in a recorded track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the sample was recorded. Opaque to the pipeline.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackPoint {
    /// Create a track point without a timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: None,
        }
    }

    /// Create a track point with an explicit timestamp.
    pub fn with_timestamp(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Some(timestamp),
        }
    }

    /// Position as a (latitude, longitude) pair.
    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Whether both coordinates carry a usable value.
    ///
    /// GPS receivers report `0.0` for a missing fix, so zero and NaN on
    /// either axis mark the point as invalid.
    #[inline]
    pub fn has_fix(&self) -> bool {
        is_usable(self.latitude) && is_usable(self.longitude)
    }
}

#[inline]
fn is_usable(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}
