// Compass point domain model - wind bearing bucketing
use std::fmt;

/// 8-point compass rose used for wind direction labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Classify a bearing in degrees.
    ///
    /// The bearing is truncated to whole degrees and normalized into
    /// `[0, 360)`. Buckets are half-open with exclusive upper bounds
    /// (N < 23, NE < 68, E < 113, SE < 158, S < 203, SW < 248, W < 293,
    /// NW < 338) and N also covers `[338, 360)`.
    /// Returns `None` for NaN or infinite input.
    pub fn from_bearing(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let whole = (degrees.trunc() as i64).rem_euclid(360);

        let point = match whole {
            0..=22 | 338..=359 => CompassPoint::N,
            23..=67 => CompassPoint::NE,
            68..=112 => CompassPoint::E,
            113..=157 => CompassPoint::SE,
            158..=202 => CompassPoint::S,
            203..=247 => CompassPoint::SW,
            248..=292 => CompassPoint::W,
            _ => CompassPoint::NW,
        };
        Some(point)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for an optional bearing; empty when the bearing is missing or not a number
pub fn wind_direction(bearing: Option<f64>) -> String {
    bearing
        .and_then(CompassPoint::from_bearing)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Label for a bearing given as free text (config overrides, raw feed values)
pub fn wind_direction_text(raw: &str) -> String {
    wind_direction(raw.trim().parse::<f64>().ok())
}
