// Telemetry domain model - latest sensor upload from the feed

/// Latest feed record; values are the feed's own text, not coerced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryReading {
    pub temperature: String,
    pub voltage: String,
    pub updated: String,
}

impl TelemetryReading {
    pub fn new(temperature: String, voltage: String, updated: String) -> Self {
        Self {
            temperature,
            voltage,
            updated,
        }
    }

    /// Zero-valued reading used when the feed cannot be read
    pub fn fallback() -> Self {
        Self::new("0".to_string(), "0".to_string(), "0".to_string())
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

impl Default for TelemetryReading {
    fn default() -> Self {
        Self::fallback()
    }
}

/// One sensor sample as uploaded by the sensor node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Degrees Celsius, one decimal
    pub temperature: f64,
    /// Volts, two decimals
    pub voltage: f64,
}

impl SensorSample {
    pub fn new(temperature: f64, voltage: f64) -> Self {
        Self {
            temperature: round_to(temperature, 1),
            voltage: round_to(voltage, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
