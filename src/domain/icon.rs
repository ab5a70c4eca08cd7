// Icon keys - provider condition keys mapped to display assets
use std::fmt;

/// Display icon set key; the asset file stem under the icon directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IconKey {
    Sun,
    Moon,
    Rain,
    Snow,
    Hail,
    Wind,
    Haze,
    Cloud,
    PartlySunny,
    PartlyMoon,
    /// Fallback for conditions the provider may add later
    #[default]
    Tornado,
}

impl IconKey {
    pub const ALL: [IconKey; 11] = [
        IconKey::Sun,
        IconKey::Moon,
        IconKey::Rain,
        IconKey::Snow,
        IconKey::Hail,
        IconKey::Wind,
        IconKey::Haze,
        IconKey::Cloud,
        IconKey::PartlySunny,
        IconKey::PartlyMoon,
        IconKey::Tornado,
    ];

    /// Map a provider condition key (`clear-day`, `rain`, ...) to its icon.
    ///
    /// Unknown keys map to [`IconKey::Tornado`] and log a warning.
    pub fn from_condition(condition: &str) -> Self {
        match Self::lookup(condition) {
            Some(icon) => icon,
            None => {
                tracing::warn!("No icon for condition {:?}, using fallback", condition);
                IconKey::Tornado
            }
        }
    }

    /// Strict lookup without the fallback
    pub fn lookup(condition: &str) -> Option<Self> {
        match condition {
            "clear-day" => Some(IconKey::Sun),
            "clear-night" => Some(IconKey::Moon),
            "rain" => Some(IconKey::Rain),
            "snow" => Some(IconKey::Snow),
            "sleet" => Some(IconKey::Hail),
            "wind" => Some(IconKey::Wind),
            "fog" => Some(IconKey::Haze),
            "cloudy" => Some(IconKey::Cloud),
            "partly-cloudy-day" => Some(IconKey::PartlySunny),
            "partly-cloudy-night" => Some(IconKey::PartlyMoon),
            _ => None,
        }
    }

    pub fn asset_name(self) -> &'static str {
        match self {
            IconKey::Sun => "Sun",
            IconKey::Moon => "Moon",
            IconKey::Rain => "Rain",
            IconKey::Snow => "Snow",
            IconKey::Hail => "Hail",
            IconKey::Wind => "wind",
            IconKey::Haze => "Haze",
            IconKey::Cloud => "Cloud",
            IconKey::PartlySunny => "PartlySunny",
            IconKey::PartlyMoon => "PartlyMoon",
            IconKey::Tornado => "Tornado",
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_known_conditions() {
        let cases = [
            ("clear-day", "Sun"),
            ("clear-night", "Moon"),
            ("rain", "Rain"),
            ("snow", "Snow"),
            ("sleet", "Hail"),
            ("wind", "wind"),
            ("fog", "Haze"),
            ("cloudy", "Cloud"),
            ("partly-cloudy-day", "PartlySunny"),
            ("partly-cloudy-night", "PartlyMoon"),
        ];
        for (condition, asset) in cases {
            assert_eq!(IconKey::from_condition(condition).asset_name(), asset);
        }
    }

    #[test]
    fn test_mapping_is_one_to_one() {
        let conditions = [
            "clear-day",
            "clear-night",
            "rain",
            "snow",
            "sleet",
            "wind",
            "fog",
            "cloudy",
            "partly-cloudy-day",
            "partly-cloudy-night",
        ];
        let mut icons: Vec<IconKey> = conditions.iter().map(|c| IconKey::from_condition(c)).collect();
        icons.sort_by_key(|i| i.asset_name());
        icons.dedup();
        assert_eq!(icons.len(), conditions.len());
        assert!(!icons.contains(&IconKey::Tornado));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unknown_condition_falls_back() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(IconKey::from_condition("hail"), IconKey::Tornado);
            assert_eq!(IconKey::from_condition("clear-day"), IconKey::Sun);
        });

        let output = log.text();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("\"hail\""), "{}", output);
        assert_eq!(output.lines().count(), 1, "{}", output);

        assert_eq!(IconKey::from_condition(""), IconKey::Tornado);
        assert_eq!(IconKey::lookup("thunderstorm"), None);
    }
}
