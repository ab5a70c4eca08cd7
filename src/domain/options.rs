// Provider request options - closed enums parsed from configuration strings
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Unit systems understood by DarkSky-compatible providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitSystem {
    Auto,
    /// Canada: °C, km/h
    Ca,
    /// UK: °C, mph
    Uk2,
    /// Imperial: °F, mph
    Us,
    /// Metric: °C, m/s
    #[default]
    Si,
}

impl UnitSystem {
    pub fn code(self) -> &'static str {
        match self {
            UnitSystem::Auto => "auto",
            UnitSystem::Ca => "ca",
            UnitSystem::Uk2 => "uk2",
            UnitSystem::Us => "us",
            UnitSystem::Si => "si",
        }
    }

    pub fn temperature_label(self) -> &'static str {
        match self {
            UnitSystem::Us => "°F",
            _ => "°C",
        }
    }

    pub fn wind_speed_label(self) -> &'static str {
        match self {
            UnitSystem::Ca => "km/h",
            UnitSystem::Uk2 | UnitSystem::Us => "mph",
            UnitSystem::Si | UnitSystem::Auto => "m/s",
        }
    }

    pub fn pressure_label(self) -> &'static str {
        "hPa"
    }
}

impl FromStr for UnitSystem {
    type Err = UnknownOption;

    /// Accepts the wire code (`si`) or the long name (`SI`, `US`, `UK2`, `CA`, `AUTO`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(UnitSystem::Auto),
            "ca" => Ok(UnitSystem::Ca),
            "uk2" | "uk" => Ok(UnitSystem::Uk2),
            "us" => Ok(UnitSystem::Us),
            "si" => Ok(UnitSystem::Si),
            _ => Err(UnknownOption {
                kind: "unit system",
                value: s.to_string(),
            }),
        }
    }
}

macro_rules! languages {
    ($( $variant:ident => ($code:literal, $name:literal) ),+ $(,)?) => {
        /// Summary languages understood by DarkSky-compatible providers
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Language {
            $( $variant, )+
        }

        impl Language {
            pub const ALL: &'static [Language] = &[ $( Language::$variant, )+ ];

            pub fn code(self) -> &'static str {
                match self {
                    $( Language::$variant => $code, )+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( Language::$variant => $name, )+
                }
            }
        }
    };
}

languages! {
    Arabic => ("ar", "ARABIC"),
    Azerbaijani => ("az", "AZERBAIJANI"),
    Belarusian => ("be", "BELARUSIAN"),
    Bulgarian => ("bg", "BULGARIAN"),
    Bengali => ("bn", "BENGALI"),
    Bosnian => ("bs", "BOSNIAN"),
    Catalan => ("ca", "CATALAN"),
    Czech => ("cs", "CZECH"),
    Danish => ("da", "DANISH"),
    German => ("de", "GERMAN"),
    Greek => ("el", "GREEK"),
    English => ("en", "ENGLISH"),
    Esperanto => ("eo", "ESPERANTO"),
    Spanish => ("es", "SPANISH"),
    Estonian => ("et", "ESTONIAN"),
    Finnish => ("fi", "FINNISH"),
    French => ("fr", "FRENCH"),
    Hebrew => ("he", "HEBREW"),
    Hindi => ("hi", "HINDI"),
    Croatian => ("hr", "CROATIAN"),
    Hungarian => ("hu", "HUNGARIAN"),
    Indonesian => ("id", "INDONESIAN"),
    Icelandic => ("is", "ICELANDIC"),
    Italian => ("it", "ITALIAN"),
    Japanese => ("ja", "JAPANESE"),
    Georgian => ("ka", "GEORGIAN"),
    Kannada => ("kn", "KANNADA"),
    Korean => ("ko", "KOREAN"),
    Cornish => ("kw", "CORNISH"),
    Latvian => ("lv", "LATVIAN"),
    Malayalam => ("ml", "MALAYALAM"),
    Marathi => ("mr", "MARATHI"),
    NorwegianBokmal => ("nb", "NORWEGIAN_BOKMAL"),
    Dutch => ("nl", "DUTCH"),
    Norwegian => ("no", "NORWEGIAN"),
    Punjabi => ("pa", "PUNJABI"),
    Polish => ("pl", "POLISH"),
    Portuguese => ("pt", "PORTUGUESE"),
    Romanian => ("ro", "ROMANIAN"),
    Russian => ("ru", "RUSSIAN"),
    Slovak => ("sk", "SLOVAK"),
    Slovenian => ("sl", "SLOVENIAN"),
    Serbian => ("sr", "SERBIAN"),
    Swedish => ("sv", "SWEDISH"),
    Tamil => ("ta", "TAMIL"),
    Telugu => ("te", "TELUGU"),
    Tetum => ("tet", "TETUM"),
    Turkish => ("tr", "TURKISH"),
    Ukrainian => ("uk", "UKRAINIAN"),
    Urdu => ("ur", "URDU"),
    IgpayAtinlay => ("x-pig-latin", "IGPAY_ATINLAY"),
    Chinese => ("zh", "SIMPLIFIED_CHINESE"),
    TraditionalChinese => ("zh-tw", "TRADITIONAL_CHINESE"),
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl FromStr for Language {
    type Err = UnknownOption;

    /// Accepts the wire code (`hu`) or the long name (`HUNGARIAN`), case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.code().eq_ignore_ascii_case(wanted) || l.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownOption {
                kind: "language",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_by_code_or_name() {
        assert_eq!("hu".parse::<Language>(), Ok(Language::Hungarian));
        assert_eq!("HUNGARIAN".parse::<Language>(), Ok(Language::Hungarian));
        assert_eq!(" zh-TW ".parse::<Language>(), Ok(Language::TraditionalChinese));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_unit_system_parse() {
        assert_eq!("SI".parse::<UnitSystem>(), Ok(UnitSystem::Si));
        assert_eq!("ca".parse::<UnitSystem>(), Ok(UnitSystem::Ca));
        assert!("SU".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(UnitSystem::Us.temperature_label(), "°F");
        assert_eq!(UnitSystem::Ca.wind_speed_label(), "km/h");
        assert_eq!(UnitSystem::Si.wind_speed_label(), "m/s");
    }
}
