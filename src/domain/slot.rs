// Frame slots - the three independently rendered layouts
use std::fmt;
use std::str::FromStr;

use super::options::UnknownOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// frame1: big icon, temperature, today's range, wind
    Overview,
    /// frame2: date/time, sun times, metric row
    Compact,
    /// frame3: four-day outlook
    Outlook,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Overview, Slot::Compact, Slot::Outlook];

    pub fn number(self) -> u8 {
        match self {
            Slot::Overview => 1,
            Slot::Compact => 2,
            Slot::Outlook => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Slot::ALL.into_iter().find(|s| s.number() == number)
    }

    /// Bitmap file name inside the frame directory
    pub fn file_name(self) -> String {
        format!("{}.bmp", self)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame{}", self.number())
    }
}

impl FromStr for Slot {
    type Err = UnknownOption;

    /// Accepts `1`, `frame1`, `overview` and so on
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let number = wanted.strip_prefix("frame").unwrap_or(&wanted);
        if let Some(slot) = number.parse::<u8>().ok().and_then(Slot::from_number) {
            return Ok(slot);
        }
        match wanted.as_str() {
            "overview" => Ok(Slot::Overview),
            "compact" => Ok(Slot::Compact),
            "outlook" => Ok(Slot::Outlook),
            _ => Err(UnknownOption {
                kind: "frame slot",
                value: s.to_string(),
            }),
        }
    }
}
