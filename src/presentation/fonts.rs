// Font set for the layouts - monospaced bitmap fonts in one 8-bit charset
use std::str::FromStr;

use embedded_graphics::mono_font::{iso_8859_1, iso_8859_2, MonoFont};

use crate::domain::options::UnknownOption;

/// 8-bit character set of the bitmap fonts; pick the one covering the summary language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontCharset {
    /// Western European
    #[default]
    Latin1,
    /// Central European (ő, ű, č, ł, ...)
    Latin2,
}

impl FromStr for FontCharset {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin1" | "iso-8859-1" | "iso8859-1" => Ok(FontCharset::Latin1),
            "latin2" | "iso-8859-2" | "iso8859-2" => Ok(FontCharset::Latin2),
            _ => Err(UnknownOption {
                kind: "font charset",
                value: s.to_string(),
            }),
        }
    }
}

/// The five sizes the layouts use, smallest to largest
#[derive(Clone, Copy)]
pub struct FontSet {
    pub extra_small: &'static MonoFont<'static>,
    pub small: &'static MonoFont<'static>,
    pub medium: &'static MonoFont<'static>,
    pub big: &'static MonoFont<'static>,
    pub extra_big: &'static MonoFont<'static>,
}

impl FontSet {
    pub fn new(charset: FontCharset) -> Self {
        match charset {
            FontCharset::Latin1 => Self {
                extra_small: &iso_8859_1::FONT_6X10,
                small: &iso_8859_1::FONT_6X13_BOLD,
                medium: &iso_8859_1::FONT_7X14_BOLD,
                big: &iso_8859_1::FONT_9X18_BOLD,
                extra_big: &iso_8859_1::FONT_10X20,
            },
            FontCharset::Latin2 => Self {
                extra_small: &iso_8859_2::FONT_6X10,
                small: &iso_8859_2::FONT_6X13_BOLD,
                medium: &iso_8859_2::FONT_7X14_BOLD,
                big: &iso_8859_2::FONT_9X18_BOLD,
                extra_big: &iso_8859_2::FONT_10X20,
            },
        }
    }

    /// Line height of the big font; the outlook title bar is sized from it
    pub fn big_height(&self) -> i32 {
        self.big.character_size.height as i32
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("big", &self.big.character_size)
            .finish_non_exhaustive()
    }
}
