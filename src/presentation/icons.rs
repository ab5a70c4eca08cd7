// Pre-scaled icon masks, loaded once and shared by every layout
use std::collections::HashMap;

use crate::domain::icon::IconKey;

/// Artwork drawn by the layouts; the condition icons plus the metric pictograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Condition(IconKey),
    Temperature,
    Humidity,
    Pressure,
    Sunrise,
    Sunset,
    Precipitation,
}

impl Asset {
    /// File stem under the icon directory
    pub fn file_stem(self) -> &'static str {
        match self {
            Asset::Condition(key) => key.asset_name(),
            Asset::Temperature => "temperature",
            Asset::Humidity => "humidity",
            Asset::Pressure => "pressure",
            Asset::Sunrise => "sunrise",
            Asset::Sunset => "sunset",
            Asset::Precipitation => "Rain",
        }
    }
}

/// Square icon edge lengths used by the layouts
pub const CONDITION_LARGE: u32 = 100;
pub const CONDITION_SMALL: u32 = 50;
pub const METRIC_SIZE: u32 = 25;
pub const PRECIP_SIZE: u32 = 35;

/// Every (asset, size) pair some layout draws
pub fn required_icons() -> Vec<(Asset, u32)> {
    let mut icons: Vec<(Asset, u32)> = IconKey::ALL
        .iter()
        .flat_map(|key| {
            [
                (Asset::Condition(*key), CONDITION_LARGE),
                (Asset::Condition(*key), CONDITION_SMALL),
            ]
        })
        .collect();
    icons.extend([
        (Asset::Temperature, METRIC_SIZE),
        (Asset::Humidity, METRIC_SIZE),
        (Asset::Pressure, METRIC_SIZE),
        (Asset::Sunrise, METRIC_SIZE),
        (Asset::Sunset, METRIC_SIZE),
        (Asset::Precipitation, PRECIP_SIZE),
    ]);
    icons
}

/// Ink mask of one scaled icon; `true` marks a pixel to paint black
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl IconMask {
    pub fn new(width: u32, height: u32, ink: Vec<bool>) -> Self {
        debug_assert_eq!(ink.len(), (width * height) as usize);
        Self { width, height, ink }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.ink[(y * self.width + x) as usize]
    }
}

#[derive(Debug, Clone, Default)]
pub struct IconSet {
    masks: HashMap<(Asset, u32), IconMask>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: Asset, size: u32, mask: IconMask) {
        self.masks.insert((asset, size), mask);
    }

    pub fn get(&self, asset: Asset, size: u32) -> Option<&IconMask> {
        self.masks.get(&(asset, size))
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_icons_cover_every_condition() {
        let icons = required_icons();
        for key in IconKey::ALL {
            assert!(icons.contains(&(Asset::Condition(key), CONDITION_LARGE)));
            assert!(icons.contains(&(Asset::Condition(key), CONDITION_SMALL)));
        }
        assert!(icons.contains(&(Asset::Precipitation, PRECIP_SIZE)));
    }

    #[test]
    fn test_mask_lookup() {
        let mut set = IconSet::new();
        set.insert(Asset::Sunrise, 2, IconMask::new(2, 2, vec![true, false, false, true]));
        let mask = set.get(Asset::Sunrise, 2).unwrap();
        assert!(mask.is_ink(0, 0));
        assert!(!mask.is_ink(1, 0));
        assert!(!mask.is_ink(5, 5));
        assert!(set.get(Asset::Sunset, 2).is_none());
    }
}
