// Icon assets - decoded and scaled once at startup
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::presentation::icons::{required_icons, IconMask, IconSet};

/// Dark, opaque pixels become ink
fn to_mask(image: &DynamicImage, size: u32) -> IconMask {
    let scaled = image.resize_exact(size, size, FilterType::Triangle).to_luma_alpha8();
    let ink = scaled.pixels().map(|p| p.0[1] >= 128 && p.0[0] < 128).collect();
    IconMask::new(size, size, ink)
}

/// Load every icon the layouts use from `dir/<stem>.png`.
///
/// Missing or unreadable files are logged and left out; the layouts draw a placeholder for them.
pub fn load_icons(dir: &Path) -> IconSet {
    let mut icons = IconSet::new();
    for (asset, size) in required_icons() {
        let path = dir.join(format!("{}.png", asset.file_stem()));
        match image::open(&path) {
            Ok(image) => icons.insert(asset, size, to_mask(&image, size)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Icon unavailable"),
        }
    }
    tracing::info!(loaded = icons.len(), dir = %dir.display(), "Icons loaded");
    icons
}
