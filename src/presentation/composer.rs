// Frame composer - renders a view model into the three landscape frames
use chrono::{Locale, NaiveDateTime};

use super::fonts::FontSet;
use super::frame::Frame;
use super::icons::IconSet;
use super::layouts;
use crate::domain::slot::Slot;
use crate::domain::view_model::WeatherViewModel;

/// Everything the layouts need besides the per-cycle data
#[derive(Debug, Clone)]
pub struct ComposerContext {
    pub fonts: FontSet,
    pub icons: IconSet,
    pub locale: Locale,
    pub forecast_title: String,
}

/// Parse a POSIX locale name such as `hu_HU.UTF-8`; unknown names fall back to `POSIX`
pub fn parse_locale(name: &str) -> Locale {
    let base = name.split(['.', '@']).next().unwrap_or_default().trim();
    match Locale::try_from(base) {
        Ok(locale) => locale,
        Err(_) => {
            if !base.is_empty() {
                tracing::warn!(locale = %name, "unknown locale, weekday names fall back to POSIX");
            }
            Locale::POSIX
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameComposer {
    ctx: ComposerContext,
}

impl FrameComposer {
    pub fn new(ctx: ComposerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ComposerContext {
        &self.ctx
    }

    pub fn compose(&self, slot: Slot, view: &WeatherViewModel, now: NaiveDateTime) -> Frame {
        let mut frame = Frame::landscape();
        match slot {
            Slot::Overview => layouts::overview::draw(&mut frame, &self.ctx, view, now),
            Slot::Compact => layouts::compact::draw(&mut frame, &self.ctx, view, now),
            Slot::Outlook => layouts::outlook::draw(&mut frame, &self.ctx, view, now),
        }
        frame
    }

    /// All three slots, in slot order
    pub fn compose_all(&self, view: &WeatherViewModel, now: NaiveDateTime) -> Vec<(Slot, Frame)> {
        Slot::ALL
            .into_iter()
            .map(|slot| (slot, self.compose(slot, view, now)))
            .collect()
    }
}
