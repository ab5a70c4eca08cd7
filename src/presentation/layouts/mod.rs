// Fixed pixel layouts for the three frame slots
pub mod compact;
pub mod outlook;
pub mod overview;

use chrono::NaiveDateTime;

use super::composer::ComposerContext;
use super::draw;
use super::frame::{Frame, FRAME_HEIGHT};

// ── Shared geometry (landscape 264x176) ─────────────────────────────

pub const COND_SIZE: i32 = 100;
pub const BORDER: i32 = 5;
pub const COLUMN1: i32 = 70;
pub const COLUMN1_5: i32 = 115;
pub const COLUMN2: i32 = 132;
pub const COLUMN2_5: i32 = 200;
pub const COLUMN3: i32 = 198;
pub const ROW_HEIGHT: i32 = 16;

/// Ruled line above the footer
pub const FOOTER_RULE_Y: i32 = 160;
const FOOTER_Y: i32 = FRAME_HEIGHT as i32 - 14;

/// Condition text is wrapped at this many characters, two lines at most
pub const CONDITION_WRAP: usize = 14;
pub const MAX_TEXT_LINES: usize = 2;

/// Refresh timestamp at the left, battery voltage at the right
pub fn footer(frame: &mut Frame, ctx: &ComposerContext, battery: &str, now: NaiveDateTime) {
    let stamp = now.format("%Y-%m-%d %H:%M").to_string();
    draw::text(frame, &stamp, BORDER, FOOTER_Y, ctx.fonts.small);
    draw::text(
        frame,
        &format!("BAT: {}V", battery),
        COLUMN3 - BORDER * 2,
        FOOTER_Y,
        ctx.fonts.small,
    );
}
