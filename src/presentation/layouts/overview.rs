// Overview layout (frame1) - the frame pushed to the panel every cycle
use chrono::NaiveDateTime;

use super::*;
use crate::domain::view_model::WeatherViewModel;
use crate::presentation::icons::{Asset, CONDITION_LARGE, METRIC_SIZE, PRECIP_SIZE};
use crate::presentation::text::wrap_text;

pub fn draw(frame: &mut Frame, ctx: &ComposerContext, view: &WeatherViewModel, now: NaiveDateTime) {
    let fonts = &ctx.fonts;
    let text_x = COND_SIZE + BORDER * 2;

    // 1. Condition icon + current temperature
    draw::icon(frame, &ctx.icons, Asset::Condition(view.condition), CONDITION_LARGE, 0, 0);
    draw::text(
        frame,
        &view.current_temp_text(),
        text_x,
        0,
        fonts.extra_big,
    );

    // 2. Condition text, at most two lines
    let rows = wrap_text(&view.condition_text, CONDITION_WRAP, MAX_TEXT_LINES);
    if let Some(first) = rows.first() {
        draw::text(frame, first, text_x, 55, fonts.big);
    }
    if let Some(second) = rows.get(1) {
        draw::text(frame, second, text_x, 75, fonts.big);
    }

    // 3. Today's range
    let range_x = BORDER + 30 + BORDER * 2;
    draw::icon(frame, &ctx.icons, Asset::Temperature, METRIC_SIZE, BORDER * 3, 115);
    draw::text(
        frame,
        &format!("{}{}", view.temp_min, view.temperature_label()),
        range_x,
        7 * ROW_HEIGHT - 4,
        fonts.medium,
    );
    draw::text(
        frame,
        &format!("{}{}", view.temp_max, view.temperature_label()),
        range_x,
        8 * ROW_HEIGHT - 4,
        fonts.medium,
    );

    // 4. Precipitation chance
    draw::icon(frame, &ctx.icons, Asset::Precipitation, PRECIP_SIZE, COLUMN1_5, 115);
    draw::text(frame, &format!("{}%", view.precip), COLUMN1_5 + 35, 117, fonts.medium);

    // 5. Wind
    draw::wind_arrow(frame, view.wind_bearing, METRIC_SIZE, COLUMN2_5, 115);
    draw::text(frame, &view.wind_dir_text, COLUMN2_5 + 35, 117, fonts.medium);
    draw::text(frame, &view.wind_speed_text(), COLUMN2_5, 142, fonts.medium);

    // 6. Rules
    let width = frame.width() as i32;
    draw::line(frame, COND_SIZE, 50, width, 50);
    draw::line(frame, 0, COND_SIZE, width, COND_SIZE);
    draw::line(frame, 0, FOOTER_RULE_Y, width, FOOTER_RULE_Y);
    draw::line(frame, COND_SIZE, 0, COND_SIZE, COND_SIZE);

    footer(frame, ctx, &view.battery, now);
}
