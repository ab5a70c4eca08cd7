// Compact layout (frame2) - date, sun times and a row of current metrics
use chrono::NaiveDateTime;

use super::*;
use crate::domain::view_model::WeatherViewModel;
use crate::presentation::icons::{Asset, CONDITION_LARGE, METRIC_SIZE};
use crate::presentation::text::wrap_text;

const METRIC_ICON_Y: i32 = 110;
const METRIC_TEXT_Y: i32 = 138;

pub fn draw(frame: &mut Frame, ctx: &ComposerContext, view: &WeatherViewModel, now: NaiveDateTime) {
    let fonts = &ctx.fonts;
    let text_x = COND_SIZE + BORDER * 2;

    draw::icon(frame, &ctx.icons, Asset::Condition(view.condition), CONDITION_LARGE, 0, 0);

    draw::text(frame, &now.format("%Y-%m-%d  %H:%M").to_string(), text_x, 2, fonts.medium);
    let rows = wrap_text(&view.condition_text, CONDITION_WRAP, MAX_TEXT_LINES);
    for (i, row) in rows.iter().enumerate() {
        draw::text(frame, row, text_x, 20 + 20 * i as i32, fonts.big);
    }

    // Sunrise / sunset
    draw::icon(frame, &ctx.icons, Asset::Sunrise, METRIC_SIZE, COND_SIZE + BORDER, 70);
    draw::text(frame, &view.sun_rise, 140, 77, fonts.small);
    draw::icon(frame, &ctx.icons, Asset::Sunset, METRIC_SIZE, 190, 70);
    draw::text(frame, &view.sun_set, 220, 77, fonts.small);

    // Metric row: temperature, humidity, pressure, wind
    draw::icon(frame, &ctx.icons, Asset::Temperature, METRIC_SIZE, BORDER, METRIC_ICON_Y);
    draw::text(
        frame,
        &view.current_temp_text(),
        BORDER,
        METRIC_TEXT_Y,
        fonts.medium,
    );

    draw::icon(frame, &ctx.icons, Asset::Humidity, METRIC_SIZE, COLUMN1, METRIC_ICON_Y);
    draw::text(frame, &format!("{}%", view.humidity), COLUMN1, METRIC_TEXT_Y, fonts.medium);

    draw::icon(frame, &ctx.icons, Asset::Pressure, METRIC_SIZE, COLUMN2, METRIC_ICON_Y);
    draw::text(
        frame,
        &format!("{}{}", view.pressure, view.units.pressure_label()),
        COLUMN2,
        METRIC_TEXT_Y,
        fonts.medium,
    );

    draw::wind_arrow(frame, view.wind_bearing, METRIC_SIZE, COLUMN3, METRIC_ICON_Y);
    draw::text(frame, &view.wind_dir_text, COLUMN3 + 35, METRIC_ICON_Y + 4, fonts.medium);
    draw::text(frame, &view.wind_speed_text(), COLUMN3, METRIC_TEXT_Y, fonts.medium);

    let width = frame.width() as i32;
    draw::line(frame, 0, COND_SIZE, width, COND_SIZE);
    draw::line(frame, 0, FOOTER_RULE_Y, width, FOOTER_RULE_Y);
    draw::line(frame, COND_SIZE, 0, COND_SIZE, COND_SIZE);

    footer(frame, ctx, &view.battery, now);
}
