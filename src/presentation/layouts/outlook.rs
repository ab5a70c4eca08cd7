// Outlook layout (frame3) - title bar and four daily columns
use chrono::{Days, NaiveDateTime, NaiveTime};

use super::*;
use crate::domain::view_model::WeatherViewModel;
use crate::presentation::icons::{Asset, CONDITION_SMALL};
use crate::presentation::text::wrap_text;

/// Left edge of each daily column
pub const COLUMNS: [i32; 4] = [0, COLUMN1, COLUMN2, COLUMN3];
const SUMMARY_WRAP: usize = 10;

pub fn draw(frame: &mut Frame, ctx: &ComposerContext, view: &WeatherViewModel, now: NaiveDateTime) {
    let fonts = &ctx.fonts;
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    let header = 2 * BORDER + fonts.big_height();

    draw::text(frame, &ctx.forecast_title, BORDER, 0, fonts.big);
    draw::line(frame, 0, header, width, header);
    draw::line(frame, COLUMN1, header, COLUMN1, height - 15);
    draw::line(frame, COLUMN2, header, COLUMN2, height - 20);
    draw::line(frame, COLUMN3, header, COLUMN3, height - 20);
    draw::line(frame, 0, height - 15, width, height - 15);

    for (offset, (day, column)) in view.days.iter().zip(COLUMNS).enumerate() {
        let x = column + BORDER;
        draw::text(
            frame,
            &weekday_name(ctx, now, offset as u64),
            x,
            3 * BORDER + fonts.big_height(),
            fonts.small,
        );
        draw::icon(
            frame,
            &ctx.icons,
            Asset::Condition(day.condition),
            CONDITION_SMALL,
            x,
            5 * BORDER + fonts.big_height(),
        );

        match wrap_text(&day.condition_text, SUMMARY_WRAP, MAX_TEXT_LINES).as_slice() {
            [] => {}
            [single] => draw::text(frame, single, x, 6 * ROW_HEIGHT + 3, fonts.extra_small),
            [first, second, ..] => {
                draw::text(frame, first, x, 5 * ROW_HEIGHT + 3, fonts.extra_small);
                draw::text(frame, second, x, 6 * ROW_HEIGHT + 2, fonts.extra_small);
            }
        }

        let label = view.temperature_label();
        draw::text(frame, &format!("{}{}", day.temp_min, label), x, 7 * ROW_HEIGHT + 1, fonts.medium);
        draw::text(frame, &format!("{}{}", day.temp_max, label), x, 8 * ROW_HEIGHT + 2, fonts.medium);
    }

    footer(frame, ctx, &view.battery, now);
}

/// Localized weekday of `now + offset` days
fn weekday_name(ctx: &ComposerContext, now: NaiveDateTime, offset: u64) -> String {
    let date = now.date().checked_add_days(Days::new(offset)).unwrap_or(now.date());
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%A", ctx.locale)
        .to_string()
}
