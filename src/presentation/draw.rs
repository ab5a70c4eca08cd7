// Drawing helpers shared by the layouts
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle},
    text::{Baseline, Text},
};

use super::frame::Frame;
use super::icons::{Asset, IconSet};

/// Text with its top-left corner at `(x, y)`
pub fn text(frame: &mut Frame, content: &str, x: i32, y: i32, font: &MonoFont<'_>) {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    Text::with_baseline(content, Point::new(x, y), style, Baseline::Top)
        .draw(frame)
        .ok();
}

/// One-pixel ruled line between two points
pub fn line(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
    Line::new(Point::new(x0, y0), Point::new(x1, y1))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(frame)
        .ok();
}

/// Paint an icon's ink at `(x, y)`; white areas of the icon leave the frame untouched.
///
/// A missing icon is drawn as a crossed box of the same size.
pub fn icon(frame: &mut Frame, icons: &IconSet, asset: Asset, size: u32, x: i32, y: i32) {
    match icons.get(asset, size) {
        Some(mask) => {
            let pixels = (0..mask.height()).flat_map(|my| {
                (0..mask.width()).filter_map(move |mx| {
                    mask.is_ink(mx, my).then(|| {
                        Pixel(Point::new(x + mx as i32, y + my as i32), BinaryColor::On)
                    })
                })
            });
            frame.draw_iter(pixels).ok();
        }
        None => placeholder(frame, x, y, size),
    }
}

fn placeholder(frame: &mut Frame, x: i32, y: i32, size: u32) {
    let edge = size as i32 - 1;
    Rectangle::new(Point::new(x, y), Size::new(size, size))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(frame)
        .ok();
    line(frame, x, y, x + edge, y + edge);
    line(frame, x, y + edge, x + edge, y);
}

/// Arrow in a `size` box pointing downwind for a meteorological bearing
/// (the direction the wind comes from, clockwise from north).
/// Without a bearing a small ring is drawn instead.
pub fn wind_arrow(frame: &mut Frame, bearing: Option<f64>, size: u32, x: i32, y: i32) {
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 2);
    let half = size as f64 / 2.0;
    let (cx, cy) = (x as f64 + half, y as f64 + half);

    let Some(bearing) = bearing.filter(|b| b.is_finite()) else {
        let diameter = size / 2;
        Circle::with_center(Point::new(cx.round() as i32, cy.round() as i32), diameter)
            .into_styled(stroke)
            .draw(frame)
            .ok();
        return;
    };

    let theta = (bearing + 180.0).to_radians();
    let (vx, vy) = (theta.sin(), -theta.cos());
    let (px, py) = (-vy, vx);
    let reach = half - 2.0;
    let head_len = half * 0.7;
    let head_half_width = half * 0.45;

    let point = |fx: f64, fy: f64| Point::new(fx.round() as i32, fy.round() as i32);
    let tip = (cx + vx * reach, cy + vy * reach);
    let tail = point(cx - vx * reach, cy - vy * reach);
    let base = (tip.0 - vx * head_len, tip.1 - vy * head_len);

    Line::new(tail, point(base.0, base.1))
        .into_styled(stroke)
        .draw(frame)
        .ok();
    Triangle::new(
        point(tip.0, tip.1),
        point(base.0 + px * head_half_width, base.1 + py * head_half_width),
        point(base.0 - px * head_half_width, base.1 - py * head_half_width),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(frame)
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::icons::IconMask;

    #[test]
    fn test_icon_pastes_only_ink() {
        let mut icons = IconSet::new();
        icons.insert(Asset::Humidity, 2, IconMask::new(2, 2, vec![true, false, false, false]));
        let mut frame = Frame::blank(8, 8);
        frame.set_black(4, 3, true);

        icon(&mut frame, &icons, Asset::Humidity, 2, 3, 3);
        assert!(frame.is_black(3, 3));
        assert!(frame.is_black(4, 3));
        assert_eq!(frame.black_pixel_count(), 2);
    }

    #[test]
    fn test_missing_icon_draws_placeholder() {
        let mut frame = Frame::blank(32, 32);
        icon(&mut frame, &IconSet::new(), Asset::Sunset, 25, 0, 0);
        assert!(frame.is_black(0, 0));
        assert!(frame.is_black(24, 24));
        assert!(frame.is_black(12, 12));
        assert!(!frame.is_black(26, 26));
    }

    #[test]
    fn test_wind_arrow_points_downwind() {
        // Northerly wind blows south: the head sits in the lower half
        let mut frame = Frame::blank(25, 25);
        wind_arrow(&mut frame, Some(0.0), 25, 0, 0);
        let upper: usize = (0..12).map(|y| (0..25).filter(|&x| frame.is_black(x, y)).count()).sum();
        let lower: usize = (13..25).map(|y| (0..25).filter(|&x| frame.is_black(x, y)).count()).sum();
        assert!(lower > upper, "upper {} lower {}", upper, lower);
    }

    #[test]
    fn test_text_draws_ink() {
        let mut frame = Frame::blank(40, 20);
        text(&mut frame, "N", 0, 0, &embedded_graphics::mono_font::ascii::FONT_6X10);
        assert!(frame.black_pixel_count() > 0);
    }
}
