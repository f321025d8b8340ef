use std::f64::consts::PI;
use std::io::Write;

use anyhow::Result;
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::route_vector::{Route, TrackPoint};

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

const CANVAS_PADDING: f64 = 48.0;
const MARKER_SIZE: i64 = 20;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PATH_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MARKER_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MARKER_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Renders a route onto a fixed-size canvas: the path as a polyline and
/// a numbered marker box at every retained waypoint.
pub fn render_route(route: &Route) -> Result<RgbaImage> {
    if route.is_empty() {
        bail!("cannot render an empty route");
    }

    let projected = project_to_canvas(&route.points);
    let mut image = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

    for segment in projected.windows(2) {
        let (x0, y0) = segment[0];
        let (x1, y1) = segment[1];
        draw_line(&mut image, x0, y0, x1, y1);
    }
    for (i, (x, y)) in projected.iter().enumerate() {
        draw_marker(&mut image, *x, *y, i);
    }

    Ok(image)
}

/// Renders `route` and PNG-encodes it into `writer`.
pub fn write_png(writer: impl Write, route: &Route) -> Result<()> {
    let image = render_route(route)?;
    PngEncoder::new(writer).write_image(
        image.as_raw(),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

// https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames
fn lng_lat_to_world(lng: f64, lat: f64) -> (f64, f64) {
    let lat_rad = (lat / 180.0) * PI;
    let x = (lng + 180.0) / 360.0;
    let y = (1.0 - ((lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI)) / 2.0;
    (x, y)
}

/// Projects the points into Web Mercator and fits the bounding box onto
/// the canvas, preserving aspect ratio and centering the result.
fn project_to_canvas(points: &[TrackPoint]) -> Vec<(i64, i64)> {
    let world: Vec<(f64, f64)> = points
        .iter()
        .map(|p| lng_lat_to_world(p.longitude, p.latitude))
        .collect();

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for (x, y) in &world {
        min_x = min_x.min(*x);
        min_y = min_y.min(*y);
        max_x = max_x.max(*x);
        max_y = max_y.max(*y);
    }

    // A single point or a perfectly straight north-south run has a
    // degenerate extent on one axis, floor both so the fit stays finite.
    let extent_x = (max_x - min_x).max(1e-12);
    let extent_y = (max_y - min_y).max(1e-12);

    let usable_width = CANVAS_WIDTH as f64 - 2.0 * CANVAS_PADDING;
    let usable_height = CANVAS_HEIGHT as f64 - 2.0 * CANVAS_PADDING;
    let scale = (usable_width / extent_x).min(usable_height / extent_y);

    let offset_x = (CANVAS_WIDTH as f64 - extent_x * scale) / 2.0;
    let offset_y = (CANVAS_HEIGHT as f64 - extent_y * scale) / 2.0;

    world
        .iter()
        .map(|(x, y)| {
            let px = (x - min_x) * scale + offset_x;
            let py = (y - min_y) * scale + offset_y;
            (px.round() as i64, py.round() as i64)
        })
        .collect()
}

fn put_pixel(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && x < image.width() as i64 && y >= 0 && y < image.height() as i64 {
        image.put_pixel(x as u32, y as u32, color);
    }
}

// Integer Bresenham over all quadrants.
fn draw_line(image: &mut RgbaImage, mut x0: i64, mut y0: i64, x1: i64, y1: i64) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(image, x0, y0, PATH_COLOR);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

// 3x5 digit glyphs, one row per bit triple, most significant bit left.
const DIGIT_GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

const GLYPH_SCALE: i64 = 2;
const GLYPH_WIDTH: i64 = 3 * GLYPH_SCALE;
const GLYPH_HEIGHT: i64 = 5 * GLYPH_SCALE;
const GLYPH_GAP: i64 = GLYPH_SCALE;

/// Draws a filled box centered on the waypoint with its ordinal in
/// white, mirroring the numbered markers of the original map preview.
fn draw_marker(image: &mut RgbaImage, x: i64, y: i64, ordinal: usize) {
    let half = MARKER_SIZE / 2;
    for px in (x - half)..(x + half) {
        for py in (y - half)..(y + half) {
            put_pixel(image, px, py, MARKER_COLOR);
        }
    }

    let digits: Vec<usize> = ordinal
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let text_width = digits.len() as i64 * GLYPH_WIDTH + (digits.len() as i64 - 1) * GLYPH_GAP;
    let mut cursor_x = x - text_width / 2;
    let top = y - GLYPH_HEIGHT / 2;

    for digit in digits {
        draw_digit(image, cursor_x, top, digit);
        cursor_x += GLYPH_WIDTH + GLYPH_GAP;
    }
}

fn draw_digit(image: &mut RgbaImage, left: i64, top: i64, digit: usize) {
    let glyph = DIGIT_GLYPHS[digit];
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..3i64 {
            if *bits & (0b100 >> col) == 0 {
                continue;
            }
            for dy in 0..GLYPH_SCALE {
                for dx in 0..GLYPH_SCALE {
                    put_pixel(
                        image,
                        left + col * GLYPH_SCALE + dx,
                        top + row as i64 * GLYPH_SCALE + dy,
                        MARKER_TEXT_COLOR,
                    );
                }
            }
        }
    }
}
