use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::core::card::Card;
use crate::core::encoding::{ExtendedBcd, ROWS};

const CARD_WIDTH_IN: f32 = 7.375;
const CARD_HEIGHT_IN: f32 = 3.25;
pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;

/// Visual styles for PNG rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardImageStyle {
    /// Bare card stock with holes only.
    Plain,
    /// Holes plus the decoded text printed along the top edge.
    Interpreter,
}

/// Options controlling PNG generation.
#[derive(Debug, Clone, Copy)]
pub struct ImageRenderOptions {
    pub style: CardImageStyle,
    pub dpi: u32,
}

impl Default for ImageRenderOptions {
    fn default() -> Self {
        Self {
            style: CardImageStyle::Interpreter,
            dpi: 150,
        }
    }
}

struct Palette {
    card_bg: Rgba<u8>,
    grid: Rgba<u8>,
    hole: Rgba<u8>,
    text: Rgba<u8>,
    border: Rgba<u8>,
}

/// Draw `card` at real card proportions (7 3/8 by 3 1/4 inches).
pub fn render_card_image(card: &Card, options: &ImageRenderOptions) -> DynamicImage {
    let dpi = options.dpi.clamp(MIN_DPI, MAX_DPI);
    let palette = palette(options.style);

    let width = inches_to_px(CARD_WIDTH_IN, dpi);
    let height = inches_to_px(CARD_HEIGHT_IN, dpi);
    let dpi_f = dpi as f32;

    let margin_x = (0.18 * dpi_f).round() as i32;
    let margin_top = (0.55 * dpi_f).round() as i32;
    let margin_bottom = (0.35 * dpi_f).round() as i32;

    let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, palette.card_bg);
    draw_hollow_rect_mut(&mut img, Rect::at(0, 0).of_size(width, height), palette.border);

    let col_count = card.columns().len();
    let col_spacing = (width as f32 - 2.0 * margin_x as f32).max(1.0) / (col_count as f32 - 1.0);
    let row_spacing = (height as f32 - (margin_top + margin_bottom) as f32).max(1.0)
        / (ROWS as f32 - 1.0);
    let hole_radius = ((col_spacing.min(row_spacing) * 0.2).round() as i32).max(2);

    // field guides every ten columns
    for col in (0..=col_count).step_by(10) {
        let x = margin_x as f32 + col.min(col_count - 1) as f32 * col_spacing;
        draw_line_segment_mut(
            &mut img,
            (x, margin_top as f32),
            (x, (height as i32 - margin_bottom) as f32),
            palette.grid,
        );
    }

    for (col_idx, mask) in card.columns().iter().enumerate() {
        let center_x = (margin_x as f32 + col_idx as f32 * col_spacing).round() as i32;
        for row in mask.rows() {
            let center_y = (margin_top as f32 + row as f32 * row_spacing).round() as i32;
            draw_filled_circle_mut(&mut img, (center_x, center_y), hole_radius, palette.hole);
        }
    }

    if options.style == CardImageStyle::Interpreter {
        let scale = ((dpi_f / 120.0).ceil() as u32).max(2);
        let glyph_half_width = ((GLYPH_WIDTH as u32 * scale) as f32 / 2.0).round() as i32;
        let baseline = (margin_top as f32 - row_spacing * 0.85).round() as i32;
        for (col_idx, ch) in card.decode_with(&ExtendedBcd).chars().enumerate() {
            let center_x = (margin_x as f32 + col_idx as f32 * col_spacing).round() as i32;
            draw_glyph(&mut img, center_x - glyph_half_width, baseline, ch, palette.text, scale);
        }
    }

    DynamicImage::ImageRgba8(img)
}

fn inches_to_px(inches: f32, dpi: u32) -> u32 {
    (inches * dpi as f32).round() as u32
}

fn palette(style: CardImageStyle) -> Palette {
    match style {
        CardImageStyle::Plain => Palette {
            card_bg: Rgba([0xf4, 0xe8, 0xcc, 0xff]),
            grid: Rgba([0xd7, 0xc9, 0xa8, 0xff]),
            hole: Rgba([0x28, 0x24, 0x1f, 0xff]),
            text: Rgba([0x28, 0x24, 0x1f, 0xff]),
            border: Rgba([0x7d, 0x6b, 0x54, 0xff]),
        },
        CardImageStyle::Interpreter => Palette {
            card_bg: Rgba([0xf6, 0xe3, 0xc6, 0xff]),
            grid: Rgba([0xd1, 0xba, 0x9b, 0xff]),
            hole: Rgba([0x24, 0x22, 0x1d, 0xff]),
            text: Rgba([0x1f, 0x1b, 0x14, 0xff]),
            border: Rgba([0x86, 0x74, 0x5d, 0xff]),
        },
    }
}

fn draw_glyph(img: &mut RgbaImage, x: i32, y: i32, ch: char, color: Rgba<u8>, scale: u32) {
    for (row, bits) in glyph_pattern(ch).iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(img, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

/// 5x7 bitmaps for the characters of the extended BCD table.
#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        _ => [0; GLYPH_HEIGHT],
    }
}
