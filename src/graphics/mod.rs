//! PNG rendering of read cards.

mod paint;

pub use paint::{
    CardImageStyle, GLYPH_HEIGHT, GLYPH_WIDTH, ImageRenderOptions, MAX_DPI, MIN_DPI,
    render_card_image,
};
