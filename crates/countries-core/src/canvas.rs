//! Minimal raster canvas used to paint the summary image.
//!
//! Text is drawn with the public-domain 8×8 bitmap font from `font8x8`,
//! scaled up by [`TEXT_SCALE`]. Characters outside Basic Latin and
//! Latin-1 fall back to `?`. Drawing outside the canvas is clipped.

use std::path::Path;

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{ImageFormat, ImageResult, Rgba, RgbaImage};

/// Integer scale factor applied to every glyph.
pub const TEXT_SCALE: u32 = 2;

/// Width and height of an unscaled glyph.
const GLYPH_SIZE: u32 = 8;

/// Horizontal advance of one character in pixels.
pub const CHAR_ADVANCE: u32 = GLYPH_SIZE * TEXT_SCALE;

/// An RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying image.
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Outline the rectangle with corners `(x1, y1)` and `(x2, y2)`
    /// (inclusive), drawing `thickness` pixels inward.
    pub fn stroke_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgba<u8>, thickness: u32) {
        for t in 0..thickness {
            let top = y1.saturating_add(t);
            let bottom = y2.saturating_sub(t);
            let left = x1.saturating_add(t);
            let right = x2.saturating_sub(t);
            for x in x1..=x2 {
                self.set(x, top, color);
                self.set(x, bottom, color);
            }
            for y in y1..=y2 {
                self.set(left, y, color);
                self.set(right, y, color);
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, text: &str, x: u32, y: u32, color: Rgba<u8>) {
        let mut pen_x = x;
        for ch in text.chars() {
            let glyph = glyph(ch);
            for (row_index, row) in (0_u32..).zip(glyph) {
                for bit in 0..GLYPH_SIZE {
                    if (row >> bit) & 1 == 1 {
                        self.fill_block(
                            pen_x.saturating_add(bit.saturating_mul(TEXT_SCALE)),
                            y.saturating_add(row_index.saturating_mul(TEXT_SCALE)),
                            color,
                        );
                    }
                }
            }
            pen_x = pen_x.saturating_add(CHAR_ADVANCE);
        }
    }

    /// Write the canvas to `path` as PNG, replacing any existing file.
    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    fn fill_block(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        for dy in 0..TEXT_SCALE {
            for dx in 0..TEXT_SCALE {
                self.set(x.saturating_add(dx), y.saturating_add(dy), color);
            }
        }
    }

    fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }
}

/// Pixel width of `text` when drawn with [`Canvas::draw_text`].
pub fn text_width(text: &str) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(CHAR_ADVANCE)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const FG: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn painted(canvas: &Canvas) -> usize {
        canvas.image().pixels().filter(|p| **p == FG).count()
    }

    #[test]
    fn new_canvas_is_uniform() {
        let canvas = Canvas::new(10, 4, BG);
        assert_eq!((canvas.width(), canvas.height()), (10, 4));
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn stroke_rect_draws_outline_only() {
        let mut canvas = Canvas::new(10, 10, BG);
        canvas.stroke_rect(1, 1, 8, 8, FG, 1);
        assert_eq!(canvas.image().get_pixel(1, 1), &FG);
        assert_eq!(canvas.image().get_pixel(8, 5), &FG);
        assert_eq!(canvas.image().get_pixel(4, 4), &BG);
        // 8x8 outline has 28 edge pixels.
        assert_eq!(painted(&canvas), 28);
    }

    #[test]
    fn text_is_painted_and_clipped() {
        let mut canvas = Canvas::new(40, 20, BG);
        canvas.draw_text("Hi", 0, 0, FG);
        assert!(painted(&canvas) > 0);

        let mut edge = Canvas::new(5, 5, BG);
        edge.draw_text("W", 3, 3, FG);
        assert!(painted(&edge) <= 4);
    }

    #[test]
    fn space_paints_nothing() {
        let mut canvas = Canvas::new(40, 20, BG);
        canvas.draw_text("   ", 0, 0, FG);
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn non_latin_falls_back_to_question_mark() {
        assert_eq!(glyph('\u{4E2D}'), glyph('?'));
        assert_ne!(glyph('\u{00C5}'), glyph('?'));
    }

    #[test]
    fn text_width_counts_chars() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("Côte"), 4 * CHAR_ADVANCE);
    }
}
