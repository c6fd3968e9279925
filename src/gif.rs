//! Animated GIF output
//!
//! Text frames are drawn into RGBA images with a small built-in 6x6 bitmap
//! font, one glyph per cell, and handed to the `image` GIF encoder in order.

use crate::config::GifConfig;
use crate::error::{Error, Result};
use crate::frame::Frame;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as ImageFrame, Rgba, RgbaImage};
use tracing::debug;

const GLYPH_SIZE: u32 = 6;

const FOREGROUND: Rgba<u8> = Rgba([235, 235, 235, 255]);
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 6x6 glyphs for the default ramp characters
/// Each glyph is 6 rows top to bottom, each row 6 bits with bit 5 the leftmost pixel
static GLYPHS: [(char, [u8; 6]); 15] = [
    (' ', [0b000000, 0b000000, 0b000000, 0b000000, 0b000000, 0b000000]),
    ('.', [0b000000, 0b000000, 0b000000, 0b000000, 0b001100, 0b001100]),
    (',', [0b000000, 0b000000, 0b000000, 0b001100, 0b001100, 0b011000]),
    (':', [0b000000, 0b001100, 0b000000, 0b000000, 0b001100, 0b000000]),
    (';', [0b000000, 0b001100, 0b000000, 0b001100, 0b001100, 0b011000]),
    ('i', [0b001100, 0b000000, 0b011100, 0b001100, 0b001100, 0b011110]),
    ('1', [0b001100, 0b011100, 0b001100, 0b001100, 0b001100, 0b011110]),
    ('t', [0b010000, 0b111100, 0b010000, 0b010000, 0b010010, 0b001100]),
    ('f', [0b001110, 0b010000, 0b111100, 0b010000, 0b010000, 0b010000]),
    ('L', [0b100000, 0b100000, 0b100000, 0b100000, 0b100000, 0b111111]),
    ('C', [0b011110, 0b100001, 0b100000, 0b100000, 0b100001, 0b011110]),
    ('G', [0b011110, 0b100000, 0b100000, 0b100111, 0b100001, 0b011110]),
    ('0', [0b011110, 0b100001, 0b100101, 0b101001, 0b100001, 0b011110]),
    ('8', [0b011110, 0b100001, 0b011110, 0b100001, 0b100001, 0b011110]),
    ('@', [0b011110, 0b100001, 0b101101, 0b101111, 0b100000, 0b011110]),
];

fn glyph(c: char) -> Option<&'static [u8; 6]> {
    GLYPHS.iter().find(|(g, _)| *g == c).map(|(_, rows)| rows)
}

/// Draws frames to pixels and encodes them as one looping GIF
pub struct GifAssembler {
    config: GifConfig,
    ramp: Vec<char>,
}

impl GifAssembler {
    /// `ramp` shades characters without a built-in glyph by their ramp position
    pub fn new(config: GifConfig, ramp: &str) -> Result<Self> {
        if config.scale == 0 {
            return Err(Error::invalid_param("scale", config.scale, "must be at least 1"));
        }
        if !(1..=30).contains(&config.speed) {
            return Err(Error::invalid_param("speed", config.speed, "must be between 1 and 30"));
        }
        Ok(Self {
            config,
            ramp: ramp.chars().collect(),
        })
    }

    pub fn config(&self) -> &GifConfig {
        &self.config
    }

    /// Fail unless a `width` x `height` cell grid fits a GIF logical screen
    pub fn check_grid(&self, width: usize, height: usize) -> Result<()> {
        let scale = self.config.scale as u64;
        let fits = |cells: usize| cells as u64 * scale <= u16::MAX as u64;
        if !fits(width) || !fits(height) {
            return Err(Error::invalid_param(
                "grid",
                format!("{}x{} at scale {}", width, height, scale),
                "exceeds the 65535 pixel GIF limit",
            ));
        }
        Ok(())
    }

    /// Pixel dimensions of an encoded frame
    pub fn dimensions(&self, frame: &Frame) -> (u32, u32) {
        let scale = self.config.scale;
        (frame.width() as u32 * scale, frame.height() as u32 * scale)
    }

    /// Draw one text frame, `scale` x `scale` pixels per character
    pub fn draw(&self, frame: &Frame) -> RgbaImage {
        let scale = self.config.scale;
        let (width, height) = self.dimensions(frame);
        let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);

        for (i, &c) in frame.cells().iter().enumerate() {
            let cell_x = (i % frame.width()) as u32 * scale;
            let cell_y = (i / frame.width()) as u32 * scale;

            match glyph(c) {
                Some(rows) => {
                    for py in 0..scale {
                        let row = rows[(py * GLYPH_SIZE / scale) as usize];
                        for px in 0..scale {
                            let bit = GLYPH_SIZE - 1 - px * GLYPH_SIZE / scale;
                            if row >> bit & 1 == 1 {
                                image.put_pixel(cell_x + px, cell_y + py, FOREGROUND);
                            }
                        }
                    }
                }
                None => {
                    let fill = self.fallback_color(c);
                    for py in 0..scale {
                        for px in 0..scale {
                            image.put_pixel(cell_x + px, cell_y + py, fill);
                        }
                    }
                }
            }
        }

        image
    }

    /// Flat gray proportional to the character's position in the ramp
    fn fallback_color(&self, c: char) -> Rgba<u8> {
        let Some(index) = self.ramp.iter().position(|r| *r == c) else {
            return BACKGROUND;
        };
        let last = self.ramp.len().saturating_sub(1).max(1);
        let level = (index * 255 / last) as u8;
        Rgba([level, level, level, 255])
    }

    /// Encode all frames, in order, into one GIF that repeats forever
    pub fn encode(&self, frames: &[Frame]) -> Result<Vec<u8>> {
        if frames.is_empty() {
            return Err(Error::invalid_param("frames", 0, "at least one frame is required"));
        }
        for frame in frames {
            self.check_grid(frame.width(), frame.height())?;
        }

        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut out, self.config.speed);
            encoder.set_repeat(Repeat::Infinite)?;

            let delay = Delay::from_numer_denom_ms(self.config.delay_ms, 1);
            for frame in frames {
                encoder.encode_frame(ImageFrame::from_parts(self.draw(frame), 0, 0, delay))?;
            }
        }

        debug!(frames = frames.len(), bytes = out.len(), "Encoded GIF");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use std::io::Cursor;

    fn frame(width: usize, height: usize, text: &str) -> Frame {
        Frame::from_cells(width, height, text.chars().collect())
    }

    fn assembler(scale: u32) -> GifAssembler {
        let config = GifConfig {
            scale,
            ..GifConfig::default()
        };
        GifAssembler::new(config, crate::ASCII_RAMP).unwrap()
    }

    #[test]
    fn test_every_ramp_char_has_glyph() {
        for c in crate::ASCII_RAMP.chars() {
            assert!(glyph(c).is_some(), "missing glyph for {:?}", c);
        }
    }

    #[test]
    fn test_glyphs_fit_six_bits() {
        for (_, rows) in GLYPHS {
            assert!(rows.iter().all(|r| *r < 64));
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let zero_scale = GifConfig {
            scale: 0,
            ..GifConfig::default()
        };
        assert!(GifAssembler::new(zero_scale, crate::ASCII_RAMP).is_err());

        let slow = GifConfig {
            speed: 0,
            ..GifConfig::default()
        };
        assert!(GifAssembler::new(slow, crate::ASCII_RAMP).is_err());
    }

    #[test]
    fn test_draw_dimensions() {
        let image = assembler(6).draw(&frame(3, 2, "@@@   "));
        assert_eq!(image.dimensions(), (18, 12));
    }

    #[test]
    fn test_draw_glyph_pixels() {
        let image = assembler(6).draw(&frame(2, 1, "@ "));
        // '@' top row is 011110
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*image.get_pixel(1, 0), FOREGROUND);
        assert_eq!(*image.get_pixel(5, 0), BACKGROUND);
        // blank cell stays background
        assert!((6..12).all(|x| (0..6).all(|y| *image.get_pixel(x, y) == BACKGROUND)));
    }

    #[test]
    fn test_draw_scales_glyphs() {
        let image = assembler(12).draw(&frame(1, 1, "L"));
        // 'L' left column is lit on every row, two pixels wide at double scale
        assert_eq!(*image.get_pixel(0, 0), FOREGROUND);
        assert_eq!(*image.get_pixel(1, 0), FOREGROUND);
        assert_eq!(*image.get_pixel(2, 0), BACKGROUND);
        // bottom row is solid
        assert!((0..12).all(|x| *image.get_pixel(x, 11) == FOREGROUND));
    }

    #[test]
    fn test_fallback_for_custom_ramp() {
        let gif = GifAssembler::new(GifConfig::default(), " #").unwrap();
        let image = gif.draw(&frame(2, 1, "# "));
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(6, 0), BACKGROUND);
    }

    #[test]
    fn test_encode_empty_rejected() {
        assert!(assembler(6).encode(&[]).is_err());
    }

    #[test]
    fn test_check_grid_limit() {
        let gif = assembler(6);
        assert!(gif.check_grid(10922, 60).is_ok());
        assert!(matches!(
            gif.check_grid(11000, 10),
            Err(Error::InvalidParameter { name: "grid", .. })
        ));
        assert!(gif.check_grid(10, 11000).is_err());
    }

    #[test]
    fn test_encode_oversized_frame_rejected() {
        let wide = frame(11000, 1, &" ".repeat(11000));
        assert!(matches!(
            assembler(6).encode(&[wide]),
            Err(Error::InvalidParameter { name: "grid", .. })
        ));
    }

    #[test]
    fn test_encode_frames() {
        let frames = vec![
            frame(4, 2, "@.  :;  "),
            frame(4, 2, " @. ;:  "),
            frame(4, 2, "  @.  ;:"),
        ];
        let bytes = assembler(6).encode(&frames).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        // logical screen width and height, little endian
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 24);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 12);

        let decoder = GifDecoder::new(Cursor::new(bytes)).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        for f in &decoded {
            assert_eq!(f.buffer().dimensions(), (24, 12));
            let (numer, denom) = f.delay().numer_denom_ms();
            assert_eq!(numer / denom, 100);
        }
    }
}
