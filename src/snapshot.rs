use crate::dates::range_caption;
use crate::errors::ExportError;
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const EXPORT_CARD_REGION: &str = "export-card";
pub const PIXEL_RATIO: u32 = 2;

const CARD_WIDTH: u32 = 480;
const CARD_HEIGHT: u32 = 300;
const CARD_RADIUS: u32 = 24;
const GLYPH: u32 = 8;

const ROSE_50: [u8; 3] = [0xff, 0xf1, 0xf2];
const PINK_50: [u8; 3] = [0xfd, 0xf2, 0xf8];
const ROSE_200: [u8; 3] = [0xfe, 0xcd, 0xd3];
const ROSE_300: [u8; 3] = [0xfd, 0xa4, 0xaf];
const ROSE_400: [u8; 3] = [0xfb, 0x71, 0x85];
const ROSE_700: [u8; 3] = [0xbe, 0x12, 0x3c];
const ROSE_900: [u8; 3] = [0x88, 0x13, 0x37];
const GRAY_700: [u8; 3] = [0x37, 0x41, 0x51];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    ExportCard,
}

impl Region {
    pub fn find(id: &str) -> Option<Self> {
        match id {
            EXPORT_CARD_REGION => Some(Self::ExportCard),
            _ => None,
        }
    }
}

pub fn rasterize(region: Region) -> RgbaImage {
    match region {
        Region::ExportCard => draw_completion_card(),
    }
}

pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn export_region(region_id: &str) -> Option<Result<Vec<u8>, ExportError>> {
    Region::find(region_id).map(|region| encode_png(rasterize(region)))
}

fn draw_completion_card() -> RgbaImage {
    let width = CARD_WIDTH * PIXEL_RATIO;
    let height = CARD_HEIGHT * PIXEL_RATIO;
    let radius = CARD_RADIUS * PIXEL_RATIO;
    let border = PIXEL_RATIO;

    let mut image = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if !inside_rounded_rect(x, y, 0, width, height, radius) {
                continue;
            }
            let color = if inside_rounded_rect(x, y, border, width, height, radius) {
                let t = (x as f32 / width as f32 + y as f32 / height as f32) / 2.0;
                mix(ROSE_50, PINK_50, t)
            } else {
                ROSE_200
            };
            image.put_pixel(x, y, opaque(color));
        }
    }

    let mut painter = Painter { image: &mut image };
    painter.text_centered("Journey Completed", 56, 3, ROSE_900);
    painter.text_centered(&range_caption(), 100, 2, ROSE_700);
    painter.fill_rect(
        width / 2 - 32 * PIXEL_RATIO,
        128 * PIXEL_RATIO,
        64 * PIXEL_RATIO,
        4 * PIXEL_RATIO,
        ROSE_300,
    );
    painter.text_centered("\"The wait is over. Love has returned.\"", 160, 1, GRAY_700);
    painter.text_centered("UL  *  BY UDAY", 232, 1, ROSE_400);

    image
}

struct Painter<'a> {
    image: &'a mut RgbaImage,
}

impl Painter<'_> {
    /// `top` and `scale` are in CSS pixels.
    fn text_centered(&mut self, text: &str, top: u32, scale: u32, color: [u8; 3]) {
        let block = scale * PIXEL_RATIO;
        let text_width = text.chars().count() as u32 * GLYPH * block;
        let left = self.image.width().saturating_sub(text_width) / 2;

        for (index, c) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(c) else {
                continue;
            };
            let origin_x = left + index as u32 * GLYPH * block;
            for (row, bits) in glyph.into_iter().enumerate() {
                for col in 0..GLYPH {
                    if bits & (1u8 << col) != 0 {
                        self.fill_rect(
                            origin_x + col * block,
                            top * PIXEL_RATIO + row as u32 * block,
                            block,
                            block,
                            color,
                        );
                    }
                }
            }
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]) {
        let x_end = (x + width).min(self.image.width());
        let y_end = (y + height).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, opaque(color));
            }
        }
    }
}

fn inside_rounded_rect(x: u32, y: u32, inset: u32, width: u32, height: u32, radius: u32) -> bool {
    let (x, y) = (x as f32 + 0.5, y as f32 + 0.5);
    let inset = inset as f32;
    let (left, top) = (inset, inset);
    let (right, bottom) = (width as f32 - inset, height as f32 - inset);
    if x < left || x > right || y < top || y > bottom {
        return false;
    }

    let r = (radius as f32 - inset).max(0.0);
    let cx = x.clamp(left + r, right - r);
    let cy = y.clamp(top + r, bottom - r);
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= r * r
}

fn mix(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    [
        channel(from[0], to[0]),
        channel(from[1], to[1]),
        channel(from[2], to[2]),
    ]
}

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}
