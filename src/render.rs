//! Draws tiled pages into images at a given print resolution.

use std::collections::BTreeMap;

use image::imageops::{self, FilterType};
use shelfpack::{DrawKind, Id, Page, PixelRect, Rect, Rgb, SheetSize};
use thiserror::Error;

use crate::{
    raster::{Image, Pixel, PixelBox},
    textures::Texture,
};

const MM_PER_INCH: f64 = 25.4;

/// Pages bigger than this many bytes of RGBA are refused rather than
/// allocated.
pub const MAX_PAGE_BYTES: usize = 1 << 31;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub dpi: f64,
    pub outline_width: f64,
}

impl RenderOptions {
    fn pixels_per_mm(&self) -> f64 {
        self.dpi / MM_PER_INCH
    }
}

/// Rasterizes one page. The result is the size of a whole sheet even if the
/// page only has something drawn in one corner.
pub fn render_page(
    page: &Page,
    sheet: SheetSize,
    textures: &BTreeMap<Id, Texture>,
    options: &RenderOptions,
) -> Result<Image, RenderError> {
    let scale = options.pixels_per_mm();
    let size = (
        to_pixels(sheet.width * scale).max(1.0) as u32,
        to_pixels(sheet.height * scale).max(1.0) as u32,
    );

    let mut canvas = match Image::byte_len(size) {
        Some(len) if len <= MAX_PAGE_BYTES => Image::new_filled(size, Pixel::WHITE),
        _ => None,
    }
    .ok_or(RenderError::PageTooLarge { size })?;

    let outline = to_pixels(options.outline_width * scale).max(1.0) as u32;

    for command in &page.commands {
        let area = pixel_box(&command.dest, scale);

        if area.size.0 == 0 || area.size.1 == 0 {
            log::trace!("{} is too small to draw at this resolution", command.object);
            continue;
        }

        match command.kind {
            DrawKind::Fill { color } => canvas.fill_rect(area, to_pixel(color)),
            DrawKind::ImageCrop { source } => {
                let texture = textures
                    .get(&command.object)
                    .ok_or_else(|| RenderError::MissingTexture {
                        id: command.object.clone(),
                    })?;

                draw_crop(&mut canvas, texture, source, area);
            }
        }

        canvas.stroke_rect(area, outline, to_pixel(command.outline));
    }

    Ok(canvas)
}

fn draw_crop(canvas: &mut Image, texture: &Texture, source: PixelRect, area: PixelBox) {
    let (x, y, width, height) = source.to_whole_pixels(texture.pixel_size());
    let cropped = imageops::crop_imm(&texture.image, x, y, width, height).to_image();
    let resized = imageops::resize(&cropped, area.size.0, area.size.1, FilterType::Triangle);

    let piece = Image::new_rgba8(area.size, resized.into_raw());
    canvas.blit(&piece, area.pos);
}

/// Snaps a millimeter rectangle to the pixel grid. Neighboring rectangles
/// snap to the same shared edge, so tiles never gap or overlap.
fn pixel_box(rect: &Rect, scale: f64) -> PixelBox {
    let left = to_pixels(rect.left() * scale);
    let top = to_pixels(rect.top() * scale);
    let right = to_pixels(rect.right() * scale);
    let bottom = to_pixels(rect.bottom() * scale);

    PixelBox {
        pos: (left as i64, top as i64),
        size: ((right - left).max(0.0) as u32, (bottom - top).max(0.0) as u32),
    }
}

fn to_pixels(value: f64) -> f64 {
    value.round()
}

fn to_pixel(color: Rgb) -> Pixel {
    Pixel::opaque(color.0, color.1, color.2)
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No texture was loaded for {id}")]
    MissingTexture { id: Id },

    #[error(
        "A {}x{} pixel page is too large to render. Use a lower --dpi.",
        size.0,
        size.1
    )]
    PageTooLarge { size: (u32, u32) },
}
