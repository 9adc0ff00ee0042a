//! A plain RGBA canvas that printed pages are drawn onto.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Rgba8,
}

impl ImageFormat {
    fn stride(&self) -> u32 {
        match self {
            ImageFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const WHITE: Pixel = Pixel::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A rectangle of whole pixels, clipped against a canvas before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub pos: (i64, i64),
    pub size: (u32, u32),
}

#[derive(Debug, Clone)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();
        let format = ImageFormat::Rgba8;

        assert!(Some(data.len()) == Self::byte_len(size));

        Self { size, data, format }
    }

    /// Creates an image of `size` covered in `pixel`, or `None` if it would be
    /// too large to address.
    pub fn new_filled(size: (u32, u32), pixel: Pixel) -> Option<Self> {
        let len = Self::byte_len(size)?;
        let data = [pixel.r, pixel.g, pixel.b, pixel.a]
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect::<Vec<u8>>();

        Some(Self::new_rgba8(size, data))
    }

    /// The number of bytes an RGBA8 image of `size` takes up.
    pub fn byte_len(size: (u32, u32)) -> Option<usize> {
        (size.0 as usize)
            .checked_mul(size.1 as usize)?
            .checked_mul(ImageFormat::Rgba8.stride() as usize)
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);

        match self.format {
            ImageFormat::Rgba8 => {
                encoder.set_color(png::ColorType::RGBA);
                encoder.set_depth(png::BitDepth::Eight);
            }
        }

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies `other` onto this image with its top-left corner at `pos`.
    /// Anything falling outside this image is dropped.
    pub fn blit(&mut self, other: &Image, pos: (i64, i64)) {
        assert!(self.format == ImageFormat::Rgba8 && other.format == ImageFormat::Rgba8);

        let target = PixelBox {
            pos,
            size: other.size,
        };

        let (x_range, y_range) = match self.clip(target) {
            Some(ranges) => ranges,
            None => return,
        };

        let stride = self.format.stride() as usize;

        for self_y in y_range {
            let other_y = (i64::from(self_y) - pos.1) as u32;
            let other_x = (i64::from(x_range.start) - pos.0) as u32;
            let count = (x_range.end - x_range.start) as usize * stride;

            let other_start = other.offset((other_x, other_y));
            let self_start = self.offset((x_range.start, self_y));

            self.data[self_start..self_start + count]
                .copy_from_slice(&other.data[other_start..other_start + count]);
        }
    }

    pub fn fill_rect(&mut self, area: PixelBox, pixel: Pixel) {
        let (x_range, y_range) = match self.clip(area) {
            Some(ranges) => ranges,
            None => return,
        };

        for y in y_range {
            for x in x_range.clone() {
                self.set_pixel((x, y), pixel);
            }
        }
    }

    /// Draws a border of `thickness` pixels just inside `area`.
    pub fn stroke_rect(&mut self, area: PixelBox, thickness: u32, pixel: Pixel) {
        let (width, height) = area.size;
        let thickness = thickness.min(width).min(height);

        if thickness == 0 {
            return;
        }

        let (left, top) = area.pos;
        let right = left + i64::from(width) - i64::from(thickness);
        let bottom = top + i64::from(height) - i64::from(thickness);

        let edges = [
            PixelBox {
                pos: (left, top),
                size: (width, thickness),
            },
            PixelBox {
                pos: (left, bottom),
                size: (width, thickness),
            },
            PixelBox {
                pos: (left, top),
                size: (thickness, height),
            },
            PixelBox {
                pos: (right, top),
                size: (thickness, height),
            },
        ];

        for edge in &edges {
            self.fill_rect(*edge, pixel);
        }
    }

    #[cfg(test)]
    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.offset(pos);

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.offset(pos);

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }

    fn offset(&self, pos: (u32, u32)) -> usize {
        let stride = self.format.stride() as usize;
        stride * (pos.0 as usize + pos.1 as usize * self.size.0 as usize)
    }

    /// The columns and rows of this image covered by `area`, if any.
    fn clip(&self, area: PixelBox) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let left = area.pos.0.max(0);
        let top = area.pos.1.max(0);
        let right = (area.pos.0 + i64::from(area.size.0)).min(i64::from(self.size.0));
        let bottom = (area.pos.1 + i64::from(area.size.1)).min(i64::from(self.size.1));

        if left >= right || top >= bottom {
            return None;
        }

        Some((left as u32..right as u32, top as u32..bottom as u32))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blit_zero() {
        let source = Image::new_filled((17, 20), Pixel::WHITE).unwrap();
        let mut target = Image::new_filled((17, 20), Pixel::new(0, 0, 0, 0)).unwrap();

        target.blit(&source, (0, 0));

        assert_eq!(target.get_pixel((16, 19)), Pixel::WHITE);
    }

    #[test]
    fn blit_corner() {
        let source = Image::new_filled((4, 4), Pixel::opaque(1, 2, 3)).unwrap();
        let mut target = Image::new_filled((8, 8), Pixel::WHITE).unwrap();

        target.blit(&source, (4, 4));

        assert_eq!(target.get_pixel((3, 3)), Pixel::WHITE);
        assert_eq!(target.get_pixel((4, 4)), Pixel::opaque(1, 2, 3));
        assert_eq!(target.get_pixel((7, 7)), Pixel::opaque(1, 2, 3));
    }

    #[test]
    fn blit_clips_overhang() {
        let mut source = Image::new_filled((4, 4), Pixel::opaque(9, 9, 9)).unwrap();
        source.set_pixel((3, 3), Pixel::opaque(7, 7, 7));
        let mut target = Image::new_filled((3, 3), Pixel::WHITE).unwrap();

        target.blit(&source, (-2, -2));

        assert_eq!(target.get_pixel((0, 0)), Pixel::opaque(9, 9, 9));
        assert_eq!(target.get_pixel((1, 1)), Pixel::opaque(7, 7, 7));
        assert_eq!(target.get_pixel((2, 2)), Pixel::WHITE);

        target.blit(&source, (10, 10));
        assert_eq!(target.get_pixel((2, 2)), Pixel::WHITE);
    }

    #[test]
    fn fill_and_stroke() {
        let mut canvas = Image::new_filled((10, 10), Pixel::WHITE).unwrap();
        let area = PixelBox {
            pos: (2, 2),
            size: (6, 5),
        };

        canvas.fill_rect(area, Pixel::opaque(200, 0, 0));
        canvas.stroke_rect(area, 1, Pixel::opaque(0, 0, 0));

        assert_eq!(canvas.get_pixel((1, 1)), Pixel::WHITE);
        assert_eq!(canvas.get_pixel((2, 2)), Pixel::opaque(0, 0, 0));
        assert_eq!(canvas.get_pixel((7, 6)), Pixel::opaque(0, 0, 0));
        assert_eq!(canvas.get_pixel((4, 4)), Pixel::opaque(200, 0, 0));
        assert_eq!(canvas.get_pixel((8, 4)), Pixel::WHITE);
    }

    #[test]
    fn set_pixel() {
        let mut source = Image::new_filled((3, 3), Pixel::new(0, 0, 0, 0)).unwrap();

        source.set_pixel((0, 0), Pixel::new(1, 2, 3, 4));
        assert_eq!(source.get_pixel((0, 0)), Pixel::new(1, 2, 3, 4));

        source.set_pixel((2, 2), Pixel::new(5, 6, 7, 8));
        assert_eq!(source.get_pixel((2, 2)), Pixel::new(5, 6, 7, 8));

        assert_eq!(&source.data[0..4], &[1, 2, 3, 4]);
        assert_eq!(&source.data[(source.data.len() - 4)..], &[5, 6, 7, 8]);
    }

    #[test]
    fn byte_len_checks_for_overflow() {
        assert_eq!(Image::byte_len((3, 2)), Some(24));
        assert_eq!(Image::byte_len((0, 100)), Some(0));
        assert_eq!(Image::byte_len((u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn encodes_png() {
        let image = Image::new_filled((5, 2), Pixel::opaque(10, 20, 30)).unwrap();
        let mut output = Vec::new();

        image.encode_png(&mut output).unwrap();

        assert_eq!(&output[..8], b"\x89PNG\r\n\x1a\n");
    }
}
