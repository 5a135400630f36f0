use crate::utils::error::Result;
use image::DynamicImage;
use lopdf::{dictionary, Stream};

/// Longest edge kept when embedding a photo; larger images are scaled down.
pub const MAX_EDGE: u32 = 600;

/// A decoded raster ready to embed as a PDF image XObject.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
}

impl EmbeddedImage {
    /// Decodes PNG or JPEG bytes. Transparency is flattened onto white.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut image = image::load_from_memory(bytes)?;
        if image.width() > MAX_EDGE || image.height() > MAX_EDGE {
            image = image.thumbnail(MAX_EDGE, MAX_EDGE);
        }
        Ok(Self::from_dynamic(&image))
    }

    fn from_dynamic(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u16;
            for channel in [r, g, b] {
                let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }
        Self { width, height, rgb }
    }

    /// Width and height that fit inside a `max_w` x `max_h` box, keeping aspect ratio.
    pub fn fit_within(&self, max_w: f32, max_h: f32) -> (f32, f32) {
        if self.width == 0 || self.height == 0 {
            return (0.0, 0.0);
        }
        let scale = (max_w / self.width as f32).min(max_h / self.height as f32);
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    pub fn to_xobject(&self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            self.rgb.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, pixel);
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let decoded = EmbeddedImage::decode(&png_bytes(2, 2, Rgba([0, 0, 0, 0]))).unwrap();
        assert_eq!(decoded.rgb.len(), 12);
        assert!(decoded.rgb.iter().all(|&c| c == 255));
    }

    #[test]
    fn test_large_images_are_scaled_down() {
        let decoded = EmbeddedImage::decode(&png_bytes(1200, 300, Rgba([10, 20, 30, 255]))).unwrap();
        assert_eq!(decoded.width, MAX_EDGE);
        assert_eq!(decoded.height, 150);
        assert_eq!(&decoded.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        let decoded = EmbeddedImage::decode(&png_bytes(100, 200, Rgba([0, 0, 0, 255]))).unwrap();
        let (w, h) = decoded.fit_within(120.0, 150.0);
        assert!((w - 75.0).abs() < 0.01);
        assert!((h - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(EmbeddedImage::decode(b"<html>403 Forbidden</html>").is_err());
    }
}
