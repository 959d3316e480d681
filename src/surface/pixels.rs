use image::RgbaImage;
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::{PaintError, PaintResult};

/// Straight-alpha copy of a premultiplied pixmap
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    // Buffer length always matches the dimensions
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Premultiplied copy of a straight-alpha image
pub fn image_to_pixmap(image: &RgbaImage) -> PaintResult<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(|| {
        PaintError::InvalidArgument(format!(
            "raster must not be empty, got {}x{}",
            image.width(),
            image.height()
        ))
    })?;

    let mut data = Vec::with_capacity(image.as_raw().len());
    for px in image.pixels() {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or_else(|| {
        PaintError::InvalidArgument("raster buffer does not match its dimensions".to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_pixels_survive_conversion() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, image::Rgba([12, 200, 7, 255]));
        let pixmap = image_to_pixmap(&image).unwrap();
        assert_eq!(pixmap_to_image(&pixmap), image);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        assert!(matches!(
            image_to_pixmap(&RgbaImage::new(0, 4)),
            Err(PaintError::InvalidArgument(_))
        ));
    }
}
