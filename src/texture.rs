use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::Pixmap;

use crate::color::Color;
use crate::error::PaintResult;
use crate::surface::image_to_pixmap;

/// Edge length of the working buffer, in pixels
pub const TEXTURE_SIZE: u32 = 40;

/// Largest zoom [`Texture::update`] applies; larger zooms are clamped
pub const MAX_ZOOM: f32 = 10.0;

/// A recolorable tile used as a repeating fill.
///
/// Only the alpha channel of the source matters: [`Texture::update`]
/// replaces every RGB value with the requested color and keeps the source
/// alpha, so uncovered texels stay transparent.
#[derive(Debug, Clone)]
pub struct Texture {
    source: RgbaImage,
    recolored: RgbaImage,
    pattern: Pixmap,
    color: Color,
    zoom: f32,
}

impl Texture {
    /// Builds a texture from the top-left 40x40 pixels of `image`
    pub fn new(image: &RgbaImage) -> PaintResult<Self> {
        let mut source = RgbaImage::new(TEXTURE_SIZE, TEXTURE_SIZE);
        imageops::replace(&mut source, image, 0, 0);

        let mut texture = Self {
            pattern: image_to_pixmap(&source)?,
            recolored: source.clone(),
            source,
            color: Color::BLACK,
            zoom: 1.0,
        };
        texture.update(Color::BLACK, 1.0);
        Ok(texture)
    }

    pub fn from_png_bytes(bytes: &[u8]) -> PaintResult<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        Self::new(&image)
    }

    /// Procedural paper grain: mostly dense texels with scattered gaps
    pub fn grain(seed: u64) -> PaintResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let image = RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |_, _| {
            let alpha = if rng.gen_bool(0.7) {
                rng.gen_range(150..=255)
            } else {
                rng.gen_range(0..60)
            };
            Rgba([0, 0, 0, alpha])
        });
        Self::new(&image)
    }

    /// Recolors the tile and rescales it to `zoom` times its size.
    ///
    /// Non-positive or non-finite zooms keep the previous zoom.
    pub fn update(&mut self, color: Color, zoom: f32) {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom.min(MAX_ZOOM)
        } else {
            log::warn!("Ignoring texture zoom {}, keeping {}", zoom, self.zoom);
            self.zoom
        };

        let [red, green, blue, _] = color.to_rgba8();
        for (texel, source) in self.recolored.pixels_mut().zip(self.source.pixels()) {
            *texel = Rgba([red, green, blue, source[3]]);
        }

        let size = ((TEXTURE_SIZE as f32 * zoom).round() as u32).max(1);
        let scaled = imageops::resize(&self.recolored, size, size, FilterType::Triangle);
        match image_to_pixmap(&scaled) {
            Ok(pattern) => self.pattern = pattern,
            Err(err) => log::error!("Failed to rebuild texture pattern: {}", err),
        }
        self.color = color;
        self.zoom = zoom;
    }

    /// The scaled tile to repeat when filling
    pub fn pattern(&self) -> &Pixmap {
        &self.pattern
    }

    /// The 40x40 recolored working buffer
    pub fn recolored(&self) -> &RgbaImage {
        &self.recolored
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}
