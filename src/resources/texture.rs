use std::path::Path;

use anyhow::{Context, bail};
use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrapping {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

/**
 * A decoded, vertically flipped image together with its full mip chain.
 *
 * Texture coordinates in the scene follow the convention that `v = 0` is the
 * bottom edge of the picture, so rows are flipped before upload.
 */
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file, 3 or 4.
    pub channels: u8,
    /// Level 0 first, down to 1x1.
    pub levels: Vec<RgbaImage>,
}

impl TextureImage {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("could not load image {}", path.display()))?;
        Self::from_image(img).with_context(|| format!("unusable image {}", path.display()))
    }

    pub fn from_image(img: DynamicImage) -> anyhow::Result<Self> {
        let channels = img.color().channel_count();
        if channels != 3 && channels != 4 {
            bail!("not implemented to handle image with {channels} channels");
        }
        let (width, height) = img.dimensions();
        let base = img.flipv().to_rgba8();
        Ok(Self {
            width,
            height,
            channels,
            levels: mip_chain(base),
        })
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height());
    let mut levels = Vec::with_capacity(count as usize);
    levels.push(base);
    for _ in 1..count {
        let prev = &levels[levels.len() - 1];
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    use super::*;

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(1024, 512), 11);
        assert_eq!(mip_level_count(3, 5), 3);
    }

    #[test]
    fn rgb_images_are_flipped_and_mipped() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        let texture = TextureImage::from_image(DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(texture.channels, 3);
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.mip_level_count(), 3);
        // the top-left texel of the file ends up on the last row
        assert_eq!(*texture.levels[0].get_pixel(0, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*texture.levels[0].get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        let last = &texture.levels[2];
        assert_eq!((last.width(), last.height()), (1, 1));
    }

    #[test]
    fn single_channel_images_are_rejected() {
        let img = GrayImage::from_pixel(2, 2, Luma([7]));
        let err = TextureImage::from_image(DynamicImage::ImageLuma8(img)).unwrap_err();
        assert!(err.to_string().contains("1 channels"));
    }

    #[test]
    fn missing_files_fail_with_the_path() {
        let err = TextureImage::from_path("does/not/exist.png").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.png"));
    }
}
