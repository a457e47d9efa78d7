//! Display-sized versions of contact photos.
//!
//! Every contact gets a thumbnail, even without a photo: whenever a photo is missing or can't be
//! decoded the [`ImageLoader`] substitutes a generated placeholder instead of failing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use getset::{CopyGetters, Getters};
use image::{DynamicImage, ImageResult, Rgb, RgbImage, imageops::FilterType};
use tracing::debug;

/// Thumbnails fit inside a square of this many pixels.
pub const THUMBNAIL_SIZE: u32 = 150;

const PLACEHOLDER_BACKGROUND: Rgb<u8> = Rgb([0x2a, 0x2a, 0x2a]);
const PLACEHOLDER_CAPTION_COLOR: Rgb<u8> = Rgb([0x55, 0x55, 0x55]);
const PLACEHOLDER_CAPTION: &str = "NO PHOTO";

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 2;

/// A decoded, scaled image ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Thumbnail {
    #[getset(get_copy = "pub")]
    width: u32,
    #[getset(get_copy = "pub")]
    height: u32,
    /// RGBA8 pixels, row by row
    #[getset(get = "pub")]
    pixels: Vec<u8>,
    /// Whether this is the placeholder rather than the requested photo
    #[getset(get_copy = "pub")]
    is_placeholder: bool,
}

impl Thumbnail {
    fn from_image(image: &DynamicImage, is_placeholder: bool) -> Self {
        let scaled = if image.width() > THUMBNAIL_SIZE || image.height() > THUMBNAIL_SIZE {
            image.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
        } else {
            image.clone()
        };

        let rgba = scaled.to_rgba8();

        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
            is_placeholder,
        }
    }
}

/// Loads contact photos as thumbnails, falling back to a placeholder image stored on disk.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    placeholder_path: PathBuf,
}

impl ImageLoader {
    pub fn new(placeholder_path: impl Into<PathBuf>) -> Self {
        Self {
            placeholder_path: placeholder_path.into(),
        }
    }

    pub fn placeholder_path(&self) -> &Path {
        &self.placeholder_path
    }

    /// Make sure the placeholder image exists on disk, generating it if it doesn't. An existing
    /// file is never overwritten.
    pub fn ensure_placeholder(&self) -> ImageResult<&Path> {
        if !self.placeholder_path.exists() {
            if let Some(parent) = self
                .placeholder_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                fs::create_dir_all(parent)?;
            }

            render_placeholder().save(&self.placeholder_path)?;

            debug!(
                "Generated placeholder image at {}",
                self.placeholder_path.display()
            );
        }

        Ok(&self.placeholder_path)
    }

    /// Load the photo at `path` as a thumbnail. A missing path or an unreadable image yields the
    /// placeholder instead.
    pub fn load_thumbnail(&self, path: Option<&Path>) -> Thumbnail {
        if let Some(path) = path {
            match image::open(path) {
                Ok(image) => return Thumbnail::from_image(&image, false),
                Err(e) => debug!("Falling back to placeholder for {}: {e}", path.display()),
            }
        }

        self.placeholder()
    }

    /// The placeholder thumbnail. Rendered in memory if the file can't be created or read.
    pub fn placeholder(&self) -> Thumbnail {
        let image = self
            .ensure_placeholder()
            .and_then(image::open)
            .unwrap_or_else(|e| {
                debug!("Placeholder file unavailable, rendering in memory: {e}");
                DynamicImage::ImageRgb8(render_placeholder())
            });

        Thumbnail::from_image(&image, true)
    }
}

/// Draw the placeholder: a flat square with a centered caption.
fn render_placeholder() -> RgbImage {
    let mut image = RgbImage::from_pixel(THUMBNAIL_SIZE, THUMBNAIL_SIZE, PLACEHOLDER_BACKGROUND);
    draw_caption(&mut image, PLACEHOLDER_CAPTION, PLACEHOLDER_CAPTION_COLOR);
    image
}

fn draw_caption(image: &mut RgbImage, caption: &str, color: Rgb<u8>) {
    let advance = (GLYPH_WIDTH + 1) * GLYPH_SCALE;
    let chars = u32::try_from(caption.chars().count()).unwrap_or(u32::MAX);
    let caption_width = chars.saturating_mul(advance).saturating_sub(GLYPH_SCALE);

    let origin_x = image.width().saturating_sub(caption_width).div_euclid(2);
    let origin_y = image
        .height()
        .saturating_sub(GLYPH_HEIGHT * GLYPH_SCALE)
        .div_euclid(2);

    for (column, c) in (0u32..).zip(caption.chars()) {
        let glyph_x = origin_x.saturating_add(column.saturating_mul(advance));

        for (row, bits) in (0u32..).zip(glyph(c)) {
            for bit in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - bit)) == 0 {
                    continue;
                }

                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let x = glyph_x + bit * GLYPH_SCALE + dx;
                        let y = origin_y + row * GLYPH_SCALE + dy;

                        if x < image.width() && y < image.height() {
                            image.put_pixel(x, y, color);
                        }
                    }
                }
            }
        }
    }
}

/// 5x7 bitmaps for the characters the placeholder caption uses. Unknown characters are blank.
fn glyph(c: char) -> [u8; GLYPH_HEIGHT as usize] {
    match c {
        'H' => [
            0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ],
        'N' => [
            0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001,
        ],
        'O' => [
            0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ],
        'P' => [
            0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000,
        ],
        'T' => [
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ],
        _ => [0; GLYPH_HEIGHT as usize],
    }
}

#[cfg(test)]
mod test {
    use image::RgbaImage;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_photo_uses_placeholder() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().join("placeholder.png"));

        let thumbnail = loader.load_thumbnail(Some(&dir.path().join("nope.png")));

        assert!(thumbnail.is_placeholder());
        assert_eq!(thumbnail.width(), THUMBNAIL_SIZE);
        assert_eq!(thumbnail.height(), THUMBNAIL_SIZE);
        assert!(loader.placeholder_path().exists());
    }

    #[test]
    fn test_no_path_uses_placeholder() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().join("placeholder.png"));

        assert!(loader.load_thumbnail(None).is_placeholder());
    }

    #[test]
    fn test_corrupt_photo_uses_placeholder() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().join("placeholder.png"));
        let photo = dir.path().join("corrupt.png");
        fs::write(&photo, b"definitely not a png").unwrap();

        assert!(loader.load_thumbnail(Some(&photo)).is_placeholder());
    }

    #[test]
    fn test_scaling_preserves_aspect_ratio() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().join("placeholder.png"));
        let photo = dir.path().join("wide.png");
        RgbaImage::new(600, 200).save(&photo).unwrap();

        let thumbnail = loader.load_thumbnail(Some(&photo));

        assert!(!thumbnail.is_placeholder());
        assert_eq!(thumbnail.width(), 150);
        assert_eq!(thumbnail.height(), 50);
        assert_eq!(thumbnail.pixels().len(), 150 * 50 * 4);
    }

    #[test]
    fn test_small_photo_is_not_enlarged() {
        let dir = tempdir().unwrap();
        let loader = ImageLoader::new(dir.path().join("placeholder.png"));
        let photo = dir.path().join("small.png");
        RgbaImage::new(40, 20).save(&photo).unwrap();

        let thumbnail = loader.load_thumbnail(Some(&photo));

        assert_eq!((thumbnail.width(), thumbnail.height()), (40, 20));
    }

    #[test]
    fn test_existing_placeholder_is_reused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("placeholder.png");
        RgbaImage::new(10, 10).save(&path).unwrap();
        let loader = ImageLoader::new(&path);

        loader.ensure_placeholder().unwrap();
        let thumbnail = loader.load_thumbnail(None);

        assert_eq!((thumbnail.width(), thumbnail.height()), (10, 10));
    }

    #[test]
    fn test_unwritable_placeholder_renders_in_memory() {
        let dir = tempdir().unwrap();
        // A directory where the placeholder file should be makes both writing and reading fail
        let path = dir.path().join("placeholder.png");
        fs::create_dir(&path).unwrap();
        let loader = ImageLoader::new(&path);

        let thumbnail = loader.load_thumbnail(None);

        assert!(thumbnail.is_placeholder());
        assert_eq!(thumbnail.width(), THUMBNAIL_SIZE);
    }

    #[test]
    fn test_placeholder_has_caption() {
        let image = render_placeholder();

        assert!(image.pixels().any(|p| *p == PLACEHOLDER_CAPTION_COLOR));
        assert_eq!(*image.get_pixel(0, 0), PLACEHOLDER_BACKGROUND);
    }
}
