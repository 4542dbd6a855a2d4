use std::path::Path;

use image::imageops::flip_vertical_in_place;
use image::DynamicImage;

use crate::error::AssetError;

const BYTES_PER_PIXEL: usize = 4;

/// Decodes the image at `path`.
pub fn load_image(path: &Path) -> Result<DynamicImage, AssetError> {
    image::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Tightly packed RGBA8 pixels, ready for a single texture upload.
#[derive(Debug, Clone)]
pub struct RgbaPixels {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl RgbaPixels {
    /// Wraps a raw pixel buffer whose rows start `stride` bytes apart.
    ///
    /// Rows padded beyond `width * 4` bytes are rejected rather than repacked.
    pub fn new(width: u32, height: u32, stride: usize, bytes: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * BYTES_PER_PIXEL;
        if stride != expected {
            return Err(AssetError::Stride {
                expected,
                actual: stride,
            });
        }
        if bytes.len() != expected * height as usize {
            return Err(AssetError::Stride {
                expected,
                actual: bytes.len().checked_div(height as usize).unwrap_or(0),
            });
        }

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Converts any decoded image to RGBA8. Rows are flipped so the bottom
    /// row comes first, matching the `v = 0` bottom edge of the quad texture
    /// coordinates.
    pub fn from_image(image: &DynamicImage) -> Result<Self, AssetError> {
        let mut rgba = image.to_rgba8();
        flip_vertical_in_place(&mut rgba);
        let (width, height) = rgba.dimensions();
        let stride = rgba.sample_layout().height_stride;
        Self::new(width, height, stride, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
