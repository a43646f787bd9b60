use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Rendered page raster.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 0-based page number in the source document.
    pub page_index: usize,
    pub image: RgbImage,
    pub dpi: u32,
}

impl PageImage {
    pub fn new(page_index: usize, image: RgbImage, dpi: u32) -> Self {
        Self {
            page_index,
            image,
            dpi,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy of the region `(x, y, w, h)`; callers clamp to the page first.
    pub fn crop(&self, (x, y, w, h): (u32, u32, u32, u32)) -> RgbImage {
        image::imageops::crop_imm(&self.image, x, y, w, h).to_image()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOut {
    pub text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOut {
    pub html: String,
    /// False when the recognizer could not handle this table.
    pub supported: bool,
}
