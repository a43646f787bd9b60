use super::types::PageImage;
use super::ImageExtractor;
use crate::types::LayoutBox;
use crate::util::ensure_dir;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Writes figure crops as PNG files; references are file names relative to
/// `dir`.
pub struct PngExtractor {
    dir: PathBuf,
}

impl PngExtractor {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }
}

impl ImageExtractor for PngExtractor {
    fn extract(&self, page: &PageImage, region: &LayoutBox, name: &str) -> Result<String> {
        let rect = region
            .crop_rect(page.width(), page.height())
            .ok_or_else(|| anyhow!("region {} lies outside page {}", region.index, page.page_index))?;
        let filename = format!("{name}.png");
        let path = self.dir.join(&filename);
        page.crop(rect)
            .save(&path)
            .with_context(|| format!("writing figure: {}", path.display()))?;
        Ok(filename)
    }
}
