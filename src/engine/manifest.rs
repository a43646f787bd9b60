//! Replay collaborators backed by a JSON manifest of precomputed detections.
//!
//! The manifest lists page rasters together with the regions a layout model
//! found on them and, per region, the transcript or table markup a recognizer
//! produced. Replaying it drives the full page pipeline without any model.

use super::types::{PageImage, TableOut, TextOut};
use super::{LayoutDetector, PageSource, TableRecognizer, TextRecognizer};
use crate::table_type::LineDensityEstimator;
use crate::types::{Detection, LayoutBox, LayoutCategory, TableType};
use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Raster resolution; falls back to the engine's configured dpi.
    #[serde(default)]
    pub dpi: Option<u32>,
    pub pages: Vec<ManifestPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPage {
    /// Raster path, relative to the manifest file.
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// Size of a blank page when no raster is given.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub regions: Vec<ManifestRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRegion {
    pub bbox: [f32; 4],
    pub category: LayoutCategory,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

fn default_confidence() -> f32 {
    1.0
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest: {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing manifest: {}", path.display()))
    }
}

pub struct ManifestEngine {
    manifest: Manifest,
    base_dir: PathBuf,
    estimator: LineDensityEstimator,
    dpi: u32,
}

impl ManifestEngine {
    pub fn new(manifest: Manifest, base_dir: impl Into<PathBuf>, estimator: LineDensityEstimator) -> Self {
        Self {
            manifest,
            base_dir: base_dir.into(),
            estimator,
            dpi: crate::config::Runtime::default().dpi,
        }
    }

    /// Resolution reported for pages when the manifest names none.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn open(path: &Path, estimator: LineDensityEstimator) -> Result<Self> {
        let manifest = Manifest::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(Self::new(manifest, base_dir, estimator))
    }

    fn page(&self, page_index: usize) -> Result<&ManifestPage> {
        self.manifest
            .pages
            .get(page_index)
            .ok_or_else(|| anyhow!("page {page_index} is not in the manifest"))
    }

    fn region(&self, page_index: usize, region: &LayoutBox) -> Result<&ManifestRegion> {
        self.page(page_index)?
            .regions
            .get(region.index)
            .ok_or_else(|| anyhow!("region {} is not on page {page_index}", region.index))
    }
}

impl PageSource for ManifestEngine {
    fn page_count(&self) -> Result<usize> {
        Ok(self.manifest.pages.len())
    }

    fn render(&self, page_index: usize) -> Result<PageImage> {
        let page = self.page(page_index)?;
        let image = match (&page.image, page.width, page.height) {
            (Some(rel), _, _) => {
                let path = self.base_dir.join(rel);
                debug!("loading page {} from {}", page_index, path.display());
                image::open(&path)
                    .with_context(|| format!("decoding page image: {}", path.display()))?
                    .to_rgb8()
            }
            (None, Some(w), Some(h)) => RgbImage::from_pixel(w, h, Rgb([255, 255, 255])),
            _ => return Err(anyhow!("page {page_index} has neither an image nor a size")),
        };
        Ok(PageImage::new(
            page_index,
            image,
            self.manifest.dpi.unwrap_or(self.dpi),
        ))
    }
}

impl LayoutDetector for ManifestEngine {
    fn detect(&self, page: &PageImage) -> Result<Detection> {
        let boxes = self
            .page(page.page_index)?
            .regions
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let [x0, y0, x1, y1] = r.bbox;
                LayoutBox::new(x0, y0, x1, y1, r.category)
                    .with_confidence(r.confidence)
                    .with_index(i)
            })
            .collect();
        Ok(Detection {
            boxes,
            inference_ms: 0.0,
        })
    }
}

impl TextRecognizer for ManifestEngine {
    fn recognize(&self, page: &PageImage, region: &LayoutBox) -> Result<TextOut> {
        let r = self.region(page.page_index, region)?;
        let text = r.text.clone().ok_or_else(|| {
            anyhow!(
                "no transcript for {} region {} on page {}",
                region.category,
                region.index,
                page.page_index
            )
        })?;
        Ok(TextOut {
            text,
            confidence: r.confidence,
        })
    }
}

impl TableRecognizer for ManifestEngine {
    fn recognize(&self, page: &PageImage, region: &LayoutBox) -> Result<TableOut> {
        let r = self.region(page.page_index, region)?;
        Ok(match &r.html {
            Some(html) => TableOut {
                html: html.clone(),
                supported: true,
            },
            None => TableOut {
                html: String::new(),
                supported: false,
            },
        })
    }

    fn estimate_type(&self, crop: &RgbImage) -> TableType {
        self.estimator.estimate(crop)
    }
}
