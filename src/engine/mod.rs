pub mod manifest;
pub mod png;
pub mod types;

use crate::table_type::LineDensityEstimator;
use crate::types::{Detection, DocumentResult, LayoutBox, SerializedOutput, TableType};
use anyhow::Result;
use image::RgbImage;
use std::sync::Arc;

pub use manifest::{Manifest, ManifestEngine};
pub use png::PngExtractor;
pub use types::{PageImage, TableOut, TextOut};

/// Ordered page rasters of one document.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> Result<usize>;
    fn render(&self, page_index: usize) -> Result<PageImage>;
}

pub trait LayoutDetector: Send + Sync {
    fn detect(&self, page: &PageImage) -> Result<Detection>;
}

pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, page: &PageImage, region: &LayoutBox) -> Result<TextOut>;
}

pub trait TableRecognizer: Send + Sync {
    fn recognize(&self, page: &PageImage, region: &LayoutBox) -> Result<TableOut>;

    /// Cheap routing estimate on the cropped table.
    fn estimate_type(&self, crop: &RgbImage) -> TableType {
        LineDensityEstimator::default().estimate(crop)
    }
}

pub trait ImageExtractor: Send + Sync {
    /// Stores the region and returns a reference to it. `name` is unique per
    /// document.
    fn extract(&self, page: &PageImage, region: &LayoutBox, name: &str) -> Result<String>;
}

pub trait OutputSerializer: Send + Sync {
    fn serialize(&self, doc: &DocumentResult) -> Result<SerializedOutput>;
}

pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, stage: &str, current: usize, total: usize);
}

/// Default observer.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _stage: &str, _current: usize, _total: usize) {}
}

/// Recognizer roles handed to the page processor.
#[derive(Clone)]
pub struct Recognizers {
    pub layout: Arc<dyn LayoutDetector>,
    pub text: Arc<dyn TextRecognizer>,
    pub table: Arc<dyn TableRecognizer>,
    pub images: Arc<dyn ImageExtractor>,
}

impl Recognizers {
    /// One value serving every role.
    pub fn from_shared<E>(engine: Arc<E>, images: Arc<dyn ImageExtractor>) -> Self
    where
        E: LayoutDetector + TextRecognizer + TableRecognizer + 'static,
    {
        Self {
            layout: engine.clone(),
            text: engine.clone(),
            table: engine,
            images,
        }
    }
}
