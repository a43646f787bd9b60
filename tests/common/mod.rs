#![allow(dead_code)]

use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use pageflow::engine::{
    ImageExtractor, LayoutDetector, PageImage, PageSource, Recognizers, TableOut, TableRecognizer,
    TextOut, TextRecognizer,
};
use pageflow::types::{Detection, LayoutBox, LayoutCategory, TableType};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn blank_page(page_index: usize, width: u32, height: u32) -> PageImage {
    PageImage::new(page_index, RgbImage::from_pixel(width, height, Rgb([255, 255, 255])), 200)
}

/// Draws a ruled grid over `(x0, y0, x1, y1)`.
pub fn draw_grid(page: &mut PageImage, (x0, y0, x1, y1): (u32, u32, u32, u32), rows: u32, cols: u32) {
    let black = Rgb([0, 0, 0]);
    for r in 0..=rows {
        let y = (y0 + (y1 - 1 - y0) * r / rows).min(y1 - 1);
        for x in x0..x1 {
            page.image.put_pixel(x, y, black);
        }
    }
    for c in 0..=cols {
        let x = (x0 + (x1 - 1 - x0) * c / cols).min(x1 - 1);
        for y in y0..y1 {
            page.image.put_pixel(x, y, black);
        }
    }
}

pub fn bx(x0: f32, y0: f32, x1: f32, y1: f32, category: LayoutCategory, index: usize) -> LayoutBox {
    LayoutBox::new(x0, y0, x1, y1, category).with_index(index)
}

/// Returns the same boxes for every page, or per-page boxes when set.
#[derive(Default)]
pub struct FixedDetector {
    pub boxes: Vec<LayoutBox>,
    pub per_page: HashMap<usize, Vec<LayoutBox>>,
    pub fail_pages: Vec<usize>,
    pub calls: Mutex<usize>,
}

impl FixedDetector {
    pub fn new(boxes: Vec<LayoutBox>) -> Self {
        Self {
            boxes,
            ..Default::default()
        }
    }
}

impl LayoutDetector for FixedDetector {
    fn detect(&self, page: &PageImage) -> Result<Detection> {
        *self.calls.lock().unwrap() += 1;
        if self.fail_pages.contains(&page.page_index) {
            return Err(anyhow!("detector crashed"));
        }
        let boxes = self
            .per_page
            .get(&page.page_index)
            .cloned()
            .unwrap_or_else(|| self.boxes.clone());
        Ok(Detection {
            boxes,
            inference_ms: 1.5,
        })
    }
}

/// Echoes `text-<index>`; fails for regions listed in `fail`.
#[derive(Default)]
pub struct EchoText {
    pub fail: Vec<usize>,
    pub calls: Mutex<Vec<usize>>,
}

impl TextRecognizer for EchoText {
    fn recognize(&self, _page: &PageImage, region: &LayoutBox) -> Result<TextOut> {
        self.calls.lock().unwrap().push(region.index);
        if self.fail.contains(&region.index) {
            return Err(anyhow!("ocr timeout"));
        }
        Ok(TextOut {
            text: format!("text-{}", region.index),
            confidence: 0.9,
        })
    }
}

/// Records call order; `forced` overrides the line-density estimate.
#[derive(Default)]
pub struct RecordingTables {
    pub forced: Option<TableType>,
    pub unsupported: bool,
    pub log: Mutex<Vec<String>>,
}

impl TableRecognizer for RecordingTables {
    fn recognize(&self, _page: &PageImage, region: &LayoutBox) -> Result<TableOut> {
        self.log.lock().unwrap().push(format!("recognize:{}", region.index));
        Ok(TableOut {
            html: if self.unsupported {
                String::new()
            } else {
                "<table><tr><td>1</td></tr></table>".to_string()
            },
            supported: !self.unsupported,
        })
    }

    fn estimate_type(&self, crop: &RgbImage) -> TableType {
        self.log.lock().unwrap().push("estimate".to_string());
        self.forced
            .unwrap_or_else(|| pageflow::table_type::LineDensityEstimator::default().estimate(crop))
    }
}

#[derive(Default)]
pub struct MemoryImages {
    pub names: Mutex<Vec<String>>,
}

impl ImageExtractor for MemoryImages {
    fn extract(&self, _page: &PageImage, _region: &LayoutBox, name: &str) -> Result<String> {
        self.names.lock().unwrap().push(name.to_string());
        Ok(format!("mem://{name}"))
    }
}

pub struct Fakes {
    pub detector: Arc<FixedDetector>,
    pub text: Arc<EchoText>,
    pub tables: Arc<RecordingTables>,
    pub images: Arc<MemoryImages>,
}

impl Fakes {
    pub fn new(detector: FixedDetector) -> Self {
        Self {
            detector: Arc::new(detector),
            text: Arc::new(EchoText::default()),
            tables: Arc::new(RecordingTables::default()),
            images: Arc::new(MemoryImages::default()),
        }
    }

    pub fn recognizers(&self) -> Recognizers {
        Recognizers {
            layout: self.detector.clone(),
            text: self.text.clone(),
            table: self.tables.clone(),
            images: self.images.clone(),
        }
    }
}

/// Blank pages; indices in `fail` cannot be rendered.
pub struct BlankSource {
    pub pages: usize,
    pub width: u32,
    pub height: u32,
    pub fail: Vec<usize>,
    pub rendered: Mutex<Vec<usize>>,
}

impl BlankSource {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            width: 1000,
            height: 1000,
            fail: Vec::new(),
            rendered: Mutex::new(Vec::new()),
        }
    }
}

impl PageSource for BlankSource {
    fn page_count(&self) -> Result<usize> {
        Ok(self.pages)
    }

    fn render(&self, page_index: usize) -> Result<PageImage> {
        self.rendered.lock().unwrap().push(page_index);
        if self.fail.contains(&page_index) {
            return Err(anyhow!("corrupt page stream"));
        }
        Ok(blank_page(page_index, self.width, self.height))
    }
}
