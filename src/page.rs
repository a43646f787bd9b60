use crate::capability::{route, unsupported_reason, Bucket};
use crate::config::Config;
use crate::engine::{PageImage, Recognizers};
use crate::error::check_page_size;
use crate::reading_order;
use crate::types::{
    ContentElement, Detection, ElementKind, LayoutBox, PageResult, PageTimings, Payload, TableType,
};
use crate::util::elapsed_ms;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

const WIRELESS_TABLE_PLACEHOLDER: &str = "<!-- Wireless table: no wireless table recognizer -->";
const UNPROCESSED_TABLE_PLACEHOLDER: &str = "<!-- Table: recognizer could not process this table -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStage {
    Detecting,
    Routing,
    Recognizing,
    Ordering,
    Assembled,
}

impl PageStage {
    pub fn next(self) -> PageStage {
        match self {
            PageStage::Detecting => PageStage::Routing,
            PageStage::Routing => PageStage::Recognizing,
            PageStage::Recognizing => PageStage::Ordering,
            PageStage::Ordering | PageStage::Assembled => PageStage::Assembled,
        }
    }
}

/// Detected boxes split into disjoint buckets, detection order kept.
#[derive(Debug, Clone, Default)]
pub struct RoutedBoxes {
    pub text: Vec<LayoutBox>,
    pub table: Vec<LayoutBox>,
    pub figure: Vec<LayoutBox>,
    pub unsupported: Vec<LayoutBox>,
}

impl RoutedBoxes {
    pub fn len(&self) -> usize {
        self.text.len() + self.table.len() + self.figure.len() + self.unsupported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn route_boxes(boxes: &[LayoutBox], stages: &crate::config::Stages) -> RoutedBoxes {
    let mut routed = RoutedBoxes::default();
    for b in boxes {
        match route(b.category, stages) {
            Bucket::Text => routed.text.push(*b),
            Bucket::Table => routed.table.push(*b),
            Bucket::Figure => routed.figure.push(*b),
            Bucket::Unsupported => routed.unsupported.push(*b),
        }
    }
    routed
}

/// Runs one page through detection, routing, recognition and ordering.
pub struct PageProcessor<'a> {
    cfg: &'a Config,
    recognizers: &'a Recognizers,
}

impl<'a> PageProcessor<'a> {
    pub fn new(cfg: &'a Config, recognizers: &'a Recognizers) -> Self {
        Self { cfg, recognizers }
    }

    pub fn process(&self, page: &PageImage) -> Result<PageResult> {
        let started = Instant::now();
        let (width, height) = (page.width(), page.height());
        check_page_size(width, height)
            .with_context(|| format!("page {}", page.page_index))?;
        self.cfg.reading_order.validate()?;

        let mut timings = PageTimings::default();
        let mut stage = PageStage::Detecting;

        let detection = if self.cfg.stages.layout {
            let t = Instant::now();
            let d = self
                .recognizers
                .layout
                .detect(page)
                .with_context(|| format!("layout detection failed on page {}", page.page_index))?;
            timings.layout_ms = elapsed_ms(t);
            timings.layout_inference_ms = d.inference_ms;
            d
        } else {
            Detection::default()
        };
        debug!(
            page = page.page_index,
            boxes = detection.boxes.len(),
            "layout detected"
        );

        if detection.boxes.is_empty() {
            timings.total_ms = elapsed_ms(started);
            return Ok(PageResult {
                page_index: page.page_index,
                width,
                height,
                detection,
                elements: Vec::new(),
                timings,
            });
        }

        stage = self.advance(stage, page);
        let routed = route_boxes(&detection.boxes, &self.cfg.stages);
        debug!(
            page = page.page_index,
            text = routed.text.len(),
            table = routed.table.len(),
            figure = routed.figure.len(),
            unsupported = routed.unsupported.len(),
            "routed"
        );

        stage = self.advance(stage, page);
        let mut elements = Vec::with_capacity(routed.len());

        let t = Instant::now();
        for b in &routed.text {
            elements.push(self.recognize_text(page, b));
        }
        timings.ocr_ms = elapsed_ms(t);

        let t = Instant::now();
        for b in &routed.table {
            elements.push(self.recognize_table(page, b));
        }
        timings.table_ms = elapsed_ms(t);

        let t = Instant::now();
        for (i, b) in routed.figure.iter().enumerate() {
            if let Some(e) = self.extract_figure(page, b, i) {
                elements.push(e);
            }
        }
        timings.figure_ms = elapsed_ms(t);

        for b in &routed.unsupported {
            debug!(
                "skipping unsupported {} at ({}, {}) on page {}",
                b.category, b.x0, b.y0, page.page_index
            );
            elements.push(ContentElement::skipped(
                ElementKind::for_category(b.category),
                Payload::Placeholder(unsupported_reason(b.category, &self.cfg.stages)),
                *b,
                page.page_index,
            ));
        }

        stage = self.advance(stage, page);
        let t = Instant::now();
        let elements = self.order(elements, width, height);
        timings.reading_order_ms = elapsed_ms(t);

        self.advance(stage, page);
        timings.total_ms = elapsed_ms(started);

        Ok(PageResult {
            page_index: page.page_index,
            width,
            height,
            detection,
            elements,
            timings,
        })
    }

    fn advance(&self, stage: PageStage, page: &PageImage) -> PageStage {
        let next = stage.next();
        trace!(page = page.page_index, from = ?stage, to = ?next, "page stage");
        next
    }

    fn recognize_text(&self, page: &PageImage, b: &LayoutBox) -> ContentElement {
        match self.recognizers.text.recognize(page, b) {
            Ok(out) => {
                let mut e = ContentElement::recognized(
                    ElementKind::for_category(b.category),
                    Payload::Text(out.text),
                    *b,
                    page.page_index,
                );
                e.confidence = out.confidence;
                e
            }
            Err(err) => failed(b, page, &err),
        }
    }

    fn recognize_table(&self, page: &PageImage, b: &LayoutBox) -> ContentElement {
        let table_type = match b.crop_rect(page.width(), page.height()) {
            Some(rect) => self.recognizers.table.estimate_type(&page.crop(rect)),
            None => TableType::Unknown,
        };
        trace!(page = page.page_index, region = b.index, ?table_type, "table type");

        if table_type == TableType::Wireless && !self.cfg.stages.wireless_table {
            warn!(
                "skipping wireless table at ({}, {}) on page {}",
                b.x0, b.y0, page.page_index
            );
            return ContentElement::skipped(
                ElementKind::Table,
                Payload::Html(WIRELESS_TABLE_PLACEHOLDER.to_string()),
                *b,
                page.page_index,
            );
        }

        match self.recognizers.table.recognize(page, b) {
            Ok(out) if out.supported => {
                ContentElement::recognized(ElementKind::Table, Payload::Html(out.html), *b, page.page_index)
            }
            Ok(out) => {
                let html = if out.html.is_empty() {
                    UNPROCESSED_TABLE_PLACEHOLDER.to_string()
                } else {
                    out.html
                };
                ContentElement::skipped(ElementKind::Table, Payload::Html(html), *b, page.page_index)
            }
            Err(err) => failed(b, page, &err),
        }
    }

    /// `None` for figures entirely off the page; those are dropped.
    fn extract_figure(&self, page: &PageImage, b: &LayoutBox, nth: usize) -> Option<ContentElement> {
        if b.crop_rect(page.width(), page.height()).is_none() {
            debug!(
                "dropping figure {} with empty crop on page {}",
                b.index, page.page_index
            );
            return None;
        }
        let name = format!("page{}_fig{}", page.page_index, nth);
        Some(match self.recognizers.images.extract(page, b, &name) {
            Ok(reference) => {
                ContentElement::recognized(ElementKind::Image, Payload::Image(reference), *b, page.page_index)
            }
            Err(err) => failed(b, page, &err),
        })
    }

    /// Reorders every element of the page and stamps dense reading order.
    fn order(&self, elements: Vec<ContentElement>, width: u32, height: u32) -> Vec<ContentElement> {
        let permutation = if self.cfg.stages.reading_order {
            let boxes: Vec<LayoutBox> = elements.iter().map(|e| e.layout_box).collect();
            reading_order::order(&boxes, width, height, &self.cfg.reading_order)
        } else {
            (0..elements.len()).collect()
        };

        let mut slots: Vec<Option<ContentElement>> = elements.into_iter().map(Some).collect();
        permutation
            .into_iter()
            .filter_map(|i| slots.get_mut(i).and_then(Option::take))
            .enumerate()
            .map(|(rank, mut e)| {
                e.reading_order = rank;
                e
            })
            .collect()
    }
}

fn failed(b: &LayoutBox, page: &PageImage, err: &anyhow::Error) -> ContentElement {
    warn!(
        "recognition failed for {} region {} on page {}: {:#}",
        b.category, b.index, page.page_index, err
    );
    ContentElement::skipped(
        ElementKind::for_category(b.category),
        Payload::Placeholder(format!("[Recognition failed: {err:#}]")),
        *b,
        page.page_index,
    )
}
