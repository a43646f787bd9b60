use crate::types::{DocumentResult, DocumentStats, PageTimings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input: String,
    pub total_pages: usize,
    pub processed_pages: usize,
    pub failed_pages: Vec<usize>,
    pub skipped_elements: usize,
    pub total_ms: f64,
    pub stats: DocumentStats,
    pub page_reports: Vec<PageReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page_index: usize,
    pub width: u32,
    pub height: u32,
    pub detected: usize,
    pub elements: usize,
    pub skipped: usize,
    pub timings: PageTimings,
}

impl RunReport {
    pub fn from_document(input: &str, doc: &DocumentResult) -> Self {
        Self {
            input: input.to_string(),
            total_pages: doc.total_pages,
            processed_pages: doc.processed_pages,
            failed_pages: doc.failed_pages.clone(),
            skipped_elements: doc.skipped_elements,
            total_ms: doc.total_ms,
            stats: doc.stats,
            page_reports: doc
                .pages
                .iter()
                .map(|p| PageReport {
                    page_index: p.page_index,
                    width: p.width,
                    height: p.height,
                    detected: p.detection.boxes.len(),
                    elements: p.elements.len(),
                    skipped: p.skipped_count(),
                    timings: p.timings,
                })
                .collect(),
        }
    }
}
