use crate::engine::OutputSerializer;
use crate::types::{DocumentResult, ElementKind, Payload, SerializedOutput};
use anyhow::Result;
use serde_json::{json, Value};

/// Flat JSON content list: one entry per element, pages in order, elements
/// in reading order, boxes on a 0-1000 grid.
pub struct ContentListWriter {
    name: String,
}

impl ContentListWriter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn entries(doc: &DocumentResult) -> Vec<Value> {
        let mut entries = Vec::new();
        for page in &doc.pages {
            for e in &page.elements {
                let mut entry = json!({
                    "type": e.kind,
                    "bbox": e.layout_box.normalized(page.width, page.height),
                    "page_idx": e.page_index,
                    "reading_order": e.reading_order,
                    "skipped": e.skipped,
                });
                let key = match (&e.payload, e.kind) {
                    (Payload::Image(_), _) => "img_path",
                    (Payload::Html(_), _) => "table_body",
                    (_, ElementKind::Equation) => "latex",
                    _ => "text",
                };
                entry[key] = Value::String(e.payload.as_str().to_string());
                entries.push(entry);
            }
        }
        entries
    }
}

impl OutputSerializer for ContentListWriter {
    fn serialize(&self, doc: &DocumentResult) -> Result<SerializedOutput> {
        Ok(SerializedOutput {
            name: self.name.clone(),
            content: serde_json::to_string_pretty(&Self::entries(doc))?,
        })
    }
}
