use serde::{Deserialize, Serialize};

/// Layout classes reported by the detector (PP-DocLayout label set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCategory {
    Text,
    Title,
    Figure,
    FigureCaption,
    Table,
    TableCaption,
    TableFootnote,
    Header,
    Footer,
    Reference,
    Equation,
    InterlineEquation,
    Stamp,
    Code,
    Toc,
    Abstract,
    Content,
    List,
    Index,
    Separator,
    #[serde(other)]
    Unknown,
}

impl LayoutCategory {
    pub const ALL: [LayoutCategory; 21] = [
        LayoutCategory::Text,
        LayoutCategory::Title,
        LayoutCategory::Figure,
        LayoutCategory::FigureCaption,
        LayoutCategory::Table,
        LayoutCategory::TableCaption,
        LayoutCategory::TableFootnote,
        LayoutCategory::Header,
        LayoutCategory::Footer,
        LayoutCategory::Reference,
        LayoutCategory::Equation,
        LayoutCategory::InterlineEquation,
        LayoutCategory::Stamp,
        LayoutCategory::Code,
        LayoutCategory::Toc,
        LayoutCategory::Abstract,
        LayoutCategory::Content,
        LayoutCategory::List,
        LayoutCategory::Index,
        LayoutCategory::Separator,
        LayoutCategory::Unknown,
    ];

    /// Maps a raw detector class id; anything outside 0..=19 is `Unknown`.
    pub fn from_id(id: i32) -> Self {
        usize::try_from(id)
            .ok()
            .filter(|&i| i < 20)
            .map(|i| Self::ALL[i])
            .unwrap_or(LayoutCategory::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutCategory::Text => "text",
            LayoutCategory::Title => "title",
            LayoutCategory::Figure => "figure",
            LayoutCategory::FigureCaption => "figure_caption",
            LayoutCategory::Table => "table",
            LayoutCategory::TableCaption => "table_caption",
            LayoutCategory::TableFootnote => "table_footnote",
            LayoutCategory::Header => "header",
            LayoutCategory::Footer => "footer",
            LayoutCategory::Reference => "reference",
            LayoutCategory::Equation => "equation",
            LayoutCategory::InterlineEquation => "interline_equation",
            LayoutCategory::Stamp => "stamp",
            LayoutCategory::Code => "code",
            LayoutCategory::Toc => "toc",
            LayoutCategory::Abstract => "abstract",
            LayoutCategory::Content => "content",
            LayoutCategory::List => "list",
            LayoutCategory::Index => "index",
            LayoutCategory::Separator => "separator",
            LayoutCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LayoutCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected region on a page, in page-pixel coordinates.
///
/// `index` is the detection order and never changes after the detector
/// produced the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub category: LayoutCategory,
    pub confidence: f32,
    pub index: usize,
}

impl LayoutBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32, category: LayoutCategory) -> Self {
        Self {
            x0,
            y0,
            x1: x1.max(x0),
            y1: y1.max(y0),
            category,
            confidence: 1.0,
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Integer crop rectangle `(x, y, w, h)` intersected with the page.
    /// `None` when nothing of the box lies on the page.
    pub fn crop_rect(&self, page_width: u32, page_height: u32) -> Option<(u32, u32, u32, u32)> {
        let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
        let x = clamp(self.x0, page_width);
        let y = clamp(self.y0, page_height);
        let right = clamp(self.x1, page_width);
        let bottom = clamp(self.y1, page_height);
        if right <= x || bottom <= y {
            return None;
        }
        Some((x, y, right - x, bottom - y))
    }

    /// Box on a 0-1000 grid relative to the page size.
    pub fn normalized(&self, page_width: u32, page_height: u32) -> [u32; 4] {
        let w = page_width.max(1) as f32;
        let h = page_height.max(1) as f32;
        let scale = |v: f32, dim: f32| ((v / dim * 1000.0).max(0.0) as u32).min(1000);
        [
            scale(self.x0, w),
            scale(self.y0, h),
            scale(self.x1, w),
            scale(self.y1, h),
        ]
    }
}

/// Detector output for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detection {
    pub boxes: Vec<LayoutBox>,
    /// Time reported by the detector itself.
    pub inference_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    Wired,
    Wireless,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Text,
    Title,
    Image,
    Table,
    Equation,
    Code,
    List,
    Header,
    Footer,
    Reference,
    Unknown,
}

impl ElementKind {
    pub fn for_category(category: LayoutCategory) -> Self {
        match category {
            LayoutCategory::Title => ElementKind::Title,
            LayoutCategory::Code => ElementKind::Code,
            LayoutCategory::List => ElementKind::List,
            LayoutCategory::Header => ElementKind::Header,
            LayoutCategory::Footer => ElementKind::Footer,
            LayoutCategory::Reference => ElementKind::Reference,
            LayoutCategory::Table => ElementKind::Table,
            LayoutCategory::Figure | LayoutCategory::Stamp => ElementKind::Image,
            LayoutCategory::Equation | LayoutCategory::InterlineEquation => ElementKind::Equation,
            LayoutCategory::Text
            | LayoutCategory::FigureCaption
            | LayoutCategory::TableCaption
            | LayoutCategory::TableFootnote
            | LayoutCategory::Toc
            | LayoutCategory::Abstract
            | LayoutCategory::Content
            | LayoutCategory::Index => ElementKind::Text,
            LayoutCategory::Separator | LayoutCategory::Unknown => ElementKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Image(String),
    Html(String),
    Placeholder(String),
}

impl Payload {
    pub fn as_str(&self) -> &str {
        match self {
            Payload::Text(s) | Payload::Image(s) | Payload::Html(s) | Payload::Placeholder(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentElement {
    pub kind: ElementKind,
    pub payload: Payload,
    pub layout_box: LayoutBox,
    pub page_index: usize,
    pub reading_order: usize,
    pub confidence: f32,
    /// A placeholder was emitted because no collaborator produced content.
    pub skipped: bool,
}

impl ContentElement {
    pub fn recognized(kind: ElementKind, payload: Payload, layout_box: LayoutBox, page_index: usize) -> Self {
        Self {
            kind,
            payload,
            confidence: layout_box.confidence,
            layout_box,
            page_index,
            reading_order: 0,
            skipped: false,
        }
    }

    pub fn skipped(kind: ElementKind, payload: Payload, layout_box: LayoutBox, page_index: usize) -> Self {
        Self {
            skipped: true,
            confidence: 0.0,
            ..Self::recognized(kind, payload, layout_box, page_index)
        }
    }
}

/// Wall-clock milliseconds spent per stage on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTimings {
    pub render_ms: f64,
    pub layout_ms: f64,
    pub layout_inference_ms: f64,
    pub ocr_ms: f64,
    pub table_ms: f64,
    pub figure_ms: f64,
    pub reading_order_ms: f64,
    pub total_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub page_index: usize,
    pub width: u32,
    pub height: u32,
    pub detection: Detection,
    /// Sorted by `reading_order`.
    pub elements: Vec<ContentElement>,
    pub timings: PageTimings,
}

impl PageResult {
    pub fn skipped_count(&self) -> usize {
        self.elements.iter().filter(|e| e.skipped).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub render_ms: f64,
    pub layout_ms: f64,
    pub ocr_ms: f64,
    pub table_ms: f64,
    pub figure_ms: f64,
    pub reading_order_ms: f64,
    pub output_ms: f64,
}

impl DocumentStats {
    pub fn absorb(&mut self, t: &PageTimings) {
        self.render_ms += t.render_ms;
        self.layout_ms += t.layout_ms;
        self.ocr_ms += t.ocr_ms;
        self.table_ms += t.table_ms;
        self.figure_ms += t.figure_ms;
        self.reading_order_ms += t.reading_order_ms;
    }
}

/// One export produced by an output serializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedOutput {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Ordered by page index.
    pub pages: Vec<PageResult>,
    pub total_pages: usize,
    pub processed_pages: usize,
    pub failed_pages: Vec<usize>,
    pub skipped_elements: usize,
    pub stats: DocumentStats,
    pub total_ms: f64,
    #[serde(skip)]
    pub outputs: Vec<SerializedOutput>,
}

impl DocumentResult {
    /// True when no page was processed (empty source or every page failed).
    pub fn is_empty(&self) -> bool {
        self.processed_pages == 0
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.content.as_str())
    }
}
