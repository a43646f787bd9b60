use crate::config::Stages;
use crate::types::LayoutCategory;
use serde::{Deserialize, Serialize};

/// Routing class of a detected box. Every category maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Text,
    Table,
    Figure,
    Unsupported,
}

pub fn bucket_for(category: LayoutCategory) -> Bucket {
    match category {
        LayoutCategory::Text
        | LayoutCategory::Title
        | LayoutCategory::FigureCaption
        | LayoutCategory::TableCaption
        | LayoutCategory::TableFootnote
        | LayoutCategory::Header
        | LayoutCategory::Footer
        | LayoutCategory::Reference
        | LayoutCategory::Code
        | LayoutCategory::Toc
        | LayoutCategory::Abstract
        | LayoutCategory::Content
        | LayoutCategory::List
        | LayoutCategory::Index => Bucket::Text,
        LayoutCategory::Table => Bucket::Table,
        LayoutCategory::Figure | LayoutCategory::Stamp => Bucket::Figure,
        LayoutCategory::Equation
        | LayoutCategory::InterlineEquation
        | LayoutCategory::Separator
        | LayoutCategory::Unknown => Bucket::Unsupported,
    }
}

/// Whether the configured stages can produce content for `category`.
///
/// Formula regions are never supported, even with `stages.formula` set: no
/// formula recognizer role exists.
pub fn is_supported(category: LayoutCategory, stages: &Stages) -> bool {
    match bucket_for(category) {
        Bucket::Text => stages.ocr,
        Bucket::Table => stages.wired_table,
        Bucket::Figure => stages.figures,
        Bucket::Unsupported => false,
    }
}

/// Bucket after the capability check: boxes no enabled stage can handle
/// become `Unsupported`.
pub fn route(category: LayoutCategory, stages: &Stages) -> Bucket {
    if is_supported(category, stages) {
        bucket_for(category)
    } else {
        Bucket::Unsupported
    }
}

/// Placeholder payload for a box routed to `Unsupported`.
pub fn unsupported_reason(category: LayoutCategory, stages: &Stages) -> String {
    match bucket_for(category) {
        Bucket::Unsupported => match category {
            LayoutCategory::Equation | LayoutCategory::InterlineEquation => {
                "[Formula: formula recognition is not available]".to_string()
            }
            other => format!("[Unsupported element type: {other}]"),
        },
        Bucket::Text if !stages.ocr => "[Text: text recognition disabled]".to_string(),
        Bucket::Table if !stages.wired_table => "[Table: table recognition disabled]".to_string(),
        Bucket::Figure if !stages.figures => "[Figure: image extraction disabled]".to_string(),
        _ => format!("[Unsupported element type: {category}]"),
    }
}
