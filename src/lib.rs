//! Page analysis orchestration with geometric reading order.
//!
//! Detected layout boxes are routed to recognizer roles by category, their
//! outputs merged per page, and the merged elements put into reading order by
//! recursive projection cutting ([`reading_order`]). Recognizers, page sources
//! and serializers are traits in [`engine`]; the core owns no model.

pub mod capability;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod reading_order;
pub mod report;
pub mod table_type;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::ConfigError;
pub use pipeline::Pipeline;
pub use types::{ContentElement, DocumentResult, LayoutBox, LayoutCategory, PageResult};
