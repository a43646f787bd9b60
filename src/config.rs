use crate::error::{check_threshold, ConfigError};
use crate::reading_order::ReadingOrderConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stages: Stages,
    #[serde(default)]
    pub reading_order: ReadingOrderConfig,
    #[serde(default)]
    pub table: Table,
    #[serde(default)]
    pub runtime: Runtime,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reading_order.validate()?;
        check_threshold("table.min_line_fraction", self.table.min_line_fraction)?;
        check_threshold("table.wired_line_ratio", self.table.wired_line_ratio)?;
        if self.runtime.max_concurrent_pages == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.output.content_list_filename.is_empty() {
            return Err(ConfigError::EmptyField {
                name: "output.content_list_filename",
            });
        }
        Ok(())
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

/// Stage switches. Formula, wireless-table and table-classification stages
/// have no recognizer role and stay off by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Stages {
    pub layout: bool,
    pub ocr: bool,
    pub wired_table: bool,
    pub figures: bool,
    pub reading_order: bool,
    pub content_list: bool,
    pub formula: bool,
    pub wireless_table: bool,
    /// Inert: no classifier role exists, so tables are always typed by
    /// `TableRecognizer::estimate_type`.
    pub table_classify: bool,
}
impl Default for Stages {
    fn default() -> Self {
        Self {
            layout: true,
            ocr: true,
            wired_table: true,
            figures: true,
            reading_order: true,
            content_list: true,
            formula: false,
            wireless_table: false,
            table_classify: false,
        }
    }
}

/// Line-density table-type heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    /// Luma below this counts as ink.
    pub dark_threshold: u8,
    /// A ruling line spans at least this fraction of the crop side.
    pub min_line_fraction: f32,
    /// Ruling pixels per crop pixel above which a table is wired.
    pub wired_line_ratio: f32,
}
impl Default for Table {
    fn default() -> Self {
        Self {
            dark_threshold: 128,
            min_line_fraction: 0.25,
            wired_line_ratio: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Runtime {
    /// 0 processes every page.
    pub max_pages: usize,
    /// 1 processes pages sequentially on the calling thread.
    pub max_concurrent_pages: usize,
    /// Resolution assumed for page rasters whose source does not state one.
    pub dpi: u32,
}
impl Default for Runtime {
    fn default() -> Self {
        Self {
            max_pages: 0,
            max_concurrent_pages: 4,
            dpi: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub out_dir: String,
    pub image_dir: String,
    pub content_list_filename: String,
    pub report_filename: String,
    pub write_report_json: bool,
    pub write_index_json: bool,
    pub resume: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            image_dir: "images".into(),
            content_list_filename: "content_list.json".into(),
            report_filename: "report.json".into(),
            write_report_json: true,
            write_index_json: true,
            resume: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}
