//! Wired/wireless table estimate from ruling-line density.
//!
//! A ruling pixel is an ink pixel inside a horizontal run at least
//! `cols * min_line_fraction` long, or a vertical run at least
//! `rows * min_line_fraction` long. This keeps exactly what a morphological
//! opening with a line-shaped kernel of that length would keep.

use crate::config;
use crate::types::TableType;
use image::{GrayImage, RgbImage};

#[derive(Debug, Clone, Copy)]
pub struct LineDensityEstimator {
    pub dark_threshold: u8,
    pub min_line_fraction: f32,
    pub wired_line_ratio: f32,
}

impl Default for LineDensityEstimator {
    fn default() -> Self {
        Self::from_config(&config::Table::default())
    }
}

impl LineDensityEstimator {
    pub fn from_config(cfg: &config::Table) -> Self {
        Self {
            dark_threshold: cfg.dark_threshold,
            min_line_fraction: cfg.min_line_fraction,
            wired_line_ratio: cfg.wired_line_ratio,
        }
    }

    pub fn estimate(&self, crop: &RgbImage) -> TableType {
        let (cols, rows) = crop.dimensions();
        if cols == 0 || rows == 0 {
            return TableType::Unknown;
        }
        let gray = image::imageops::grayscale(crop);
        let ratio = self.line_ratio(&gray);
        if ratio > self.wired_line_ratio {
            TableType::Wired
        } else {
            TableType::Wireless
        }
    }

    /// Share of crop pixels lying on a horizontal or vertical ruling line.
    pub fn line_ratio(&self, gray: &GrayImage) -> f32 {
        let (cols, rows) = gray.dimensions();
        if cols == 0 || rows == 0 {
            return 0.0;
        }
        let ink = |x: u32, y: u32| gray.get_pixel(x, y).0[0] < self.dark_threshold;
        let min_h = ((cols as f32 * self.min_line_fraction) as u32).max(1);
        let min_v = ((rows as f32 * self.min_line_fraction) as u32).max(1);

        let mut ruled = 0u64;
        for y in 0..rows {
            ruled += long_runs(cols, min_h, |x| ink(x, y));
        }
        for x in 0..cols {
            ruled += long_runs(rows, min_v, |y| ink(x, y));
        }
        ruled as f32 / (cols as u64 * rows as u64) as f32
    }
}

/// Total length of ink runs of at least `min_len` along one line.
fn long_runs(len: u32, min_len: u32, ink: impl Fn(u32) -> bool) -> u64 {
    let mut total = 0u64;
    let mut run = 0u32;
    for i in 0..len {
        if ink(i) {
            run += 1;
        } else {
            if run >= min_len {
                total += run as u64;
            }
            run = 0;
        }
    }
    if run >= min_len {
        total += run as u64;
    }
    total
}
