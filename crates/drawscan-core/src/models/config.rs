//! Configuration structures for the scanning pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DrawscanError, Result};

/// Main configuration for drawscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawscanConfig {
    /// PDF word extraction configuration.
    pub pdf: PdfConfig,

    /// Word grouping configuration.
    pub segmenter: SegmenterConfig,

    /// File schedule configuration.
    pub schedule: ScheduleConfig,

    /// Formula text configuration.
    pub formula: FormulaConfig,
}

/// PDF word extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// A horizontal gap wider than this fraction of the font size starts a new word.
    pub word_gap_ratio: f32,

    /// Baseline shift (in em) tolerated inside one word.
    pub baseline_tolerance: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            word_gap_ratio: 0.25,
            baseline_tolerance: 0.3,
        }
    }
}

/// Configuration of the default page segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Words whose baselines differ by less than this fraction of the font size share a line.
    pub line_tolerance: f32,

    /// Lines closer than this multiple of the line height stay in the same block.
    pub block_gap_ratio: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 0.5,
            block_gap_ratio: 1.5,
        }
    }
}

/// File schedule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Search subfolders when listing a folder.
    pub search_subfolders: bool,

    /// Extension (without dot) of files that get scanned.
    pub pdf_extension: String,

    /// Column header names.
    pub columns: ScheduleColumns,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            search_subfolders: false,
            pdf_extension: "pdf".to_string(),
            columns: ScheduleColumns::default(),
        }
    }
}

/// Header names used in schedule CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleColumns {
    pub full_path: String,
    pub file_name: String,
    pub extension: String,
    pub modified: String,
    pub copy_move_path: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            full_path: "FullPath".to_string(),
            file_name: "FileName".to_string(),
            extension: "Ext.".to_string(),
            modified: "Date Mod.".to_string(),
            copy_move_path: "CopyMovePath".to_string(),
        }
    }
}

/// Formula text configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaConfig {
    /// Apply `^` / `_` markers.
    pub subscripts_superscripts: bool,

    /// Replace `\name` sequences with symbols.
    pub symbols: bool,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            subscripts_superscripts: true,
            symbols: true,
        }
    }
}

impl DrawscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DrawscanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DrawscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Value at a dotted key such as `segmenter.line_tolerance`.
    pub fn value(&self, key: &str) -> Result<Value> {
        let json = serde_json::to_value(self).map_err(|e| DrawscanError::Config(e.to_string()))?;
        key.split('.')
            .try_fold(&json, |node, part| node.get(part))
            .cloned()
            .ok_or_else(|| key_not_found(key))
    }

    /// Replace the value at a dotted key and return what was stored.
    ///
    /// Text that does not parse as JSON is stored as a string. The new value
    /// must still deserialize into the key's type.
    pub fn set_value(&mut self, key: &str, text: &str) -> Result<Value> {
        let value = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));

        let mut json = serde_json::to_value(&*self).map_err(|e| DrawscanError::Config(e.to_string()))?;
        let slot = key
            .split('.')
            .try_fold(&mut json, |node, part| node.get_mut(part))
            .ok_or_else(|| key_not_found(key))?;
        *slot = value.clone();

        *self = serde_json::from_value(json)
            .map_err(|e| DrawscanError::Config(format!("invalid value for {}: {}", key, e)))?;
        Ok(value)
    }
}

fn key_not_found(key: &str) -> DrawscanError {
    DrawscanError::Config(format!("Configuration key not found: {}", key))
}
