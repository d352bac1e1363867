//! File schedules: folder listings with per-file PDF field columns, and
//! copy/move plans driven by a schedule CSV.

mod table;
mod transfer;

pub use table::read_transfer_plan;
pub use transfer::{TransferItem, TransferMode, TransferReport, transfer_files};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use glob::{Pattern, glob};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PdfError, ScheduleError};
use crate::models::config::ScheduleConfig;
use crate::reader::PdfReader;

/// Result type for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Parse a yes/no style cell value.
///
/// Accepts `true`, `yes`, `1`, `false`, `no` and `0` in any case.
pub fn parse_text_to_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// One file in a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub full_path: PathBuf,
    /// File name without extension.
    pub file_name: String,
    /// Extension with its leading dot, empty when the file has none.
    pub extension: String,
    pub modified: Option<DateTime<Local>>,
    /// Values of the scan columns, in column order.
    #[serde(default)]
    pub fields: Vec<Option<String>>,
}

impl ScheduleEntry {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from);

        Self {
            full_path: path,
            file_name,
            extension,
            modified,
            fields: Vec::new(),
        }
    }

    fn has_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        self.extension
            .strip_prefix('.')
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }
}

/// Outcome of scanning the PDFs in a schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scanned: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
}

/// A listing of files plus any scan columns added to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSchedule {
    pub config: ScheduleConfig,
    /// Names of the scan columns.
    pub columns: Vec<String>,
    pub entries: Vec<ScheduleEntry>,
}

impl FileSchedule {
    /// Create an empty schedule.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            columns: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// List every file in `folder`, recursing when `search_subfolders` is set.
    pub fn scan_folder(folder: impl AsRef<Path>, search_subfolders: bool) -> Result<Self> {
        let mut schedule = Self::new(ScheduleConfig::default());
        schedule.load_folder(folder, search_subfolders)?;
        Ok(schedule)
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the entries with the files found in `folder`.
    pub fn load_folder(&mut self, folder: impl AsRef<Path>, search_subfolders: bool) -> Result<usize> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(ScheduleError::InvalidFolder(folder.to_path_buf()));
        }

        let prefix = Pattern::escape(&folder.to_string_lossy());
        let pattern = if search_subfolders {
            format!("{}/**/*", prefix)
        } else {
            format!("{}/*", prefix)
        };
        debug!("Listing files matching {}", pattern);

        let mut paths: Vec<PathBuf> = glob(&pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        self.columns.clear();
        self.entries = paths.into_iter().map(ScheduleEntry::from_path).collect();

        info!("Found {} files in {}", self.entries.len(), folder.display());
        Ok(self.entries.len())
    }

    /// Scan every PDF entry with the reader's template.
    ///
    /// Adds one column per search box. Rows that are not PDFs, or whose scan
    /// fails, get empty cells.
    pub fn scan_pdfs(&mut self, reader: &mut PdfReader) -> std::result::Result<ScanSummary, PdfError> {
        if !reader.has_template() {
            return Err(PdfError::TemplateNotLoaded);
        }

        let names: Vec<String> = reader.search_boxes().iter().map(|b| b.name.clone()).collect();
        let width = names.len();
        let mut summary = ScanSummary::default();

        for entry in &mut self.entries {
            if !entry.has_extension(&self.config.pdf_extension) {
                entry.fields.extend(std::iter::repeat_n(None, width));
                continue;
            }

            match reader.scan_pdf(&entry.full_path) {
                Ok(found) => {
                    summary.scanned += 1;
                    entry.fields.extend(found);
                }
                Err(e) => {
                    warn!("Failed to scan {}: {}", entry.full_path.display(), e);
                    summary.failed += 1;
                    summary
                        .warnings
                        .push(format!("{}: {}", entry.full_path.display(), e));
                    entry.fields.extend(std::iter::repeat_n(None, width));
                }
            }
        }

        self.columns.extend(names);
        Ok(summary)
    }

    /// Paths of the entries with the configured PDF extension.
    pub fn pdf_paths(&self) -> Vec<&Path> {
        self.entries
            .iter()
            .filter(|e| e.has_extension(&self.config.pdf_extension))
            .map(|e| e.full_path.as_path())
            .collect()
    }

    /// Write the schedule as CSV.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        table::write_schedule(self, writer)
    }
}
