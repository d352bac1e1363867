//! Core library for drawing schedules.
//!
//! This crate provides:
//! - PDF word and annotation extraction
//! - Template-driven field extraction from title blocks
//! - File schedules with CSV export and copy/move plans
//! - Formula text with script markers and Greek symbols

pub mod error;
pub mod formula;
pub mod models;
pub mod pdf;
pub mod reader;
pub mod schedule;

pub use error::{DrawscanError, PdfError, Result, ScheduleError};
pub use formula::{FormatOptions, RichText, Script, format_text, revert_text};
pub use models::config::DrawscanConfig;
pub use pdf::{Annotation, LopdfDocument, PdfRectangle, PdfSource, Word};
pub use reader::{PdfReader, SearchBox};
pub use schedule::{FileSchedule, ScanSummary, ScheduleEntry, TransferMode, TransferReport};
