//! Error types for the drawscan-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the drawscan library.
#[derive(Error, Debug)]
pub enum DrawscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// File schedule error.
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The document reported a page it could not produce.
    #[error("page {0} is reported present but could not be read")]
    MissingPage(u32),

    /// A scan was requested before any template was loaded.
    #[error("no PDF template has been loaded")]
    TemplateNotLoaded,

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to file schedules.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The folder to list does not exist.
    #[error("folder path is invalid: {}", .0.display())]
    InvalidFolder(PathBuf),

    /// Bad glob pattern built from the folder path.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required schedule column is missing.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the drawscan library.
pub type Result<T> = std::result::Result<T, DrawscanError>;
