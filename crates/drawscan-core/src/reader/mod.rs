//! Template-driven field extraction.
//!
//! A template PDF carries one annotation per field on its first page. The
//! annotation rectangles become [`SearchBox`]es, and every scanned PDF reports
//! the text found inside each box, in template order.

mod search_box;

pub use search_box::SearchBox;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::PdfError;
use crate::models::config::DrawscanConfig;
use crate::pdf::{DefaultPageSegmenter, LopdfDocument, PageSegmenter, PdfSource, Result};

const MULTI_PAGE_WARNING: &str = "Pdf has more than 1 page, only the first page will be used.";

/// Reads search regions from a template and scans PDFs with them.
pub struct PdfReader {
    config: DrawscanConfig,
    segmenter: Box<dyn PageSegmenter>,
    search_boxes: Option<Vec<SearchBox>>,
    template_messages: Vec<String>,
    warnings: Vec<String>,
}

impl PdfReader {
    /// Create a reader with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DrawscanConfig::default())
    }

    /// Create a reader with the given configuration.
    pub fn with_config(config: DrawscanConfig) -> Self {
        let segmenter = DefaultPageSegmenter::with_config(config.segmenter.clone());
        Self {
            config,
            segmenter: Box::new(segmenter),
            search_boxes: None,
            template_messages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Replace the page segmenter.
    pub fn with_segmenter(mut self, segmenter: impl PageSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Load search boxes from a template PDF file.
    pub fn set_template(&mut self, path: impl AsRef<Path>) -> Result<&[SearchBox]> {
        self.template_messages.clear();
        self.search_boxes = None;

        let document = LopdfDocument::open(path.as_ref(), self.config.pdf.clone())?;
        self.load_template(&document)
    }

    /// Load search boxes from the first page of a template document.
    ///
    /// Any previously loaded boxes are discarded, also when loading fails.
    pub fn load_template(&mut self, document: &dyn PdfSource) -> Result<&[SearchBox]> {
        self.template_messages.clear();
        self.search_boxes = None;

        let page_count = document.page_count();
        if page_count == 0 {
            self.template_messages.push("Template Pdf has no pages.".to_string());
            return Err(PdfError::NoPages);
        }
        if page_count > 1 {
            self.template_messages.push(MULTI_PAGE_WARNING.to_string());
        }

        let boxes = SearchBox::from_annotations(document.annotations(1)?);
        let words = document.words(1)?;

        self.template_messages
            .push(format!("Found {}No. search regions.:", boxes.len()));
        for search_box in &boxes {
            let centre = search_box.rectangle.centroid();
            let example = search_box
                .get_text(&words, self.segmenter.as_ref())
                .unwrap_or_default();
            self.template_messages.push(format!(
                "> Region tagged \"{}\" @[{},{}] with example text: {}",
                search_box.name, centre.x, centre.y, example
            ));
        }

        info!("Loaded template with {} search regions", boxes.len());
        let boxes = self.search_boxes.insert(boxes);
        Ok(boxes.as_slice())
    }

    /// Scan a PDF file with the loaded search boxes.
    pub fn scan_pdf(&mut self, path: impl AsRef<Path>) -> Result<Vec<Option<String>>> {
        let path = path.as_ref();
        if self.search_boxes.is_none() {
            return Err(PdfError::TemplateNotLoaded);
        }
        let document = LopdfDocument::open(path, self.config.pdf.clone())?;
        debug!("Scanning {}", path.display());
        self.scan_document(&document)
    }

    /// Scan the first page of a document.
    ///
    /// Returns the text found in each search box, in search box order.
    pub fn scan_document(&mut self, document: &dyn PdfSource) -> Result<Vec<Option<String>>> {
        let boxes = self.search_boxes.as_ref().ok_or(PdfError::TemplateNotLoaded)?;

        let page_count = document.page_count();
        if page_count == 0 {
            self.warnings.push("Pdf has no pages.".to_string());
            return Err(PdfError::NoPages);
        }
        if page_count > 1 {
            warn!("{}", MULTI_PAGE_WARNING);
            self.warnings.push(MULTI_PAGE_WARNING.to_string());
        }

        let words = document.words(1)?;
        let found = boxes
            .iter()
            .map(|b| b.get_text(&words, self.segmenter.as_ref()))
            .collect::<Vec<_>>();

        debug!(
            "Filled {}/{} search regions",
            found.iter().filter(|f| f.is_some()).count(),
            found.len()
        );
        Ok(found)
    }

    /// Whether a template has been loaded successfully.
    pub fn has_template(&self) -> bool {
        self.search_boxes.is_some()
    }

    /// The loaded search boxes, empty before a template is loaded.
    pub fn search_boxes(&self) -> &[SearchBox] {
        self.search_boxes.as_deref().unwrap_or_default()
    }

    /// Messages from the last template load.
    pub fn template_messages(&self) -> &[String] {
        &self.template_messages
    }

    /// Warnings accumulated by scans since the last [`clear_warnings`](Self::clear_warnings).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    /// Preamble and all scan warnings, one per line.
    pub fn print_warnings(&self, preamble: &str) -> String {
        join_with_preamble(preamble, &self.warnings)
    }

    /// Preamble and all template messages, one per line.
    pub fn print_template_messages(&self, preamble: &str) -> String {
        join_with_preamble(preamble, &self.template_messages)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

fn join_with_preamble(preamble: &str, messages: &[String]) -> String {
    let mut out = String::from(preamble);
    out.push('\n');
    out.push_str(&messages.join("\n"));
    out
}
