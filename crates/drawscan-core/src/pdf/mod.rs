//! PDF processing module.
//!
//! All coordinates are PDF user space: origin bottom-left, y grows upwards.

mod document;
mod segmenter;
mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use document::LopdfDocument;
pub use segmenter::{DefaultPageSegmenter, PageSegmenter, TextBlock, TextLine};

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfPoint {
    pub x: f32,
    pub y: f32,
}

impl PdfPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space, always normalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfRectangle {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl PdfRectangle {
    /// Create a rectangle from two opposite corners, in any order.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            left: x1.min(x2),
            bottom: y1.min(y2),
            right: x1.max(x2),
            top: y1.max(y2),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Centre point of the rectangle.
    pub fn centroid(&self) -> PdfPoint {
        PdfPoint::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: PdfPoint) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &PdfRectangle) -> PdfRectangle {
        PdfRectangle {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

/// A word on a page with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Text content.
    pub text: String,
    /// Bounding box in page space.
    pub bounding_box: PdfRectangle,
    /// Font size the word was drawn with, in page units.
    pub font_size: f32,
}

impl Word {
    pub fn new(text: impl Into<String>, bounding_box: PdfRectangle, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            font_size,
        }
    }
}

/// A page annotation: its text content and rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// The `/Contents` text, empty when absent.
    pub content: String,
    /// The `/Rect` of the annotation.
    pub rectangle: PdfRectangle,
}

/// Trait for documents the field extractor can read.
///
/// Pages are numbered from 1.
pub trait PdfSource {
    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the words on a page.
    fn words(&self, page: u32) -> Result<Vec<Word>>;

    /// Extract the annotations on a page, in document order.
    fn annotations(&self, page: u32) -> Result<Vec<Annotation>>;
}
