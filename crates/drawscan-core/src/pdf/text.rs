//! Positioned glyphs from pdf-extract, grouped into words.
//!
//! pdf-extract interprets the content stream, fonts and encodings; this module
//! only records where each glyph lands. Glyph boxes span from 0.2 em below the
//! baseline to 0.8 em above it, which is enough for centroid tests against
//! title-block cells.

use std::panic::{self, AssertUnwindSafe};

use pdf_extract::{MediaBox, Object, OutputDev, OutputError, Transform};
use tracing::{trace, warn};

use super::{PdfRectangle, Result, Word};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

const GLYPH_DESCENT: f64 = -0.2;
const GLYPH_ASCENT: f64 = 0.8;

/// A single drawn glyph in page space.
#[derive(Debug, Clone)]
pub(crate) struct Glyph {
    pub text: String,
    pub bbox: PdfRectangle,
    pub baseline: f32,
    pub font_size: f32,
}

impl Glyph {
    fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Output device that keeps every glyph pdf-extract draws on a page.
#[derive(Debug, Default)]
struct GlyphCollector {
    glyphs: Vec<Glyph>,
}

impl GlyphCollector {
    /// Place a glyph of `width` em at text origin `trm`.
    fn place(&mut self, trm: &Transform, width: f64, font_size: f64, text: &str) {
        let advance = width * font_size;
        let (low, high) = (GLYPH_DESCENT * font_size, GLYPH_ASCENT * font_size);

        let mut left = f64::INFINITY;
        let mut bottom = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        let mut top = f64::NEG_INFINITY;
        for (x, y) in [(0.0, low), (advance, low), (0.0, high), (advance, high)] {
            let px = x * trm.m11 + y * trm.m21 + trm.m31;
            let py = x * trm.m12 + y * trm.m22 + trm.m32;
            left = left.min(px);
            right = right.max(px);
            bottom = bottom.min(py);
            top = top.max(py);
        }
        if !(left.is_finite() && bottom.is_finite() && right.is_finite() && top.is_finite()) {
            trace!("Dropping glyph {:?} with a degenerate matrix", text);
            return;
        }

        self.glyphs.push(Glyph {
            text: text.to_string(),
            bbox: PdfRectangle::new(left as f32, bottom as f32, right as f32, top as f32),
            baseline: trm.m32 as f32,
            font_size: (font_size * trm.m21.hypot(trm.m22)) as f32,
        });
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        // Codes without a unicode mapping decode to nothing
        if !char.is_empty() {
            self.place(trm, width, font_size, char);
        }
        Ok(())
    }

    // Word hints follow text-showing operators, not visual gaps
    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}

/// Replace image XObjects with empty streams.
///
/// pdf-extract runs every `Do` target as a content stream, and image data
/// does not decode as one.
pub(crate) fn blank_images(doc: &mut pdf_extract::Document) -> usize {
    let mut blanked = 0;
    for object in doc.objects.values_mut() {
        if let Object::Stream(stream) = object {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .is_ok_and(|name| name == b"Image");
            if is_image {
                stream.dict.remove(b"Filter");
                stream.dict.remove(b"DecodeParms");
                stream.set_content(Vec::new());
                blanked += 1;
            }
        }
    }
    blanked
}

/// Run pdf-extract over one page and return its glyphs in drawing order.
///
/// pdf-extract panics on content it does not understand. Those panics are
/// caught here and reported as extraction errors for this page only.
pub(crate) fn extract_glyphs(doc: &pdf_extract::Document, page: u32) -> Result<Vec<Glyph>> {
    let mut collector = GlyphCollector::default();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::output_doc_page(doc, &mut collector, page)
    }));

    match outcome {
        Ok(Ok(())) => {
            trace!("Collected {} glyphs on page {}", collector.glyphs.len(), page);
            Ok(collector.glyphs)
        }
        Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
        Err(cause) => {
            let reason = cause
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| cause.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unsupported content".to_string());
            warn!("Content of page {} could not be interpreted: {}", page, reason);
            Err(PdfError::TextExtraction(format!("page {}: {}", page, reason)))
        }
    }
}

struct WordBuilder {
    text: String,
    bbox: PdfRectangle,
    baseline: f32,
    font_size: f32,
    last_right: f32,
}

impl WordBuilder {
    fn start(glyph: &Glyph) -> Self {
        Self {
            text: glyph.text.clone(),
            bbox: glyph.bbox,
            baseline: glyph.baseline,
            font_size: glyph.font_size,
            last_right: glyph.bbox.right,
        }
    }

    fn breaks_before(&self, glyph: &Glyph, config: &PdfConfig) -> bool {
        let size = self.font_size.max(glyph.font_size).max(f32::EPSILON);
        let gap = glyph.bbox.left - self.last_right;
        (glyph.baseline - self.baseline).abs() > config.baseline_tolerance * size
            || gap > config.word_gap_ratio * size
            || gap < -size
    }

    fn push(&mut self, glyph: &Glyph) {
        self.text.push_str(&glyph.text);
        self.bbox = self.bbox.union(&glyph.bbox);
        self.font_size = self.font_size.max(glyph.font_size);
        self.last_right = glyph.bbox.right;
    }

    fn finish(self) -> Word {
        Word::new(self.text, self.bbox, self.font_size)
    }
}

/// Split glyphs into words on whitespace, baseline jumps and wide gaps.
pub(crate) fn assemble_words(glyphs: &[Glyph], config: &PdfConfig) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<WordBuilder> = None;

    for glyph in glyphs {
        if glyph.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word.finish());
            }
            continue;
        }

        match current.as_mut() {
            Some(word) if !word.breaks_before(glyph, config) => word.push(glyph),
            _ => {
                if let Some(word) = current.replace(WordBuilder::start(glyph)) {
                    words.push(word.finish());
                }
            }
        }
    }

    if let Some(word) = current {
        words.push(word.finish());
    }
    words
}
