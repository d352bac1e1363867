//! PDF document access using lopdf and pdf-extract.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::text::{assemble_words, blank_images, extract_glyphs};
use super::{Annotation, PdfRectangle, PdfSource, Result, Word};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// A PDF loaded with lopdf.
///
/// Annotations are read from the lopdf document. Words come from the copy
/// parsed by pdf-extract, which carries its own lopdf version. Both are held
/// in memory and released when the value is dropped.
pub struct LopdfDocument {
    document: Document,
    glyph_document: pdf_extract::Document,
    config: PdfConfig,
}

impl LopdfDocument {
    /// Open a PDF file.
    pub fn open(path: impl AsRef<Path>, config: PdfConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening PDF {}", path.display());
        let data = std::fs::read(path)?;
        Self::load(&data, config)
    }

    /// Load a PDF from bytes.
    pub fn load(data: &[u8], config: PdfConfig) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let decrypted = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            Some(decrypted)
        } else {
            None
        };

        let mut glyph_document = pdf_extract::Document::load_mem(decrypted.as_deref().unwrap_or(data))
            .map_err(|e| PdfError::Parse(e.to_string()))?;
        let blanked = blank_images(&mut glyph_document);
        if blanked > 0 {
            trace!("Skipping {} image streams during text extraction", blanked);
        }

        Ok(Self {
            document,
            glyph_document,
            config,
        })
    }

    /// Full document text, for inspecting what a drawing contains.
    pub fn extract_text(&self) -> Result<String> {
        let mut text = String::new();
        let mut output = pdf_extract::PlainTextOutput::new(&mut text);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::output_doc(&self.glyph_document, &mut output)
        }));
        match outcome {
            Ok(result) => result.map_err(|e| PdfError::TextExtraction(e.to_string()))?,
            Err(_) => {
                return Err(PdfError::TextExtraction(
                    "document content could not be interpreted".to_string(),
                ));
            }
        }
        Ok(text)
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        self.document
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::MissingPage(page))
    }

    fn page_dict(&self, page: u32) -> Result<&Dictionary> {
        let page_id = self.page_id(page)?;
        self.document
            .get_dictionary(page_id)
            .map_err(|_| PdfError::MissingPage(page))
    }
}

impl PdfSource for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn words(&self, page: u32) -> Result<Vec<Word>> {
        self.page_id(page)?;

        let glyphs = extract_glyphs(&self.glyph_document, page)?;
        let words = assemble_words(&glyphs, &self.config);

        debug!("Extracted {} words from page {}", words.len(), page);
        Ok(words)
    }

    fn annotations(&self, page: u32) -> Result<Vec<Annotation>> {
        let page_dict = self.page_dict(page)?;
        let doc = &self.document;

        let annots: &[Object] = match page_dict.get(b"Annots") {
            Ok(obj) => match doc.dereference(obj) {
                Ok((_, Object::Array(items))) => items.as_slice(),
                _ => &[],
            },
            Err(_) => &[],
        };

        let mut annotations = Vec::with_capacity(annots.len());
        for item in annots {
            let dict = match doc.dereference(item) {
                Ok((_, Object::Dictionary(dict))) => dict,
                _ => continue,
            };

            let Some(rectangle) = dict.get(b"Rect").ok().and_then(|r| read_rect(doc, r)) else {
                trace!("Skipping annotation without a usable /Rect");
                continue;
            };
            let content = dict
                .get(b"Contents")
                .and_then(|c| doc.dereference(c))
                .map(|(_, c)| annotation_text(c))
                .unwrap_or_default();

            annotations.push(Annotation { content, rectangle });
        }

        debug!("Found {} annotations on page {}", annotations.len(), page);
        Ok(annotations)
    }
}

fn read_rect(doc: &Document, obj: &Object) -> Option<PdfRectangle> {
    let (_, obj) = doc.dereference(obj).ok()?;
    let values: Vec<f32> = obj
        .as_array()
        .ok()?
        .iter()
        .map(|o| doc.dereference(o).ok().and_then(|(_, o)| o.as_float().ok()))
        .collect::<Option<Vec<_>>>()?;
    if values.len() != 4 {
        return None;
    }
    Some(PdfRectangle::new(values[0], values[1], values[2], values[3]))
}

/// Text of an annotation `/Contents` string, empty when it is not a text string.
fn annotation_text(obj: &Object) -> String {
    match lopdf::decode_text_string(obj) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(e) => {
            trace!("Unreadable annotation text: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{TestPage, build_pdf, hex_string, op};
    use lopdf::StringFormat;
    use lopdf::content::Operation;
    use pretty_assertions::assert_eq;

    fn load(page: TestPage) -> LopdfDocument {
        LopdfDocument::load(&build_pdf(&[page]), PdfConfig::default()).unwrap()
    }

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-2, "{} != {}", actual, expected);
    }

    /// `BT /font size Tf x y Td <show> ET`
    fn show(font: &str, size: f32, x: f32, y: f32, operation: Operation) -> Vec<Operation> {
        vec![
            op("BT", vec![]),
            op("Tf", vec![font.into(), Object::Real(size)]),
            op("Td", vec![Object::Real(x), Object::Real(y)]),
            operation,
            op("ET", vec![]),
        ]
    }

    #[test]
    fn test_annotation_text_decoding() {
        let literal = |bytes: &[u8]| Object::String(bytes.to_vec(), StringFormat::Literal);

        assert_eq!(annotation_text(&literal(b"TITLE")), "TITLE");
        assert_eq!(
            annotation_text(&literal(&[0xFE, 0xFF, 0x00, 0x52, 0x00, 0x45, 0x00, 0x56])),
            "REV"
        );
        assert_eq!(annotation_text(&literal(&[0xEF, 0xBB, 0xBF, b'N', b'o'])), "No");
        // PDFDocEncoding puts an em dash at 0x84
        assert_eq!(annotation_text(&literal(b"REV\x84A")), "REV\u{2014}A");
        assert_eq!(annotation_text(&Object::Integer(3)), "");
    }

    #[test]
    fn test_words_with_positions() {
        let doc = load(TestPage::new().text(38.0, 17.0, 10.0, "Acme Ltd"));

        assert_eq!(doc.page_count(), 1);
        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["Acme", "Ltd"]);

        // Courier advances 0.6 em per glyph
        let acme = &words[0].bounding_box;
        assert_close(acme.left, 38.0);
        assert_close(acme.right, 62.0);
        assert_close(acme.bottom, 15.0);
        assert_close(acme.top, 25.0);
        assert_close(words[1].bounding_box.left, 68.0);
    }

    #[test]
    fn test_standard_font_metrics() {
        let doc = load(TestPage::new().operations(show(
            "F2",
            10.0,
            38.0,
            17.0,
            op("Tj", vec![Object::string_literal("MMMMMMMMMM")]),
        )));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["MMMMMMMMMM"]);
        // Helvetica M is 833/1000 em
        assert_close(words[0].bounding_box.right, 121.3);
        assert_close(words[0].bounding_box.centroid().x, 79.65);
    }

    #[test]
    fn test_encoding_differences() {
        let doc = load(TestPage::new().operations(show(
            "F3",
            10.0,
            38.0,
            17.0,
            op("Tj", vec![Object::string_literal("ABC")]),
        )));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["REV"]);
        // Helvetica R, E, V widths: 722 + 667 + 667
        assert_close(words[0].bounding_box.right, 38.0 + 20.56);
    }

    #[test]
    fn test_type0_font_with_to_unicode() {
        let doc = load(TestPage::new().operations(show(
            "F4",
            10.0,
            38.0,
            17.0,
            op("Tj", vec![hex_string(&[0x00, 0x01, 0x00, 0x02, 0x00, 0x03])]),
        )));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["REV"]);
        assert_close(words[0].bounding_box.right, 53.0);
    }

    #[test]
    fn test_kerned_text_array() {
        let doc = load(TestPage::new().operations(show(
            "F1",
            10.0,
            100.0,
            200.0,
            op(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("A"),
                    Object::Integer(-200),
                    Object::string_literal("B"),
                    Object::Integer(120),
                    Object::string_literal("C"),
                    Object::Integer(-1000),
                    Object::string_literal("3"),
                ])],
            ),
        )));

        let words = doc.words(1).unwrap();
        // Small kerns stay inside the word, a full em apart starts a new one
        assert_eq!(texts(&words), vec!["ABC", "3"]);
        assert_close(words[0].bounding_box.left, 100.0);
        assert_close(words[0].bounding_box.right, 118.8);
        assert_close(words[1].bounding_box.left, 128.8);
    }

    #[test]
    fn test_text_matrix_scales_word() {
        let doc = load(TestPage::new().operations(vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op(
                "Tm",
                vec![2.into(), 0.into(), 0.into(), 2.into(), 300.into(), 400.into()],
            ),
            op("Tj", vec![Object::string_literal("Cell")]),
            op("ET", vec![]),
        ]));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["Cell"]);
        let word = &words[0];
        assert_close(word.bounding_box.left, 300.0);
        assert_close(word.bounding_box.bottom, 396.0);
        assert_close(word.bounding_box.right, 348.0);
        assert_close(word.bounding_box.top, 416.0);
        assert_close(word.font_size, 20.0);
    }

    #[test]
    fn test_leading_scaling_and_rise() {
        let doc = load(TestPage::new().operations(vec![
            op("BT", vec![]),
            op("Tf", vec!["F1".into(), 10.into()]),
            op("TL", vec![14.into()]),
            op("Td", vec![50.into(), 500.into()]),
            op("Tj", vec![Object::string_literal("Line1")]),
            op("T*", vec![]),
            op("Tj", vec![Object::string_literal("Line2")]),
            op("Tz", vec![50.into()]),
            op("Td", vec![0.into(), (-100).into()]),
            op("Tj", vec![Object::string_literal("WIDE")]),
            op("Tz", vec![100.into()]),
            op("Ts", vec![5.into()]),
            op("Td", vec![0.into(), (-100).into()]),
            op("Tj", vec![Object::string_literal("Up")]),
            op("ET", vec![]),
        ]));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["Line1", "Line2", "WIDE", "Up"]);
        assert_close(words[1].bounding_box.bottom, 484.0);
        // Tz 50 halves the advance of each glyph
        assert_close(words[2].bounding_box.right, 62.0);
        // Ts lifts the baseline 5 units above the line at 286
        assert_close(words[3].bounding_box.bottom, 289.0);
    }

    #[test]
    fn test_image_xobject_is_skipped() {
        let doc = load(TestPage::new().image().text(38.0, 17.0, 10.0, "Acme"));

        let words = doc.words(1).unwrap();
        assert_eq!(texts(&words), vec!["Acme"]);
    }

    #[test]
    fn test_uninterpretable_content_is_an_error() {
        let doc = load(TestPage::new().operations(show(
            "F9",
            10.0,
            38.0,
            17.0,
            op("Tj", vec![Object::string_literal("Lost")]),
        )));

        assert!(matches!(doc.words(1), Err(PdfError::TextExtraction(_))));
    }

    #[test]
    fn test_annotations_in_order() {
        let doc = load(
            TestPage::new()
                .annotation("TITLE", [10.0, 10.0, 100.0, 30.0])
                .annotation("REV", [120.0, 40.0, 110.0, 10.0])
                .annotation_bytes(b"DWG\x84NO", [200.0, 10.0, 260.0, 30.0]),
        );

        let annotations = doc.annotations(1).unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].content, "TITLE");
        assert_eq!(annotations[0].rectangle, PdfRectangle::new(10.0, 10.0, 100.0, 30.0));
        assert_eq!(annotations[1].content, "REV");
        assert_eq!(annotations[1].rectangle.left, 110.0);
        assert_eq!(annotations[2].content, "DWG\u{2014}NO");
    }

    #[test]
    fn test_words_inside_form_xobject() {
        let doc = load(TestPage::new().form_text(100.0, 200.0, 10.0, 5.0, 10.0, "REV"));

        let words = doc.words(1).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "REV");
        assert_close(words[0].bounding_box.left, 110.0);
        assert_close(words[0].bounding_box.bottom, 203.0);
    }

    #[test]
    fn test_extract_text() {
        let doc = load(TestPage::new().text(38.0, 17.0, 10.0, "Acme Ltd"));
        assert!(doc.extract_text().unwrap().contains("Acme Ltd"));
    }

    #[test]
    fn test_zero_pages() {
        let data = build_pdf(&[]);
        let doc = LopdfDocument::load(&data, PdfConfig::default()).unwrap();

        assert_eq!(doc.page_count(), 0);
        assert!(matches!(doc.words(1), Err(PdfError::InvalidPage(1))));
    }

    #[test]
    fn test_load_garbage_fails() {
        let result = LopdfDocument::load(b"not a pdf", PdfConfig::default());
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
