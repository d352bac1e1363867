//! Named search regions and the text found inside them.

use serde::{Deserialize, Serialize};

use crate::pdf::{Annotation, PageSegmenter, PdfRectangle, Word};

/// A named rectangular region used as a field locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBox {
    /// Label taken from the annotation content.
    pub name: String,
    /// Region in page space.
    pub rectangle: PdfRectangle,
}

impl SearchBox {
    pub fn new(name: impl Into<String>, rectangle: PdfRectangle) -> Self {
        Self {
            name: name.into(),
            rectangle,
        }
    }

    /// One search box per annotation, in annotation order. No names are filtered out.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Vec<SearchBox> {
        annotations
            .into_iter()
            .map(|annotation| SearchBox::new(annotation.content, annotation.rectangle))
            .collect()
    }

    /// Words whose bounding-box centre lies inside this box.
    pub fn words_within(&self, words_on_page: &[Word]) -> Vec<Word> {
        words_on_page
            .iter()
            .filter(|w| self.rectangle.contains(w.bounding_box.centroid()))
            .cloned()
            .collect()
    }

    /// Text inside this box as a single line, `None` when the box is empty.
    pub fn get_text(&self, words_on_page: &[Word], segmenter: &dyn PageSegmenter) -> Option<String> {
        let mut words = self.words_within(words_on_page);

        match words.len() {
            0 => None,
            1 => words.pop().map(|w| w.text),
            _ => {
                let text = segmenter
                    .get_blocks(&words)
                    .iter()
                    .map(|block| block.text())
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(text.replace("\r\n", " ").replace('\n', " "))
            }
        }
    }
}
