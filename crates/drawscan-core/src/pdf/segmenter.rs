//! Grouping of words into reading-order lines and blocks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{PdfRectangle, Word};
use crate::models::config::SegmenterConfig;

/// A line of words ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub words: Vec<Word>,
}

impl TextLine {
    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn bounding_box(&self) -> Option<PdfRectangle> {
        bounds(self.words.iter().map(|w| w.bounding_box))
    }
}

/// A group of lines ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn bounding_box(&self) -> Option<PdfRectangle> {
        bounds(self.lines.iter().filter_map(TextLine::bounding_box))
    }
}

fn bounds(rects: impl Iterator<Item = PdfRectangle>) -> Option<PdfRectangle> {
    rects.reduce(|acc, r| acc.union(&r))
}

/// Trait for layout segmentation of a set of words.
pub trait PageSegmenter {
    /// Group the words into blocks in reading order.
    fn get_blocks(&self, words: &[Word]) -> Vec<TextBlock>;
}

/// Line-then-block segmenter for horizontal text.
///
/// Words sharing a baseline form a line; lines that follow each other closely
/// form a block.
#[derive(Debug, Clone, Default)]
pub struct DefaultPageSegmenter {
    config: SegmenterConfig,
}

impl DefaultPageSegmenter {
    /// Create a segmenter with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with the given configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    fn word_size(word: &Word) -> f32 {
        if word.font_size > 0.0 {
            word.font_size
        } else {
            word.bounding_box.height()
        }
    }

    fn group_lines(&self, words: &[Word]) -> Vec<TextLine> {
        let mut sorted: Vec<&Word> = words.iter().collect();
        sorted.sort_by(|a, b| {
            b.bounding_box
                .bottom
                .partial_cmp(&a.bounding_box.bottom)
                .unwrap_or(Ordering::Equal)
                .then(
                    a.bounding_box
                        .left
                        .partial_cmp(&b.bounding_box.left)
                        .unwrap_or(Ordering::Equal),
                )
        });

        let mut lines: Vec<(f32, f32, Vec<Word>)> = Vec::new();
        for word in sorted {
            let size = Self::word_size(word);
            match lines.last_mut() {
                Some((bottom, line_size, members))
                    if (*bottom - word.bounding_box.bottom).abs()
                        <= self.config.line_tolerance * line_size.max(size) =>
                {
                    *line_size = line_size.max(size);
                    members.push(word.clone());
                }
                _ => lines.push((word.bounding_box.bottom, size, vec![word.clone()])),
            }
        }

        lines
            .into_iter()
            .map(|(_, _, mut members)| {
                members.sort_by(|a, b| {
                    a.bounding_box
                        .left
                        .partial_cmp(&b.bounding_box.left)
                        .unwrap_or(Ordering::Equal)
                });
                TextLine { words: members }
            })
            .collect()
    }
}

impl PageSegmenter for DefaultPageSegmenter {
    fn get_blocks(&self, words: &[Word]) -> Vec<TextBlock> {
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut previous: Option<PdfRectangle> = None;

        for line in self.group_lines(words) {
            let Some(rect) = line.bounding_box() else {
                continue;
            };

            let joins_previous = previous.is_some_and(|prev| {
                let gap = prev.bottom - rect.top;
                gap <= self.config.block_gap_ratio * prev.height()
            });

            match blocks.last_mut() {
                Some(block) if joins_previous => block.lines.push(line),
                _ => blocks.push(TextBlock { lines: vec![line] }),
            }
            previous = Some(rect);
        }

        trace!("Segmented {} words into {} blocks", words.len(), blocks.len());
        blocks
    }
}
