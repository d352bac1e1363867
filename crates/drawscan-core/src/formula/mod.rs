//! Formula text: `^`/`_` script markers and `\name` symbols.
//!
//! `format_text` turns marker text such as `A = \pi r^2` into rich text with a
//! superscript `2` and a `π`; `revert_text` turns it back.

mod symbols;

pub use symbols::{SYMBOL_LIBRARY, from_script, subscript, superscript, symbol_name};

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::config::FormulaConfig;

lazy_static! {
    /// `^` followed by a run ended by a space, an underscore or the end.
    static ref SUPERSCRIPT_PATTERN: Regex = Regex::new(r"\^(.+?)(?: |_|$)").unwrap();

    /// `_` followed by a run ended by a space, a caret or the end.
    static ref SUBSCRIPT_PATTERN: Regex = Regex::new(r"_(.+?)(?: |\^|$)").unwrap();
}

/// Vertical position of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

impl Script {
    fn marker(self) -> Option<char> {
        match self {
            Script::Normal => None,
            Script::Superscript => Some('^'),
            Script::Subscript => Some('_'),
        }
    }
}

/// A character and its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichChar {
    pub ch: char,
    pub script: Script,
}

impl RichChar {
    pub fn new(ch: char, script: Script) -> Self {
        Self { ch, script }
    }
}

/// Text with per-character script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub chars: Vec<RichChar>,
}

impl RichText {
    pub fn new(chars: Vec<RichChar>) -> Self {
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Render with Unicode superscript and subscript characters where they exist.
    pub fn to_unicode(&self) -> String {
        self.chars
            .iter()
            .map(|c| match c.script {
                Script::Normal => c.ch,
                Script::Superscript => superscript(c.ch).unwrap_or(c.ch),
                Script::Subscript => subscript(c.ch).unwrap_or(c.ch),
            })
            .collect()
    }

    /// Read text rendered by [`to_unicode`](Self::to_unicode).
    pub fn from_unicode(text: &str) -> Self {
        Self::new(
            text.chars()
                .map(|ch| match from_script(ch) {
                    Some((base, script)) => RichChar::new(base, script),
                    None => RichChar::new(ch, Script::Normal),
                })
                .collect(),
        )
    }

    /// Render with `^`/`_` markers in front of each scripted run.
    pub fn to_markup(&self) -> String {
        insert_markers(&self.chars).to_string()
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self::new(text.chars().map(|ch| RichChar::new(ch, Script::Normal)).collect())
    }
}

/// Plain characters, ignoring script.
impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{}", c.ch))
    }
}

/// Which transformations to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub subscripts_superscripts: bool,
    pub symbols: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            subscripts_superscripts: true,
            symbols: true,
        }
    }
}

impl From<&FormulaConfig> for FormatOptions {
    fn from(config: &FormulaConfig) -> Self {
        Self {
            subscripts_superscripts: config.subscripts_superscripts,
            symbols: config.symbols,
        }
    }
}

/// Apply script markers and symbol names.
pub fn format_text(text: &RichText, options: FormatOptions) -> RichText {
    let plain = text.to_string();
    let mut chars = text.chars.clone();
    let mut deleted = vec![false; chars.len()];
    let mut inserted: Vec<(usize, RichChar)> = Vec::new();

    if options.subscripts_superscripts {
        apply_script(&plain, &SUPERSCRIPT_PATTERN, Script::Superscript, &mut chars, &mut deleted);
        apply_script(&plain, &SUBSCRIPT_PATTERN, Script::Subscript, &mut chars, &mut deleted);
    }

    if options.symbols {
        let haystack: Vec<char> = plain.chars().collect();
        for (name, symbol) in SYMBOL_LIBRARY {
            let needle: Vec<char> = name.chars().collect();
            for start in find_all(&haystack, &needle) {
                let range = start..start + needle.len();
                if deleted[range.clone()].iter().any(|d| *d) {
                    continue;
                }
                deleted[range].iter_mut().for_each(|d| *d = true);
                inserted.push((start, RichChar::new(symbol, chars[start].script)));
            }
        }
    }

    let mut out = Vec::with_capacity(chars.len());
    for (i, c) in chars.into_iter().enumerate() {
        out.extend(inserted.iter().filter(|(at, _)| *at == i).map(|(_, rc)| *rc));
        if !deleted[i] {
            out.push(c);
        }
    }
    RichText::new(out)
}

/// Undo [`format_text`]: symbols back to names, scripted runs back to markers.
pub fn revert_text(text: &RichText, options: FormatOptions) -> RichText {
    let mut chars = text.chars.clone();

    if options.symbols {
        chars = chars
            .into_iter()
            .flat_map(|c| match symbol_name(c.ch) {
                Some(name) => name.chars().map(|ch| RichChar::new(ch, c.script)).collect(),
                None => vec![c],
            })
            .collect();
    }

    if options.subscripts_superscripts {
        chars = insert_markers(&chars).chars;
    }

    RichText::new(chars)
}

/// Normal-script text with a marker at the start of each scripted run.
fn insert_markers(chars: &[RichChar]) -> RichText {
    let mut out = Vec::with_capacity(chars.len());
    let mut current = Script::Normal;

    for c in chars {
        if c.script != current {
            if let Some(marker) = c.script.marker() {
                out.push(RichChar::new(marker, Script::Normal));
            }
            current = c.script;
        }
        out.push(RichChar::new(c.ch, Script::Normal));
    }
    RichText::new(out)
}

fn apply_script(plain: &str, pattern: &Regex, script: Script, chars: &mut [RichChar], deleted: &mut [bool]) {
    for caps in pattern.captures_iter(plain) {
        let Some(run) = caps.get(1) else {
            continue;
        };
        let start = plain[..run.start()].chars().count();
        let len = run.as_str().chars().count();

        if chars[start].script == script {
            continue;
        }
        for c in &mut chars[start..start + len] {
            c.script = script;
        }
        deleted[start - 1] = true;
    }
}

/// Non-overlapping occurrences of `needle`, left to right.
fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    if needle.is_empty() {
        return found;
    }
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            found.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}
