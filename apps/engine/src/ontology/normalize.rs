//! Matching-form normalization: lowercase, accents stripped, whitespace collapsed.
//!
//! `NormalizedText` keeps a byte map back to the source string so that spans
//! found in the normalized form can be echoed in the user's original spelling.

use std::ops::Range;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub text: String,
    /// One entry per byte of `text`: the source byte range of the char it came from.
    origin: Vec<(usize, usize)>,
}

/// A word in the normalized text, as a byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub end: usize,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut origin = Vec::with_capacity(raw.len());
        let mut pending_space: Option<(usize, usize)> = None;

        for (start, ch) in raw.char_indices() {
            let span = (start, start + ch.len_utf8());
            if ch.is_whitespace() {
                if !text.is_empty() && pending_space.is_none() {
                    pending_space = Some(span);
                }
                continue;
            }
            if let Some(space) = pending_space.take() {
                push_mapped(&mut text, &mut origin, ' ', space);
            }
            for folded in ch.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)) {
                push_mapped(&mut text, &mut origin, folded, span);
            }
        }

        Self { text, origin }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Source slice covering the normalized byte range, trimmed.
    pub fn original<'a>(&self, raw: &'a str, range: Range<usize>) -> &'a str {
        if range.start >= range.end || range.end > self.origin.len() {
            return "";
        }
        let start = self.origin[range.start].0;
        let end = self.origin[range.end - 1].1;
        raw[start..end].trim()
    }

    /// Maximal alphanumeric runs.
    pub fn words(&self) -> Vec<Word> {
        let mut words = Vec::new();
        let mut current: Option<usize> = None;
        for (idx, ch) in self.text.char_indices() {
            if ch.is_alphanumeric() {
                current.get_or_insert(idx);
            } else if let Some(start) = current.take() {
                words.push(Word { start, end: idx });
            }
        }
        if let Some(start) = current {
            words.push(Word {
                start,
                end: self.text.len(),
            });
        }
        words
    }
}

fn push_mapped(text: &mut String, origin: &mut Vec<(usize, usize)>, ch: char, span: (usize, usize)) {
    text.push(ch);
    origin.extend(std::iter::repeat(span).take(ch.len_utf8()));
}

/// Normalized form of a term, without the source map.
pub fn normalize(raw: &str) -> String {
    NormalizedText::new(raw).text
}

/// First whole-word occurrence of `term` in `haystack` (both normalized).
pub fn find_term(haystack: &str, term: &str) -> Option<usize> {
    if term.is_empty() {
        return None;
    }
    haystack
        .match_indices(term)
        .map(|(idx, _)| idx)
        .find(|&idx| is_word_boundary(haystack, idx, idx + term.len()))
}

fn is_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = haystack[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}
