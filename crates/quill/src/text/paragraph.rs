//! Paragraph-list storage for multi-line text areas.
//!
//! Line terminators are not stored. Between paragraph `i` and `i + 1` there
//! is one implicit terminator character that is still addressable: paragraph
//! `i` covers offsets `[offset(i), offset(i) + len(i)]`, where the last
//! offset is its terminator (or the end of the text for the last paragraph).
//!
//! Paragraph offsets are not cached. They are recomputed by walking the
//! paragraph list, so an edit never has to renumber the paragraphs that
//! follow it.

use std::borrow::Cow;

use super::store::{StructuralChange, TextStore};
use super::{byte_offset, byte_range};

/// One line-break delimited run of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
    character_count: usize,
}

impl Paragraph {
    /// Create a paragraph. `text` must not contain line terminators.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let character_count = text.chars().count();
        Self {
            text,
            character_count,
        }
    }

    /// The characters of this paragraph.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters, not counting the terminator.
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    pub fn is_empty(&self) -> bool {
        self.character_count == 0
    }

    fn insert_str(&mut self, index: usize, text: &str) {
        let at = byte_offset(&self.text, index);
        self.text.insert_str(at, text);
        self.character_count += text.chars().count();
    }

    fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.character_count += text.chars().count();
    }

    fn remove_range(&mut self, index: usize, count: usize) {
        let range = byte_range(&self.text, index, count);
        self.text.replace_range(range, "");
        self.character_count -= count;
    }

    fn split_off(&mut self, index: usize) -> String {
        let at = byte_offset(&self.text, index);
        let tail = self.text.split_off(at);
        self.character_count = index;
        tail
    }
}

/// Character content of a multi-line text area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBuffer {
    paragraphs: Vec<Paragraph>,
    character_count: usize,
    maximum_length: Option<usize>,
}

impl Default for ParagraphBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParagraphBuffer {
    /// Create a buffer holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            character_count: 0,
            maximum_length: None,
        }
    }

    /// Create a buffer from text, splitting it at line terminators.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        let normalized = normalize_line_breaks(text);
        buffer.replace_all(&normalized);
        buffer
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// The paragraph at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= paragraph_count()`.
    pub fn paragraph(&self, index: usize) -> &Paragraph {
        &self.paragraphs[index]
    }

    /// Offset of the first character of paragraph `index`.
    pub fn paragraph_offset(&self, index: usize) -> usize {
        self.paragraphs[..index]
            .iter()
            .map(|p| p.character_count + 1)
            .sum()
    }

    /// Locate `offset`, returning the paragraph index and the offset within
    /// that paragraph. A terminator offset maps to the end of the paragraph
    /// it closes.
    ///
    /// # Panics
    ///
    /// Panics if `offset > character_count()`.
    pub fn paragraph_at(&self, offset: usize) -> (usize, usize) {
        assert!(
            offset <= self.character_count,
            "offset {offset} out of bounds for text of {} characters",
            self.character_count
        );
        let mut start = 0;
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            let end = start + paragraph.character_count;
            if offset <= end {
                return (index, offset - start);
            }
            start = end + 1;
        }
        unreachable!("character count out of sync with paragraphs")
    }
}

impl TextStore for ParagraphBuffer {
    fn character_count(&self) -> usize {
        self.character_count
    }

    fn maximum_length(&self) -> usize {
        self.maximum_length.unwrap_or(usize::MAX)
    }

    fn set_maximum_length(&mut self, maximum: usize) {
        self.maximum_length = Some(maximum);
    }

    fn full_text(&self) -> String {
        let mut text = String::with_capacity(self.character_count);
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(&paragraph.text);
        }
        text
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        normalize_line_breaks(text)
    }

    fn apply_insert(&mut self, text: &str, index: usize) -> StructuralChange {
        let (first, local) = self.paragraph_at(index);
        let mut lines = text.split('\n');
        let head = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        if rest.is_empty() {
            self.paragraphs[first].insert_str(local, head);
        } else {
            let tail = self.paragraphs[first].split_off(local);
            self.paragraphs[first].push_str(head);

            let mut inserted: Vec<Paragraph> = rest.iter().map(|line| Paragraph::new(*line)).collect();
            if let Some(last) = inserted.last_mut() {
                last.push_str(&tail);
            }
            self.paragraphs.splice(first + 1..first + 1, inserted);
        }

        self.character_count += text.chars().count();
        StructuralChange {
            first_paragraph: first,
            removed_paragraphs: 1,
            inserted_paragraphs: rest.len() + 1,
        }
    }

    fn apply_remove(&mut self, index: usize, count: usize) -> (String, StructuralChange) {
        let removed = self.text(index, count);
        let (first, start) = self.paragraph_at(index);
        let (last, end) = self.paragraph_at(index + count);

        if first == last {
            self.paragraphs[first].remove_range(start, end - start);
        } else {
            let tail = self.paragraphs[last].split_off(end);
            self.paragraphs[first].split_off(start);
            self.paragraphs[first].push_str(&tail);
            self.paragraphs.drain(first + 1..=last);
        }

        self.character_count -= count;
        (
            removed,
            StructuralChange {
                first_paragraph: first,
                removed_paragraphs: last - first + 1,
                inserted_paragraphs: 1,
            },
        )
    }

    fn replace_all(&mut self, text: &str) -> StructuralChange {
        let removed_paragraphs = self.paragraphs.len();
        self.paragraphs = text.split('\n').map(Paragraph::new).collect();
        self.character_count = text.chars().count();
        StructuralChange {
            first_paragraph: 0,
            removed_paragraphs,
            inserted_paragraphs: self.paragraphs.len(),
        }
    }
}

/// Convert `\r\n` and lone `\r` terminators to `\n`.
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ParagraphBuffer {
        ParagraphBuffer::from_text("one\r\ntwo\rthree")
    }

    #[test]
    fn test_from_text_splits_on_all_terminators() {
        let buffer = setup();
        assert_eq!(buffer.paragraph_count(), 3);
        assert_eq!(buffer.paragraph(1).as_str(), "two");
        // 3 + 3 + 5 characters plus two terminators
        assert_eq!(buffer.character_count(), 13);
        assert_eq!(buffer.full_text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_paragraph_offsets() {
        let buffer = setup();
        assert_eq!(buffer.paragraph_offset(0), 0);
        assert_eq!(buffer.paragraph_offset(2), 8);
        assert_eq!(buffer.paragraph_at(0), (0, 0));
        assert_eq!(buffer.paragraph_at(3), (0, 3));
        assert_eq!(buffer.paragraph_at(4), (1, 0));
        assert_eq!(buffer.paragraph_at(13), (2, 5));
    }

    #[test]
    fn test_insert_with_line_breaks_splits_paragraph() {
        let mut buffer = setup();
        let change = buffer.apply_insert("X\nY\nZ", 5);
        assert_eq!(buffer.full_text(), "one\ntX\nY\nZwo\nthree");
        assert_eq!(
            change,
            StructuralChange {
                first_paragraph: 1,
                removed_paragraphs: 1,
                inserted_paragraphs: 3
            }
        );
        assert_eq!(buffer.character_count(), 18);
    }

    #[test]
    fn test_remove_across_terminators_merges_paragraphs() {
        let mut buffer = setup();
        let (removed, change) = buffer.apply_remove(2, 8);
        assert_eq!(removed, "e\ntwo\nth");
        assert_eq!(buffer.full_text(), "onree");
        assert_eq!(buffer.paragraph_count(), 1);
        assert_eq!(buffer.character_count(), 5);
        assert_eq!(change.removed_paragraphs, 3);
        assert_eq!(change.inserted_paragraphs, 1);
    }

    #[test]
    fn test_remove_single_terminator() {
        let mut buffer = setup();
        let (removed, change) = buffer.apply_remove(3, 1);
        assert_eq!(removed, "\n");
        assert_eq!(buffer.full_text(), "onetwo\nthree");
        assert_eq!(change, StructuralChange {
            first_paragraph: 0,
            removed_paragraphs: 2,
            inserted_paragraphs: 1
        });
    }

    #[test]
    fn test_empty_buffer_has_one_paragraph() {
        let mut buffer = ParagraphBuffer::new();
        assert_eq!(buffer.paragraph_count(), 1);
        assert!(buffer.paragraph(0).is_empty());

        buffer.replace_all("");
        assert_eq!(buffer.paragraph_count(), 1);
        assert_eq!(buffer.character_count(), 0);
    }
}
