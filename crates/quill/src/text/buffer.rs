//! Flat character storage for single-line fields.

use super::store::{StructuralChange, TextStore};
use super::{byte_offset, byte_range};

/// Character content of a single-line field.
///
/// The whole buffer is one implicit paragraph, so every change reports
/// [`StructuralChange::within(0)`](StructuralChange::within).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    character_count: usize,
    maximum_length: Option<usize>,
}

impl TextBuffer {
    /// Create an empty, unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer holding at most `maximum` characters.
    pub fn with_maximum_length(maximum: usize) -> Self {
        Self {
            maximum_length: Some(maximum),
            ..Self::default()
        }
    }

    /// The content.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TextStore for TextBuffer {
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
        self.text.clone()
    }

    fn text(&self, start: usize, count: usize) -> String {
        self.text[byte_range(&self.text, start, count)].to_owned()
    }

    fn apply_insert(&mut self, text: &str, index: usize) -> StructuralChange {
        let at = byte_offset(&self.text, index);
        self.text.insert_str(at, text);
        self.character_count += text.chars().count();
        StructuralChange::within(0)
    }

    fn apply_remove(&mut self, index: usize, count: usize) -> (String, StructuralChange) {
        let range = byte_range(&self.text, index, count);
        let removed: String = self.text.drain(range).collect();
        self.character_count -= count;
        (removed, StructuralChange::within(0))
    }

    fn replace_all(&mut self, text: &str) -> StructuralChange {
        self.text.clear();
        self.text.push_str(text);
        self.character_count = text.chars().count();
        StructuralChange::within(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_by_character() {
        let mut buffer = TextBuffer::new();
        buffer.apply_insert("héllo", 0);
        buffer.apply_insert("ö", 2);
        assert_eq!(buffer.as_str(), "héöllo");
        assert_eq!(buffer.character_count(), 6);

        let (removed, change) = buffer.apply_remove(1, 2);
        assert_eq!(removed, "éö");
        assert_eq!(change, StructuralChange::within(0));
        assert_eq!(buffer.as_str(), "hllo");
        assert_eq!(buffer.text(1, 2), "ll");
    }

    #[test]
    fn test_prospective_text_leaves_buffer_untouched() {
        let mut buffer = TextBuffer::with_maximum_length(10);
        buffer.replace_all("abc");
        assert_eq!(buffer.prospective_insert("XY", 1), "aXYbc");
        assert_eq!(buffer.prospective_remove(0, 2), "c");
        assert_eq!(buffer.as_str(), "abc");
        assert_eq!(buffer.maximum_length(), 10);
        assert_eq!(TextBuffer::new().maximum_length(), usize::MAX);
    }
}
