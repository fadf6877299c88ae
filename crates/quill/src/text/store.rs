//! The storage contract shared by the single-line and paragraph buffers.

use std::borrow::Cow;

use super::{byte_offset, char_slice};

/// Which paragraphs a committed mutation touched.
///
/// Paragraphs `first_paragraph .. first_paragraph + removed_paragraphs` of
/// the old text were replaced by `first_paragraph .. first_paragraph +
/// inserted_paragraphs` of the new text. Paragraphs after the range are
/// unchanged apart from their offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralChange {
    pub first_paragraph: usize,
    pub removed_paragraphs: usize,
    pub inserted_paragraphs: usize,
}

impl StructuralChange {
    /// A change confined to one paragraph.
    pub const fn within(paragraph: usize) -> Self {
        Self {
            first_paragraph: paragraph,
            removed_paragraphs: 1,
            inserted_paragraphs: 1,
        }
    }
}

/// Character storage behind a [`Document`](super::Document).
///
/// All offsets are character offsets. The `apply_*` methods assume their
/// arguments were already checked by the document and may panic otherwise.
pub trait TextStore {
    /// Total number of addressable characters.
    fn character_count(&self) -> usize;

    /// Maximum number of characters the store may hold.
    fn maximum_length(&self) -> usize;

    /// Change the maximum length. Does not truncate.
    fn set_maximum_length(&mut self, maximum: usize);

    /// The whole content as one string.
    fn full_text(&self) -> String;

    /// `count` characters starting at `start`.
    fn text(&self, start: usize, count: usize) -> String {
        char_slice(&self.full_text(), start, count).to_owned()
    }

    /// Bring incoming text into the store's canonical form, such as
    /// normalizing line terminators.
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    /// The content as it would read after inserting `text` at `index`.
    fn prospective_insert(&self, text: &str, index: usize) -> String {
        let mut full = self.full_text();
        let at = byte_offset(&full, index);
        full.insert_str(at, text);
        full
    }

    /// The content as it would read after removing `count` characters at
    /// `index`.
    fn prospective_remove(&self, index: usize, count: usize) -> String {
        let mut full = self.full_text();
        let start = byte_offset(&full, index);
        let end = start + byte_offset(&full[start..], count);
        full.replace_range(start..end, "");
        full
    }

    /// Splice normalized `text` in at `index`.
    fn apply_insert(&mut self, text: &str, index: usize) -> StructuralChange;

    /// Remove `count` characters at `index`, returning them.
    fn apply_remove(&mut self, index: usize, count: usize) -> (String, StructuralChange);

    /// Replace the whole content with normalized `text`.
    fn replace_all(&mut self, text: &str) -> StructuralChange;
}
