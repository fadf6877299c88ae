//! Text content, validation, layout and geometry.
//!
//! Everything here works in character offsets. A character is one Unicode
//! scalar value; in a [`ParagraphBuffer`] each paragraph terminator counts
//! as one character as well.
//!
//! # Layers
//!
//! - [`TextStore`] implementations hold characters: [`TextBuffer`] for
//!   single-line fields and [`ParagraphBuffer`] for text areas.
//! - [`Document`] gates every mutation through range, length and validator
//!   checks, owns the [`Selection`] and notifies observers.
//! - [`layout`] breaks paragraphs into rows using a [`GlyphMetrics`]
//!   provider and caches the result in a [`ParagraphView`].
//! - [`geometry`] maps between offsets and positions within laid-out rows.

mod buffer;
mod document;
mod error;
pub mod geometry;
pub mod layout;
pub mod metrics;
mod paragraph;
mod selection;
mod store;
pub mod validator;

use std::ops::Range;

pub use buffer::TextBuffer;
pub use document::Document;
pub use error::EditError;
pub use geometry::SelectionRegion;
pub use layout::{LayoutContext, ParagraphView, Row};
pub use metrics::{Font, GlyphBounds, GlyphMetrics, LineMetrics, MonospaceMetrics, RenderingHints, TextMeasure};
pub use paragraph::{Paragraph, ParagraphBuffer, normalize_line_breaks};
pub use selection::{Direction, Selection};
pub use store::{StructuralChange, TextStore};
pub use validator::{ValidationState, Validator};

/// Byte offset of character `char_index` in `s`, or `s.len()` past the end.
pub(crate) fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices().nth(char_index).map_or(s.len(), |(i, _)| i)
}

/// Byte range of `count` characters starting at character `start`.
pub(crate) fn byte_range(s: &str, start: usize, count: usize) -> Range<usize> {
    let from = byte_offset(s, start);
    let to = from + byte_offset(&s[from..], count);
    from..to
}

/// The `count` characters of `s` starting at character `start`.
pub(crate) fn char_slice(s: &str, start: usize, count: usize) -> &str {
    &s[byte_range(s, start, count)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offsets() {
        let s = "añb€c";
        assert_eq!(byte_offset(s, 0), 0);
        assert_eq!(byte_offset(s, 2), 3);
        assert_eq!(byte_offset(s, 5), s.len());
        assert_eq!(byte_offset(s, 9), s.len());
        assert_eq!(char_slice(s, 1, 3), "ñb€");
        assert_eq!(byte_range(s, 3, 2), 4..8);
    }
}
