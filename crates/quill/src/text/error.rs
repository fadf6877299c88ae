//! Error types for text mutations.

use thiserror::Error;

/// Why a text mutation was not applied.
///
/// A rejected mutation never touches the text, the selection or any cached
/// layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The target range lies outside the text. This is a caller bug: skins
    /// clamp offsets before editing.
    #[error("{count} characters at index {index} out of bounds for text of {character_count} characters")]
    IndexOutOfRange {
        index: usize,
        count: usize,
        character_count: usize,
    },

    /// The edit would grow the text past its maximum length.
    #[error("edit would grow text to {attempted} characters, maximum is {maximum}")]
    LengthExceeded { attempted: usize, maximum: usize },

    /// The validator rejected the prospective text.
    #[error("edit vetoed by validator")]
    Vetoed,

    /// The text is not editable.
    #[error("text is read-only")]
    ReadOnly,
}

impl EditError {
    /// Whether this is a policy rejection (answered with a beep) rather
    /// than a programming error.
    pub fn is_policy_rejection(&self) -> bool {
        !matches!(self, EditError::IndexOutOfRange { .. })
    }
}
