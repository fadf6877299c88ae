//! The mutation gate.
//!
//! A [`Document`] owns a text store and its selection. Every edit goes
//! through the same three steps:
//!
//! 1. **Check**: the range must lie within the text and the result must fit
//!    the maximum length.
//! 2. **Preview**: in strict mode the prospective full text is validated and
//!    an `Invalid` result vetoes the edit.
//! 3. **Commit**: the store is spliced, the selection collapses after the
//!    edit and observers are notified.
//!
//! A rejected edit leaves the text, the selection and the pending structural
//! changes untouched.
//!
//! # Signals
//!
//! - `text_inserted(index, count)` then `text_changed(text)` after an insert
//! - `text_removed(index, count)` then `text_changed(text)` after a removal
//! - `insert_vetoed(text, index)` / `remove_vetoed(index, count)` on a veto
//! - `text_valid_changed(valid)` when the validator's verdict on the whole
//!   text flips between acceptable and not
//! - `selection_changed(selection)` whenever the selection moves
//!
//! # Example
//!
//! ```
//! use quill::text::{Document, EditError, TextBuffer};
//! use quill::text::validator::FnValidator;
//!
//! let mut document = Document::new(TextBuffer::new());
//! document.set_validator(Some(FnValidator::new(|text: &str| !text.contains('5'))));
//! document.set_strict_validation(true);
//!
//! document.insert("abc", 0).unwrap();
//! assert_eq!(document.insert("5", 0), Err(EditError::Vetoed));
//! assert_eq!(document.full_text(), "abc");
//! ```

use std::sync::Arc;

use quill_core::Signal;

use super::error::EditError;
use super::selection::Selection;
use super::store::{StructuralChange, TextStore};
use super::validator::{ValidationState, Validator};

/// Text content, selection and validation behind an editor skin.
pub struct Document<S: TextStore> {
    store: S,
    selection: Selection,
    validator: Option<Arc<dyn Validator>>,
    strict_validation: bool,
    text_valid: bool,
    changes: Vec<StructuralChange>,

    /// Emitted with `(index, count)` after characters are inserted.
    pub text_inserted: Signal<(usize, usize)>,
    /// Emitted with `(index, count)` after characters are removed.
    pub text_removed: Signal<(usize, usize)>,
    /// Emitted with the new full text after any committed change.
    pub text_changed: Signal<String>,
    /// Emitted with `(text, index)` when the validator vetoes an insertion.
    pub insert_vetoed: Signal<(String, usize)>,
    /// Emitted with `(index, count)` when the validator vetoes a removal.
    pub remove_vetoed: Signal<(usize, usize)>,
    /// Emitted when [`is_text_valid`](Self::is_text_valid) flips.
    pub text_valid_changed: Signal<bool>,
    /// Emitted with the new selection whenever it changes.
    pub selection_changed: Signal<Selection>,
}

impl<S: TextStore + Default> Default for Document<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: TextStore> Document<S> {
    /// Wrap `store`, placing the caret at the end of its text.
    pub fn new(store: S) -> Self {
        let selection = Selection::caret(store.character_count());
        Self {
            store,
            selection,
            validator: None,
            strict_validation: false,
            text_valid: true,
            changes: Vec::new(),
            text_inserted: Signal::new(),
            text_removed: Signal::new(),
            text_changed: Signal::new(),
            insert_vetoed: Signal::new(),
            remove_vetoed: Signal::new(),
            text_valid_changed: Signal::new(),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn character_count(&self) -> usize {
        self.store.character_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.character_count() == 0
    }

    /// The whole text.
    pub fn full_text(&self) -> String {
        self.store.full_text()
    }

    /// `count` characters starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past the end of the text.
    pub fn text(&self, start: usize, count: usize) -> String {
        self.assert_range(start, count);
        self.store.text(start, count)
    }

    pub fn maximum_length(&self) -> usize {
        self.store.maximum_length()
    }

    /// Change the maximum length, truncating the text if it is longer.
    pub fn set_maximum_length(&mut self, maximum: usize) {
        self.store.set_maximum_length(maximum);
        let count = self.store.character_count();
        if count > maximum {
            let (_, change) = self.store.apply_remove(maximum, count - maximum);
            tracing::debug!(target: "quill::document", maximum, removed = count - maximum, "text truncated");
            self.commit_notify(change, Some((maximum, count - maximum)), None);
            let selection = Selection::between(self.selection.start().min(maximum), self.selection.end().min(maximum));
            self.update_selection(selection);
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Set or clear the validator.
    pub fn set_validator<V: Validator + 'static>(&mut self, validator: Option<V>) {
        self.validator = validator.map(|v| Arc::new(v) as Arc<dyn Validator>);
        self.revalidate();
    }

    /// Share a validator with other documents.
    pub fn set_shared_validator(&mut self, validator: Option<Arc<dyn Validator>>) {
        self.validator = validator;
        self.revalidate();
    }

    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validator.as_ref()
    }

    /// In strict mode, edits whose result the validator calls `Invalid` are
    /// vetoed.
    pub fn set_strict_validation(&mut self, strict: bool) {
        self.strict_validation = strict;
    }

    pub fn is_strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// What the validator makes of the current text. `Acceptable` without a
    /// validator.
    pub fn validation_state(&self) -> ValidationState {
        self.validator
            .as_ref()
            .map_or(ValidationState::Acceptable, |v| v.validate(&self.store.full_text()))
    }

    /// Whether the current text is acceptable to the validator.
    pub fn is_text_valid(&self) -> bool {
        self.text_valid
    }

    fn revalidate(&mut self) {
        let valid = self.validation_state().is_acceptable();
        if valid != self.text_valid {
            self.text_valid = valid;
            self.text_valid_changed.emit(valid);
        }
    }

    fn preview_vetoes(&self, prospective: impl FnOnce() -> String) -> bool {
        match &self.validator {
            Some(validator) if self.strict_validation => validator.validate(&prospective()).is_invalid(),
            _ => false,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `text` at `index`. Line terminators are normalized by the
    /// store.
    ///
    /// On success the caret lands after the inserted text.
    pub fn insert(&mut self, text: &str, index: usize) -> Result<(), EditError> {
        self.check_range(index, 0)?;
        self.splice(index, 0, text).map(drop)
    }

    /// Remove `count` characters at `index`, returning them.
    ///
    /// On success the caret lands at `index`.
    pub fn remove(&mut self, index: usize, count: usize) -> Result<String, EditError> {
        self.check_range(index, count)?;
        self.splice(index, count, "")
    }

    /// Replace the selected text with `text` in one step. Either both the
    /// removal and the insertion happen or neither does.
    pub fn replace_selection(&mut self, text: &str) -> Result<(), EditError> {
        let selection = self.selection;
        self.splice(selection.start(), selection.length(), text).map(drop)
    }

    /// Replace all text. The validator only updates validity here; it never
    /// vetoes. Text beyond the maximum length is dropped.
    pub fn set_text(&mut self, text: &str) {
        let normalized = self.store.normalize(text);
        let maximum = self.store.maximum_length();
        let truncated: String;
        let text = if normalized.chars().count() > maximum {
            truncated = normalized.chars().take(maximum).collect();
            truncated.as_str()
        } else {
            normalized.as_ref()
        };

        let change = self.store.replace_all(text);
        tracing::trace!(target: "quill::document", count = self.store.character_count(), "text replaced");
        self.commit_notify(change, None, None);
        self.update_selection(Selection::caret(self.store.character_count()));
    }

    fn check_range(&self, index: usize, count: usize) -> Result<(), EditError> {
        let character_count = self.store.character_count();
        match index.checked_add(count) {
            Some(end) if end <= character_count => Ok(()),
            _ => Err(EditError::IndexOutOfRange {
                index,
                count,
                character_count,
            }),
        }
    }

    /// Remove `count` characters at `index` and insert `text` there, as one
    /// gated edit.
    fn splice(&mut self, index: usize, count: usize, text: &str) -> Result<String, EditError> {
        let text = self.store.normalize(text).into_owned();
        let inserted = text.chars().count();

        if count == 0 && inserted == 0 {
            self.update_selection(Selection::caret(index));
            return Ok(String::new());
        }

        let current = self.store.character_count();
        let attempted = current - count + inserted;
        let maximum = self.store.maximum_length();
        if inserted > count && attempted > maximum {
            tracing::debug!(target: "quill::document", attempted, maximum, "edit exceeds maximum length");
            return Err(EditError::LengthExceeded { attempted, maximum });
        }

        let vetoed = self.preview_vetoes(|| {
            let removed = self.store.prospective_remove(index, count);
            let mut prospective = removed;
            let at = super::byte_offset(&prospective, index);
            prospective.insert_str(at, &text);
            prospective
        });
        if vetoed {
            tracing::debug!(target: "quill::document", index, count, inserted, "edit vetoed by validator");
            if inserted > 0 {
                self.insert_vetoed.emit((text, index));
            } else {
                self.remove_vetoed.emit((index, count));
            }
            return Err(EditError::Vetoed);
        }

        let mut removed = String::new();
        let mut removal = None;
        if count > 0 {
            let (text, change) = self.store.apply_remove(index, count);
            removed = text;
            self.changes.push(change);
            removal = Some((index, count));
        }
        let mut insertion = None;
        let mut change = None;
        if inserted > 0 {
            change = Some(self.store.apply_insert(&text, index));
            insertion = Some((index, inserted));
        }
        tracing::trace!(target: "quill::document", index, removed = count, inserted, "edit committed");

        match change {
            Some(change) => self.commit_notify(change, removal, insertion),
            None => self.notify(removal, insertion),
        }
        self.update_selection(Selection::caret(index + inserted));
        Ok(removed)
    }

    fn commit_notify(
        &mut self,
        change: StructuralChange,
        removal: Option<(usize, usize)>,
        insertion: Option<(usize, usize)>,
    ) {
        self.changes.push(change);
        self.notify(removal, insertion);
    }

    fn notify(&mut self, removal: Option<(usize, usize)>, insertion: Option<(usize, usize)>) {
        if let Some(removal) = removal {
            self.text_removed.emit(removal);
        }
        if let Some(insertion) = insertion {
            self.text_inserted.emit(insertion);
        }
        self.text_changed.emit(self.store.full_text());
        self.revalidate();
    }

    /// Take the structural changes committed since the last call, oldest
    /// first. Views that mirror the paragraphs apply them in order.
    pub fn take_changes(&mut self) -> Vec<StructuralChange> {
        std::mem::take(&mut self.changes)
    }

    /// Whether structural changes are waiting in [`take_changes`](Self::take_changes).
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected characters.
    pub fn selected_text(&self) -> String {
        self.store.text(self.selection.start(), self.selection.length())
    }

    /// Select `length` characters from `start`.
    ///
    /// # Panics
    ///
    /// Panics if the span extends past the end of the text.
    pub fn select(&mut self, start: usize, length: usize) {
        self.assert_range(start, length);
        self.update_selection(Selection::new(start, length));
    }

    /// Set the selection.
    ///
    /// # Panics
    ///
    /// Panics if the span extends past the end of the text.
    pub fn set_selection(&mut self, selection: Selection) {
        self.select(selection.start(), selection.length());
    }

    pub fn select_all(&mut self) {
        self.update_selection(Selection::new(0, self.store.character_count()));
    }

    /// Collapse the selection to a caret at its start.
    pub fn clear_selection(&mut self) {
        self.update_selection(Selection::caret(self.selection.start()));
    }

    fn assert_range(&self, start: usize, length: usize) {
        let count = self.store.character_count();
        assert!(
            start.checked_add(length).is_some_and(|end| end <= count),
            "range of {length} characters at {start} out of bounds for text of {count} characters"
        );
    }

    fn update_selection(&mut self, selection: Selection) {
        if selection != self.selection {
            self.selection = selection;
            self.selection_changed.emit(selection);
        }
    }
}

impl<S: TextStore + std::fmt::Debug> std::fmt::Debug for Document<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("strict_validation", &self.strict_validation)
            .field("text_valid", &self.text_valid)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Document<super::TextBuffer>: Send, Sync);
static_assertions::assert_impl_all!(Document<super::ParagraphBuffer>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::validator::{FnValidator, IntValidator};
    use crate::text::{ParagraphBuffer, TextBuffer};
    use parking_lot::Mutex;

    fn setup() -> Document<TextBuffer> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Document::new(TextBuffer::new())
    }

    fn record<T: Clone + Send + 'static>(signal: &Signal<T>) -> Arc<Mutex<Vec<T>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        signal.connect(move |value: &T| sink.lock().push(value.clone()));
        log
    }

    #[test]
    fn test_insert_moves_caret_and_notifies_in_order() {
        let mut document = setup();
        let order = Arc::new(Mutex::new(Vec::new()));
        let o1 = order.clone();
        document.text_inserted.connect(move |_| o1.lock().push("inserted"));
        let o2 = order.clone();
        document.text_changed.connect(move |_| o2.lock().push("changed"));

        document.insert("hello", 0).unwrap();
        document.insert("XY", 2).unwrap();

        assert_eq!(document.full_text(), "heXYllo");
        assert_eq!(document.selection(), Selection::caret(4));
        assert_eq!(*order.lock(), vec!["inserted", "changed", "inserted", "changed"]);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut document = setup();
        document.insert("abc", 0).unwrap();
        let err = document.insert("x", 4).unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                index: 4,
                count: 0,
                character_count: 3
            }
        );
        assert_eq!(document.full_text(), "abc");
    }

    #[test]
    fn test_maximum_length_rejects_growth() {
        let mut document = Document::new(TextBuffer::with_maximum_length(4));
        document.insert("abc", 0).unwrap();
        assert_eq!(
            document.insert("de", 3),
            Err(EditError::LengthExceeded { attempted: 5, maximum: 4 })
        );
        assert_eq!(document.character_count(), 3);
        assert_eq!(document.selection(), Selection::caret(3));

        document.select(0, 3);
        document.replace_selection("wxyz").unwrap();
        assert_eq!(document.full_text(), "wxyz");
    }

    #[test]
    fn test_digit_veto() {
        let mut document = setup();
        document.set_validator(Some(FnValidator::new(|text: &str| {
            !text.chars().any(|c| c.is_ascii_digit())
        })));
        document.set_strict_validation(true);
        let vetoed = record(&document.insert_vetoed);
        let changed = record(&document.text_changed);

        assert_eq!(document.insert("5", 0), Err(EditError::Vetoed));
        assert_eq!(document.character_count(), 0);
        assert_eq!(*vetoed.lock(), vec![("5".to_string(), 0)]);
        assert!(changed.lock().is_empty());
        assert!(!document.has_pending_changes());
    }

    #[test]
    fn test_lenient_mode_tracks_validity_without_veto() {
        let mut document = setup();
        let validity = record(&document.text_valid_changed);
        document.set_validator(Some(IntValidator::new(10, 99)));
        assert_eq!(*validity.lock(), vec![false]);

        document.insert("4", 0).unwrap();
        document.insert("2", 1).unwrap();
        assert!(document.is_text_valid());
        document.insert("7", 2).unwrap();
        assert!(!document.is_text_valid());
        assert_eq!(*validity.lock(), vec![false, true, false]);
    }

    #[test]
    fn test_remove_returns_text_and_vetoes() {
        let mut document = setup();
        document.set_text("12345");
        assert_eq!(document.remove(1, 2).unwrap(), "23");
        assert_eq!(document.selection(), Selection::caret(1));

        document.set_validator(Some(FnValidator::new(|text: &str| !text.is_empty())));
        document.set_strict_validation(true);
        let vetoed = record(&document.remove_vetoed);
        assert_eq!(document.remove(0, 1).unwrap(), "1");
        assert_eq!(document.remove(0, 2), Err(EditError::Vetoed));
        assert_eq!(document.full_text(), "45");
        assert_eq!(*vetoed.lock(), vec![(0, 2)]);
    }

    #[test]
    fn test_replace_selection_is_atomic() {
        let mut document = setup();
        document.set_text("abc");
        document.set_validator(Some(FnValidator::new(|text: &str| !text.contains('!'))));
        document.set_strict_validation(true);
        document.select(1, 1);
        let removed = record(&document.text_removed);

        assert_eq!(document.replace_selection("!"), Err(EditError::Vetoed));
        assert_eq!(document.full_text(), "abc");
        assert_eq!(document.selection(), Selection::new(1, 1));
        assert!(removed.lock().is_empty());

        document.replace_selection("B").unwrap();
        assert_eq!(document.full_text(), "aBc");
        assert_eq!(document.selection(), Selection::caret(2));
        assert_eq!(*removed.lock(), vec![(1, 1)]);
    }

    #[test]
    fn test_set_text_truncates_and_selects_end() {
        let mut document = Document::new(TextBuffer::with_maximum_length(3));
        document.set_text("abcdef");
        assert_eq!(document.full_text(), "abc");
        assert_eq!(document.selection(), Selection::caret(3));
    }

    #[test]
    fn test_set_maximum_length_truncates() {
        let mut document = setup();
        document.set_text("abcdef");
        document.select(2, 4);
        document.set_maximum_length(4);
        assert_eq!(document.full_text(), "abcd");
        assert_eq!(document.selection(), Selection::new(2, 2));
    }

    #[test]
    fn test_clear_selection_is_idempotent() {
        let mut document = setup();
        document.set_text("hello world");
        document.select(3, 4);
        let selections = record(&document.selection_changed);

        document.clear_selection();
        let once = document.selection();
        document.clear_selection();
        assert_eq!(document.selection(), once);
        assert_eq!(once, Selection::caret(3));
        assert_eq!(selections.lock().len(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_select_out_of_range_panics() {
        let mut document = setup();
        document.set_text("abc");
        document.select(2, 2);
    }

    #[test]
    fn test_paragraph_edits_report_structural_changes() {
        let mut document = Document::new(ParagraphBuffer::new());
        document.insert("one\r\ntwo", 0).unwrap();
        assert_eq!(document.character_count(), 7);
        assert_eq!(document.selection(), Selection::caret(7));

        document.remove(2, 3).unwrap();
        assert_eq!(document.full_text(), "onwo");
        let changes = document.take_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].inserted_paragraphs, 2);
        assert_eq!(changes[1].removed_paragraphs, 2);
        assert!(document.take_changes().is_empty());
    }
}
