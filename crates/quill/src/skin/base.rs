//! State and behaviour shared by the editor skins.
//!
//! Skins are built by composition: each one embeds a [`SkinBase`] for its
//! host-facing requests (repaint, focus, beep, scroll), a [`CaretBlink`] and a
//! [`TimerSlot`] for autoscroll, and calls the free functions here for the
//! editing behaviour both skins share.

use std::time::Duration;

use quill_core::{FireMode, Signal, TimerHandle, TimerId};

use crate::geometry::{Rect, Size};
use crate::platform::{Clipboard, Manifest};
use crate::text::{Direction, Document, EditError, Selection, TextStore};

// =========================================================================
// Host requests
// =========================================================================

/// Area of a skin that needs repainting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Damage {
    /// Everything.
    Full,
    /// The union of the reported rectangles.
    Region(Rect),
}

impl Damage {
    fn merge(self, other: Damage) -> Damage {
        match (self, other) {
            (Damage::Region(a), Damage::Region(b)) => Damage::Region(a.union(&b)),
            _ => Damage::Full,
        }
    }
}

/// A focus change the skin asked the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Request,
    Clear,
}

/// Host-facing state of a skin.
///
/// The skin records what it needs; the host drains the requests after each
/// dispatched event with the `take_*` methods.
pub struct SkinBase {
    size: Size,
    focused: bool,
    damage: Option<Damage>,
    invalidated: bool,
    focus_request: Option<FocusRequest>,
    scroll_request: Option<Rect>,
    beeps: usize,

    /// Emitted whenever the skin rejects an action; hosts play the system
    /// bell.
    pub beeped: Signal<()>,
}

impl Default for SkinBase {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinBase {
    pub fn new() -> Self {
        Self {
            size: Size::ZERO,
            focused: false,
            damage: None,
            invalidated: false,
            focus_request: None,
            scroll_request: None,
            beeps: 0,
            beeped: Signal::new(),
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn size(&self) -> Size {
        self.size
    }

    /// The skin's bounds in its own coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    /// Record a new size. Returns `true` if it changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        self.repaint(None);
        true
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Ask the host to give this skin focus.
    pub fn request_focus(&mut self) {
        self.focus_request = Some(FocusRequest::Request);
    }

    /// Ask the host to take focus away from this skin.
    pub fn clear_focus(&mut self) {
        self.focus_request = Some(FocusRequest::Clear);
    }

    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        self.focus_request.take()
    }

    // =========================================================================
    // Repaint and invalidation
    // =========================================================================

    /// Request a repaint of `area`, or of everything with `None`.
    pub fn repaint(&mut self, area: Option<Rect>) {
        let damage = area.map_or(Damage::Full, Damage::Region);
        self.damage = Some(match self.damage {
            Some(pending) => pending.merge(damage),
            None => damage,
        });
    }

    /// The area to repaint since the last call.
    pub fn take_damage(&mut self) -> Option<Damage> {
        self.damage.take()
    }

    /// Report that the preferred size may have changed.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    /// Ask the enclosing viewport to bring `area` into view.
    pub fn scroll_to_visible(&mut self, area: Rect) {
        self.scroll_request = Some(area);
    }

    pub fn take_scroll_request(&mut self) -> Option<Rect> {
        self.scroll_request.take()
    }

    // =========================================================================
    // Feedback
    // =========================================================================

    /// Signal a rejected action.
    pub fn beep(&mut self) {
        self.beeps += 1;
        self.beeped.emit(());
    }

    /// Number of beeps so far.
    pub fn beep_count(&self) -> usize {
        self.beeps
    }

    /// Handle the outcome of an edit. Rejections beep and leave state as is.
    pub(crate) fn report<T>(&mut self, result: Result<T, EditError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_policy_rejection() => {
                tracing::debug!(target: "quill::skin", %err, "edit rejected");
                self.beep();
                None
            }
            Err(err) => {
                tracing::error!(target: "quill::skin", %err, "edit failed");
                self.beep();
                None
            }
        }
    }
}

impl std::fmt::Debug for SkinBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkinBase")
            .field("size", &self.size)
            .field("focused", &self.focused)
            .field("damage", &self.damage)
            .field("beeps", &self.beeps)
            .finish_non_exhaustive()
    }
}

// =========================================================================
// Timers
// =========================================================================

/// One timer of a given kind. Starting it stops the previous instance, and
/// dropping the slot stops the timer.
pub struct TimerSlot {
    timers: TimerHandle,
    id: Option<TimerId>,
}

impl TimerSlot {
    pub fn new(timers: TimerHandle) -> Self {
        Self { timers, id: None }
    }

    /// Start a repeating timer, replacing any running one.
    pub fn start(&mut self, period: Duration, mode: FireMode) {
        self.stop();
        match self.timers.start_repeating(period, mode) {
            Ok(id) => self.id = Some(id),
            Err(err) => tracing::error!(target: "quill::skin", %err, "failed to start timer"),
        }
    }

    pub fn stop(&mut self) {
        if let Some(id) = self.id.take() {
            if let Err(err) = self.timers.stop(id) {
                tracing::debug!(target: "quill::skin", %err, "timer already gone");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.id.is_some()
    }

    /// Whether a fired `id` belongs to this slot.
    pub fn owns(&self, id: TimerId) -> bool {
        self.id == Some(id)
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for TimerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerSlot").field("id", &self.id).finish()
    }
}

/// The caret's blink timer and visibility.
#[derive(Debug)]
pub struct CaretBlink {
    slot: TimerSlot,
    period: Duration,
    on: bool,
}

impl CaretBlink {
    pub fn new(timers: TimerHandle, period: Duration) -> Self {
        Self {
            slot: TimerSlot::new(timers),
            period,
            on: false,
        }
    }

    /// Whether the caret is currently drawn.
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.slot.owns(id)
    }

    /// Change the period. Takes effect on the next restart.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Show the caret and restart blinking when `show` holds, hide it and
    /// stop blinking otherwise.
    pub fn update(&mut self, show: bool) {
        if show {
            self.on = true;
            self.slot.start(self.period, FireMode::AfterInterval);
        } else {
            self.on = false;
            self.slot.stop();
        }
    }

    /// Flip visibility on a tick.
    pub fn toggle(&mut self) {
        self.on = !self.on;
    }
}

// =========================================================================
// Drag state
// =========================================================================

/// Where a pointer-drag selection gesture is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No button held over the skin.
    #[default]
    Idle,
    /// Button pressed, pointer not moved yet.
    Pressed { anchor: usize },
    /// Dragging inside the bounds.
    Selecting { anchor: usize },
    /// Dragging past an edge, autoscroll timer running.
    AutoScrolling { anchor: usize, direction: Direction },
}

impl DragState {
    /// The drag anchor, if a gesture is in progress.
    pub fn anchor(&self) -> Option<usize> {
        match *self {
            DragState::Idle => None,
            DragState::Pressed { anchor }
            | DragState::Selecting { anchor }
            | DragState::AutoScrolling { anchor, .. } => Some(anchor),
        }
    }

    pub fn is_captured(&self) -> bool {
        !matches!(self, DragState::Idle)
    }
}

// =========================================================================
// Words
// =========================================================================

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `from`: skip whitespace backward, then the word.
/// A run of punctuation counts as one step.
pub fn word_start_before(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    if i > 0 && is_word_char(chars[i - 1]) {
        while i > 0 && is_word_char(chars[i - 1]) {
            i -= 1;
        }
    } else if i > 0 {
        i -= 1;
    }
    i
}

/// End of the word at or after `from`: skip the word, then whitespace up to
/// the next line break. A line break, like a punctuation character, counts
/// as one step.
pub fn word_end_after(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    if i < chars.len() && is_word_char(chars[i]) {
        while i < chars.len() && is_word_char(chars[i]) {
            i += 1;
        }
    } else if i < chars.len() && (chars[i] == '\n' || !chars[i].is_whitespace()) {
        i += 1;
    }
    while i < chars.len() && chars[i].is_whitespace() && chars[i] != '\n' {
        i += 1;
    }
    i
}

/// The word, whitespace run or single character around `at`, for
/// double-click selection.
pub fn word_range(chars: &[char], at: usize) -> (usize, usize) {
    let Some(&c) = chars.get(at) else {
        return (at.min(chars.len()), at.min(chars.len()));
    };
    let same_class = |other: char| {
        if is_word_char(c) {
            is_word_char(other)
        } else if c.is_whitespace() && c != '\n' {
            other.is_whitespace() && other != '\n'
        } else {
            false
        }
    };

    let mut start = at;
    while start > 0 && same_class(chars[start - 1]) {
        start -= 1;
    }
    let mut end = at + 1;
    while end < chars.len() && same_class(chars[end]) {
        end += 1;
    }
    (start, end)
}

// =========================================================================
// Selection editing
// =========================================================================

/// The end of `selection` that moves when it is extended.
pub fn moving_end(selection: Selection, direction: Option<Direction>) -> usize {
    match direction {
        Some(Direction::Backward) => selection.start(),
        _ => selection.end(),
    }
}

/// The end of `selection` that stays put when it is extended.
pub fn anchor_end(selection: Selection, direction: Option<Direction>) -> usize {
    match direction {
        Some(Direction::Backward) => selection.end(),
        _ => selection.start(),
    }
}

/// Select from `anchor` to `target`, tracking which end moves.
pub fn select_span<S: TextStore>(
    document: &mut Document<S>,
    select_direction: &mut Option<Direction>,
    anchor: usize,
    target: usize,
) {
    *select_direction = match target.cmp(&anchor) {
        std::cmp::Ordering::Less => Some(Direction::Backward),
        std::cmp::Ordering::Greater => Some(Direction::Forward),
        std::cmp::Ordering::Equal => None,
    };
    document.set_selection(Selection::between(anchor, target));
}

/// Move the moving end of the selection to `target`.
pub fn extend_selection<S: TextStore>(
    document: &mut Document<S>,
    select_direction: &mut Option<Direction>,
    target: usize,
) {
    let anchor = anchor_end(document.selection(), *select_direction);
    select_span(document, select_direction, anchor, target);
}

/// Collapse to a caret at `offset`.
pub fn place_caret<S: TextStore>(
    document: &mut Document<S>,
    select_direction: &mut Option<Direction>,
    offset: usize,
) {
    *select_direction = None;
    document.set_selection(Selection::caret(offset));
}

/// Handle LEFT / RIGHT with their shift and word modifiers.
///
/// Without shift a non-empty selection collapses to its near edge, unless
/// jumping by word, which jumps from that edge.
pub fn navigate_horizontal<S: TextStore>(
    document: &mut Document<S>,
    select_direction: &mut Option<Direction>,
    direction: Direction,
    extend: bool,
    by_word: bool,
) {
    let count = document.character_count();
    let selection = document.selection();
    let step = |chars: &[char], from: usize| match (direction, by_word) {
        (Direction::Backward, true) => word_start_before(chars, from),
        (Direction::Forward, true) => word_end_after(chars, from),
        (Direction::Backward, false) => from.saturating_sub(1),
        (Direction::Forward, false) => (from + 1).min(count),
    };
    let chars: Vec<char> = if by_word {
        document.full_text().chars().collect()
    } else {
        Vec::new()
    };

    if extend {
        let from = moving_end(selection, *select_direction);
        extend_selection(document, select_direction, step(&chars, from));
        return;
    }

    let edge = match direction {
        Direction::Backward => selection.start(),
        Direction::Forward => selection.end(),
    };
    let target = if selection.is_caret() || by_word {
        step(&chars, edge)
    } else {
        edge
    };
    place_caret(document, select_direction, target);
}

/// Remove the selection, or the character (or word) before the caret.
pub fn delete_backward<S: TextStore>(document: &mut Document<S>, by_word: bool) -> Result<(), EditError> {
    let selection = document.selection();
    if !selection.is_caret() {
        return document.replace_selection("");
    }
    let caret = selection.start();
    if caret == 0 {
        return Ok(());
    }
    let start = if by_word {
        let chars: Vec<char> = document.full_text().chars().collect();
        word_start_before(&chars, caret)
    } else {
        caret - 1
    };
    document.remove(start, caret - start).map(drop)
}

/// Remove the selection, or the character (or word) after the caret.
pub fn delete_forward<S: TextStore>(document: &mut Document<S>, by_word: bool) -> Result<(), EditError> {
    let selection = document.selection();
    if !selection.is_caret() {
        return document.replace_selection("");
    }
    let caret = selection.start();
    let count = document.character_count();
    if caret == count {
        return Ok(());
    }
    let end = if by_word {
        let chars: Vec<char> = document.full_text().chars().collect();
        word_end_after(&chars, caret).max(caret + 1)
    } else {
        caret + 1
    };
    document.remove(caret, end - caret).map(drop)
}

// =========================================================================
// Clipboard
// =========================================================================

/// Put the selected text on the clipboard. `false` if nothing is selected
/// or the clipboard refused it.
pub fn copy_selection<S: TextStore>(document: &Document<S>, clipboard: &mut dyn Clipboard) -> bool {
    if document.selection().is_caret() {
        return false;
    }
    clipboard.set_content(Manifest::from_text(document.selected_text()))
}

/// Text on the clipboard, keeping only the characters `keep` accepts.
pub fn clipboard_text(clipboard: &mut dyn Clipboard, keep: impl Fn(char) -> bool) -> Option<String> {
    let content = clipboard.content()?;
    let text: String = content.text()?.chars().filter(|&c| keep(c)).collect();
    (!text.is_empty()).then_some(text)
}
