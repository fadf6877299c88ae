//! Single-line text input skin.
//!
//! [`TextInput`] lays its whole text out on one row, scrolls horizontally to
//! keep the caret visible and drives the caret blink and drag autoscroll
//! timers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill::geometry::Size;
//! use quill::input::{InputState, Key};
//! use quill::platform::LocalClipboard;
//! use quill::skin::TextInput;
//! use quill::text::MonospaceMetrics;
//! use quill_core::EventLoop;
//!
//! let event_loop = EventLoop::new();
//! let mut input = TextInput::new(event_loop.timers(), Arc::new(MonospaceMetrics::new(8.0, 16.0)))
//!     .with_clipboard(LocalClipboard::new());
//! input.set_size(Size::new(120.0, 20.0));
//!
//! let state = InputState::new();
//! for ch in "hello".chars() {
//!     input.key_typed(ch, &state);
//! }
//! input.key_pressed(Key::Home, &state);
//! assert_eq!(input.text(), "hello");
//! assert_eq!(input.selection().start(), 0);
//! ```
//!
//! # Keyboard
//!
//! - LEFT / RIGHT move by character, with the word modifier by word, with
//!   shift extending the selection
//! - HOME / END move to the start / end
//! - BACKSPACE / DELETE remove the selection or one character (or word)
//! - ENTER emits `action_performed`
//! - Cmd+A / Cmd+C / Cmd+X / Cmd+V select all, copy, cut and paste; Cmd+Z
//!   beeps as there is no undo history

use std::sync::Arc;

use quill_core::{FireMode, Signal, TimerHandle, TimerId};

use crate::config::EditorConfig;
use crate::geometry::{Point, Rect, Size};
use crate::input::{FocusChange, InputState, Key, MouseButton};
use crate::platform::{Clipboard, SystemClipboard};
use crate::text::geometry::{self, SelectionRegion};
use crate::text::{
    Direction, Document, EditError, Font, GlyphMetrics, LayoutContext, ParagraphView, Selection, TextBuffer,
};

use super::base::{
    CaretBlink, DragState, SkinBase, TimerSlot, anchor_end, clipboard_text, copy_selection, delete_backward,
    delete_forward, extend_selection, moving_end, navigate_horizontal, place_caret, select_span,
};

/// How typed characters are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EchoMode {
    /// Display characters as entered.
    #[default]
    Normal,
    /// Display the mask character instead of each character.
    Password,
}

/// A single-line text input.
///
/// # Signals
///
/// - `action_performed(text)`: ENTER was pressed
///
/// Text signals live on the [`Document`]; see [`TextInput::document`].
pub struct TextInput {
    base: SkinBase,
    document: Document<TextBuffer>,
    metrics: Arc<dyn GlyphMetrics>,
    font: Font,
    config: EditorConfig,
    view: ParagraphView,

    /// How far the text is scrolled left, in pixels.
    scroll_left: f32,
    blink: CaretBlink,
    autoscroll: TimerSlot,
    drag: DragState,
    select_direction: Option<Direction>,

    editable: bool,
    echo_mode: EchoMode,
    prompt: Option<String>,
    clipboard: Box<dyn Clipboard>,

    /// Emitted with the current text when ENTER is pressed.
    pub action_performed: Signal<String>,
}

impl TextInput {
    /// Create an empty input whose timers run on `timers`.
    pub fn new(timers: TimerHandle, metrics: Arc<dyn GlyphMetrics>) -> Self {
        let config = EditorConfig::default();
        let mut document = Document::new(TextBuffer::new());
        document.set_strict_validation(config.strict_validation);
        Self {
            base: SkinBase::new(),
            document,
            metrics,
            font: Font::default(),
            view: ParagraphView::new("", None, config.rewrap),
            scroll_left: 0.0,
            blink: CaretBlink::new(timers.clone(), config.caret_blink_period()),
            autoscroll: TimerSlot::new(timers),
            drag: DragState::Idle,
            select_direction: None,
            editable: true,
            echo_mode: EchoMode::Normal,
            prompt: None,
            clipboard: Box::new(SystemClipboard::new()),
            config,
            action_performed: Signal::new(),
        }
    }

    /// Set the configuration using builder pattern.
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Set the initial text using builder pattern.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Set the font using builder pattern.
    pub fn with_font(mut self, font: Font) -> Self {
        self.set_font(font);
        self
    }

    /// Set the echo mode using builder pattern.
    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.set_echo_mode(mode);
        self
    }

    /// Set the prompt using builder pattern.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set whether the text can be edited using builder pattern.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Use `clipboard` instead of the system clipboard.
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// The document behind the input.
    pub fn document(&self) -> &Document<TextBuffer> {
        &self.document
    }

    /// Modify the document directly, then bring the skin up to date.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use quill::skin::TextInput;
    /// # use quill::text::MonospaceMetrics;
    /// # use quill_core::TimerHandle;
    /// let mut input = TextInput::new(TimerHandle::new(), Arc::new(MonospaceMetrics::new(8.0, 16.0)));
    /// input.edit(|document| document.set_maximum_length(3));
    /// input.set_text("abcdef");
    /// assert_eq!(input.text(), "abc");
    /// ```
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document<TextBuffer>) -> R) -> R {
        let result = f(&mut self.document);
        self.select_direction = None;
        self.refresh();
        result
    }

    pub fn text(&self) -> String {
        self.document.full_text()
    }

    /// Replace the text. The caret moves to the end.
    pub fn set_text(&mut self, text: &str) {
        self.edit(|document| document.set_text(text));
    }

    pub fn selection(&self) -> Selection {
        self.document.selection()
    }

    /// The text as displayed: masked in password mode.
    pub fn display_text(&self) -> String {
        match self.echo_mode {
            EchoMode::Normal => self.document.full_text(),
            EchoMode::Password => std::iter::repeat_n(self.config.password_char, self.document.character_count())
                .collect(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn base(&self) -> &SkinBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut SkinBase {
        &mut self.base
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.document.set_strict_validation(config.strict_validation);
        self.blink.set_period(config.caret_blink_period());
        self.config = config;
        self.rebuild_view();
        self.refresh();
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.view.invalidate();
        self.base.invalidate();
        self.refresh();
    }

    pub fn echo_mode(&self) -> EchoMode {
        self.echo_mode
    }

    pub fn set_echo_mode(&mut self, mode: EchoMode) {
        if self.echo_mode != mode {
            self.echo_mode = mode;
            self.rebuild_view();
            self.refresh();
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
        self.base.repaint(None);
    }

    /// Whether the prompt should be painted in place of the text.
    pub fn is_prompt_visible(&self) -> bool {
        self.prompt.is_some() && self.document.is_empty()
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    /// Whether the caret is drawn right now.
    pub fn is_caret_on(&self) -> bool {
        self.blink.is_on()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_running()
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.autoscroll.is_running()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    fn ctx(&self) -> LayoutContext<'_> {
        LayoutContext::new(self.metrics.as_ref(), &self.font)
    }

    /// The area text is drawn in.
    pub fn content_rect(&self) -> Rect {
        self.base.bounds().inset(&self.config.margins)
    }

    /// Where the first character is drawn, after scrolling.
    fn text_origin(&self) -> Point {
        Point::new(self.config.margins.left - self.scroll_left, self.config.margins.top)
    }

    pub fn set_size(&mut self, size: Size) {
        if self.base.set_size(size) {
            self.refresh();
        }
    }

    /// Size that shows the whole text and the caret.
    pub fn preferred_size(&self) -> Size {
        let ctx = self.ctx();
        let margins = &self.config.margins;
        Size::new(
            self.view.width(ctx) + 1.0 + margins.horizontal(),
            ctx.row_height() + margins.vertical(),
        )
    }

    fn caret_offset(&self) -> usize {
        moving_end(self.document.selection(), self.select_direction)
    }

    /// The caret rectangle in skin coordinates.
    pub fn caret_rect(&self) -> Rect {
        let rows = self.view.rows(self.ctx());
        let bounds = geometry::character_bounds(&rows, self.caret_offset());
        let origin = self.text_origin();
        Rect::new(origin.x + bounds.left(), origin.y + bounds.top(), 1.0, bounds.height())
    }

    /// The selection highlight in skin coordinates.
    pub fn selection_region(&self) -> SelectionRegion {
        let selection = self.document.selection();
        if selection.is_caret() {
            return SelectionRegion::empty();
        }
        let ctx = self.ctx();
        let rows = self.view.rows(ctx);
        let origin = self.text_origin();
        geometry::selection_region(
            geometry::character_bounds(&rows, selection.start()),
            geometry::character_bounds(&rows, selection.end()),
            0.0,
            self.view.width(ctx),
        )
        .offset(origin.x, origin.y)
    }

    /// The offset nearest to skin x coordinate `x`.
    pub fn offset_at(&self, x: f32) -> usize {
        let rows = self.view.rows(self.ctx());
        geometry::row_insertion_point(&rows, 0, x - self.text_origin().x)
    }

    fn scroll_to_offset(&mut self, offset: usize) {
        let width = self.content_rect().width();
        if width <= 0.0 {
            return;
        }
        let ctx = self.ctx();
        let rows = self.view.rows(ctx);
        let x = geometry::character_bounds(&rows, offset).left();
        let text_width = self.view.width(ctx);

        let mut scroll = self.scroll_left;
        if x - scroll < 0.0 {
            scroll = x;
        } else if x - scroll > width {
            scroll = x - width;
        }
        let scroll = scroll.min((text_width - width).max(0.0)).max(0.0);
        if scroll != self.scroll_left {
            tracing::trace!(target: "quill::skin", scroll, "text input scrolled");
            self.scroll_left = scroll;
            self.base.repaint(None);
        }
    }

    // =========================================================================
    // Internal: Synchronization
    // =========================================================================

    fn rebuild_view(&mut self) {
        self.view = ParagraphView::new(self.display_text(), None, self.config.rewrap);
        self.base.invalidate();
    }

    /// Bring layout, scrolling, caret and timers up to date with the
    /// document. Every handler ends here.
    pub fn refresh(&mut self) {
        if self.document.has_pending_changes() {
            self.document.take_changes();
            self.rebuild_view();
        }
        self.scroll_to_offset(self.caret_offset());
        let show_caret = self.base.is_focused() && self.document.selection().is_caret();
        self.blink.update(show_caret);
        self.base.repaint(None);
    }

    fn mutate(&mut self, edit: impl FnOnce(&mut Document<TextBuffer>) -> Result<(), EditError>) -> bool {
        let result = if self.editable {
            edit(&mut self.document)
        } else {
            Err(EditError::ReadOnly)
        };
        let applied = self.base.report(result).is_some();
        if applied {
            self.select_direction = None;
        }
        applied
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Copy the selection. Password fields refuse with a beep.
    pub fn copy(&mut self) -> bool {
        if self.echo_mode == EchoMode::Password {
            self.base.beep();
            return false;
        }
        copy_selection(&self.document, self.clipboard.as_mut())
    }

    /// Copy the selection, then remove it.
    pub fn cut(&mut self) -> bool {
        if self.echo_mode == EchoMode::Password || !self.editable {
            self.base.beep();
            return false;
        }
        if !copy_selection(&self.document, self.clipboard.as_mut()) {
            return false;
        }
        let cut = self.mutate(|document| document.replace_selection(""));
        self.refresh();
        cut
    }

    /// Replace the selection with the clipboard text. Line breaks and other
    /// control characters except tabs are dropped.
    pub fn paste(&mut self) -> bool {
        if !self.editable {
            self.base.beep();
            return false;
        }
        let Some(text) = clipboard_text(self.clipboard.as_mut(), |c| !c.is_control() || c == '\t') else {
            return false;
        };
        let pasted = self.mutate(|document| document.replace_selection(&text));
        self.refresh();
        pasted
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Handle a key press. Returns `true` if the key was consumed.
    pub fn key_pressed(&mut self, key: Key, input: &InputState) -> bool {
        let modifiers = input.modifiers;
        let shift = modifiers.shift;

        if modifiers.command() {
            let handled = match key {
                Key::A => {
                    self.select_direction = None;
                    self.document.select_all();
                    true
                }
                Key::C => {
                    self.copy();
                    true
                }
                Key::X => {
                    self.cut();
                    true
                }
                Key::V => {
                    self.paste();
                    true
                }
                Key::Z => {
                    self.base.beep();
                    true
                }
                _ => false,
            };
            if handled {
                self.refresh();
                return true;
            }
        }

        match key {
            Key::ArrowLeft => navigate_horizontal(
                &mut self.document,
                &mut self.select_direction,
                Direction::Backward,
                shift,
                modifiers.word(),
            ),
            Key::ArrowRight => navigate_horizontal(
                &mut self.document,
                &mut self.select_direction,
                Direction::Forward,
                shift,
                modifiers.word(),
            ),
            Key::Home if shift => extend_selection(&mut self.document, &mut self.select_direction, 0),
            Key::Home => place_caret(&mut self.document, &mut self.select_direction, 0),
            Key::End => {
                let end = self.document.character_count();
                if shift {
                    extend_selection(&mut self.document, &mut self.select_direction, end);
                } else {
                    place_caret(&mut self.document, &mut self.select_direction, end);
                }
            }
            Key::Backspace => {
                self.mutate(|document| delete_backward(document, modifiers.word()));
            }
            Key::Delete => {
                self.mutate(|document| delete_forward(document, modifiers.word()));
            }
            Key::Enter => {
                let text = self.document.full_text();
                tracing::debug!(target: "quill::skin", "text input action performed");
                self.action_performed.emit(text);
            }
            _ => return false,
        }

        self.refresh();
        true
    }

    /// Handle a typed character. Control characters and command shortcuts
    /// are not consumed.
    pub fn key_typed(&mut self, ch: char, input: &InputState) -> bool {
        if ch.is_control() || (input.modifiers.command() && !input.modifiers.alt) {
            return false;
        }
        let text = ch.to_string();
        self.mutate(|document| document.replace_selection(&text));
        self.refresh();
        true
    }

    /// Handle a button press at `point`. Double and triple clicks select all.
    pub fn mouse_down(&mut self, button: MouseButton, point: Point, click_count: u32, input: &InputState) -> bool {
        if button != MouseButton::Left || !self.base.bounds().contains(point) {
            return false;
        }

        if click_count >= 2 {
            self.select_direction = None;
            self.document.select_all();
            self.drag = DragState::Idle;
        } else {
            let offset = self.offset_at(point.x);
            let selection = self.document.selection();
            if input.shift() {
                let anchor = anchor_end(selection, self.select_direction);
                select_span(&mut self.document, &mut self.select_direction, anchor, offset);
                self.drag = DragState::Pressed { anchor };
            } else {
                place_caret(&mut self.document, &mut self.select_direction, offset);
                self.drag = DragState::Pressed { anchor: offset };
                if !self.base.is_focused() {
                    self.base.request_focus();
                }
            }
        }

        self.refresh();
        true
    }

    /// Handle pointer motion. Only consumed while a drag is in progress.
    pub fn mouse_move(&mut self, point: Point, input: &InputState) -> bool {
        let Some(anchor) = self.drag.anchor() else {
            return false;
        };
        if !input.left_button() {
            return false;
        }

        let content = self.content_rect();
        if point.x < content.left() || point.x > content.right() {
            let direction = if point.x < content.left() {
                Direction::Backward
            } else {
                Direction::Forward
            };
            self.drag = DragState::AutoScrolling { anchor, direction };
            if !self.autoscroll.is_running() {
                tracing::debug!(target: "quill::skin", ?direction, "autoscroll started");
                self.autoscroll.start(self.config.autoscroll_period(), FireMode::Immediate);
            }
            return true;
        }

        self.autoscroll.stop();
        self.drag = DragState::Selecting { anchor };
        let offset = self.offset_at(point.x);
        select_span(&mut self.document, &mut self.select_direction, anchor, offset);
        self.refresh();
        true
    }

    /// Handle a button release.
    pub fn mouse_up(&mut self, button: MouseButton, _point: Point, _input: &InputState) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        let captured = self.drag.is_captured();
        self.autoscroll.stop();
        self.drag = DragState::Idle;
        captured
    }

    /// The host gave this input focus.
    pub fn focus_gained(&mut self, change: FocusChange, input: &InputState) {
        self.base.set_focused(true);
        if change.is_local_permanent() && !input.left_button() && !self.drag.is_captured() {
            self.select_direction = None;
            self.document.select_all();
        }
        self.refresh();
    }

    /// The host took focus away.
    pub fn focus_lost(&mut self, change: FocusChange) {
        self.base.set_focused(false);
        if change.is_local_permanent() {
            self.select_direction = None;
            self.document.clear_selection();
        }
        self.autoscroll.stop();
        self.drag = DragState::Idle;
        self.refresh();
    }

    /// Handle a timer event. Returns `true` if `id` belongs to this input.
    pub fn handle_timer(&mut self, id: TimerId) -> bool {
        if self.blink.owns(id) {
            self.blink.toggle();
            let caret = self.caret_rect();
            self.base.repaint(Some(caret));
            true
        } else if self.autoscroll.owns(id) {
            self.autoscroll_tick();
            true
        } else {
            false
        }
    }

    /// Move the moving end one character toward the drag direction.
    fn autoscroll_tick(&mut self) {
        let DragState::AutoScrolling { anchor, direction } = self.drag else {
            self.autoscroll.stop();
            return;
        };
        let selection = self.document.selection();
        let moving = if selection.start() < anchor {
            selection.start()
        } else {
            selection.end()
        };
        let target = match direction {
            Direction::Backward => moving.checked_sub(1),
            Direction::Forward => (moving < self.document.character_count()).then_some(moving + 1),
        };
        let Some(target) = target else {
            return;
        };
        select_span(&mut self.document, &mut self.select_direction, anchor, target);
        self.refresh();
    }
}

impl std::fmt::Debug for TextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInput")
            .field("document", &self.document)
            .field("scroll_left", &self.scroll_left)
            .field("drag", &self.drag)
            .field("editable", &self.editable)
            .field("echo_mode", &self.echo_mode)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TextInput: Send);
