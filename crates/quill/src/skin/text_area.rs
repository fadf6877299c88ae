//! Multi-paragraph, wrapping text area skin.
//!
//! [`TextArea`] keeps one [`ParagraphView`] per paragraph of its document.
//! Views are spliced in step with the document's structural changes, so an
//! edit only lays out the paragraphs it touched. Paragraph positions are not
//! cached: a paragraph's top is the sum of the heights of the paragraphs
//! above it.
//!
//! The area reports the size it needs through [`TextArea::preferred_size`]
//! and asks an enclosing viewport to scroll with
//! [`SkinBase::scroll_to_visible`]; it never scrolls itself.

use std::sync::Arc;

use quill_core::{FireMode, TimerHandle, TimerId};

use crate::config::EditorConfig;
use crate::geometry::{Point, Rect, Size};
use crate::input::{FocusChange, InputState, Key, MouseButton};
use crate::platform::{Clipboard, SystemClipboard};
use crate::text::geometry::{self, SelectionRegion};
use crate::text::{
    Direction, Document, EditError, Font, GlyphMetrics, LayoutContext, ParagraphBuffer, ParagraphView, Row,
    Selection,
};

use super::base::{
    CaretBlink, DragState, SkinBase, TimerSlot, anchor_end, clipboard_text, copy_selection, delete_backward,
    delete_forward, extend_selection, moving_end, navigate_horizontal, place_caret, select_span, word_range,
};

/// A multi-line text editor that wraps paragraphs to its width.
pub struct TextArea {
    base: SkinBase,
    document: Document<ParagraphBuffer>,
    metrics: Arc<dyn GlyphMetrics>,
    font: Font,
    config: EditorConfig,
    views: Vec<ParagraphView>,

    blink: CaretBlink,
    autoscroll: TimerSlot,
    drag: DragState,
    select_direction: Option<Direction>,

    editable: bool,
    clipboard: Box<dyn Clipboard>,
}

impl TextArea {
    /// Create an empty area whose timers run on `timers`.
    pub fn new(timers: TimerHandle, metrics: Arc<dyn GlyphMetrics>) -> Self {
        let config = EditorConfig::default();
        let mut document = Document::new(ParagraphBuffer::new());
        document.set_strict_validation(config.strict_validation);
        Self {
            base: SkinBase::new(),
            document,
            metrics,
            font: Font::default(),
            views: vec![ParagraphView::new("", None, config.rewrap)],
            blink: CaretBlink::new(timers.clone(), config.caret_blink_period()),
            autoscroll: TimerSlot::new(timers),
            drag: DragState::Idle,
            select_direction: None,
            editable: true,
            clipboard: Box::new(SystemClipboard::new()),
            config,
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

    pub fn document(&self) -> &Document<ParagraphBuffer> {
        &self.document
    }

    /// Modify the document directly, then bring the skin up to date.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document<ParagraphBuffer>) -> R) -> R {
        let result = f(&mut self.document);
        self.select_direction = None;
        self.refresh();
        result
    }

    pub fn text(&self) -> String {
        self.document.full_text()
    }

    /// Replace the text. Line terminators of any style start new paragraphs.
    pub fn set_text(&mut self, text: &str) {
        self.edit(|document| document.set_text(text));
    }

    pub fn selection(&self) -> Selection {
        self.document.selection()
    }

    /// Number of paragraph views, always equal to the paragraph count.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// The view of paragraph `index`.
    pub fn view(&self, index: usize) -> &ParagraphView {
        &self.views[index]
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
        self.rebuild_views();
        self.refresh();
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        for view in &self.views {
            view.invalidate();
        }
        self.base.invalidate();
        self.refresh();
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

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
    // Layout
    // =========================================================================

    fn ctx(&self) -> LayoutContext<'_> {
        LayoutContext::new(self.metrics.as_ref(), &self.font)
    }

    /// Width available to each paragraph, or `None` before the area has a
    /// size.
    pub fn break_width(&self) -> Option<f32> {
        let width = self.base.size().width;
        (width > 0.0).then(|| (width - self.config.margins.horizontal()).max(0.0))
    }

    pub fn set_size(&mut self, size: Size) {
        if !self.base.set_size(size) {
            return;
        }
        let break_width = self.break_width();
        tracing::debug!(target: "quill::skin", ?break_width, "text area resized");
        for view in &self.views {
            view.set_break_width(break_width);
        }
        self.base.invalidate();
        self.refresh();
    }

    /// Total height of all paragraphs.
    pub fn content_height(&self) -> f32 {
        let ctx = self.ctx();
        self.views.iter().map(|view| view.height(ctx)).sum()
    }

    fn layout_width(&self) -> f32 {
        let ctx = self.ctx();
        self.break_width()
            .unwrap_or_else(|| self.views.iter().map(|view| view.width(ctx)).fold(0.0, f32::max))
    }

    /// Size that shows every row.
    pub fn preferred_size(&self) -> Size {
        let ctx = self.ctx();
        let margins = &self.config.margins;
        let widest = self.views.iter().map(|view| view.width(ctx)).fold(0.0, f32::max);
        Size::new(widest + 1.0 + margins.horizontal(), self.content_height() + margins.vertical())
    }

    fn rows(&self, paragraph: usize) -> Arc<Vec<Row>> {
        self.views[paragraph].rows(self.ctx())
    }

    /// Top of paragraph `paragraph`, relative to the first paragraph.
    fn paragraph_top(&self, paragraph: usize) -> f32 {
        let ctx = self.ctx();
        self.views[..paragraph].iter().map(|view| view.height(ctx)).sum()
    }

    fn rebuild_views(&mut self) {
        let break_width = self.break_width();
        let policy = self.config.rewrap;
        let store = self.document.store();
        self.views = store
            .paragraphs()
            .iter()
            .map(|paragraph| ParagraphView::new(paragraph.as_str(), break_width, policy))
            .collect();
        self.base.invalidate();
    }

    /// Replace the views of the paragraphs the document changed.
    fn sync_views(&mut self) {
        let changes = self.document.take_changes();
        if changes.is_empty() {
            return;
        }

        let mut slots: Vec<Option<ParagraphView>> = std::mem::take(&mut self.views).into_iter().map(Some).collect();
        for change in &changes {
            let end = (change.first_paragraph + change.removed_paragraphs).min(slots.len());
            let start = change.first_paragraph.min(end);
            slots.splice(start..end, std::iter::repeat_with(|| None).take(change.inserted_paragraphs));
        }

        let break_width = self.break_width();
        let policy = self.config.rewrap;
        let store = self.document.store();
        if slots.len() != store.paragraph_count() {
            tracing::error!(
                target: "quill::skin",
                views = slots.len(),
                paragraphs = store.paragraph_count(),
                "paragraph views out of sync, rebuilding"
            );
            slots = std::iter::repeat_with(|| None).take(store.paragraph_count()).collect();
        }

        let mut rebuilt = 0;
        self.views = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    rebuilt += 1;
                    ParagraphView::new(store.paragraph(index).as_str(), break_width, policy)
                })
            })
            .collect();
        tracing::trace!(target: "quill::skin", changes = changes.len(), rebuilt, "paragraph views synced");
        self.base.invalidate();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Bounds of the character at `offset` in skin coordinates.
    pub fn character_bounds(&self, offset: usize) -> Rect {
        let (paragraph, local) = self.document.store().paragraph_at(offset);
        let margins = &self.config.margins;
        geometry::character_bounds(&self.rows(paragraph), local)
            .offset(margins.left, margins.top + self.paragraph_top(paragraph))
    }

    fn caret_offset(&self) -> usize {
        moving_end(self.document.selection(), self.select_direction)
    }

    /// The caret rectangle in skin coordinates.
    pub fn caret_rect(&self) -> Rect {
        let bounds = self.character_bounds(self.caret_offset());
        Rect::new(bounds.left(), bounds.top(), 1.0, bounds.height())
    }

    /// The selection highlight in skin coordinates: one rectangle within a
    /// row, up to three across rows.
    pub fn selection_region(&self) -> SelectionRegion {
        let selection = self.document.selection();
        if selection.is_caret() {
            return SelectionRegion::empty();
        }
        let left = self.config.margins.left;
        geometry::selection_region(
            self.character_bounds(selection.start()),
            self.character_bounds(selection.end()),
            left,
            left + self.layout_width(),
        )
    }

    /// The offset at `point`, or `None` above or below the text.
    pub fn insertion_point(&self, point: Point) -> Option<usize> {
        let ctx = self.ctx();
        let x = point.x - self.config.margins.left;
        let mut y = point.y - self.config.margins.top;
        if y < 0.0 {
            return None;
        }

        let mut offset = 0;
        for view in &self.views {
            let height = view.height(ctx);
            if y < height {
                let rows = view.rows(ctx);
                return geometry::insertion_point(&rows, x, y).map(|local| offset + local);
            }
            y -= height;
            offset += view.character_count() + 1;
        }
        None
    }

    /// Like [`insertion_point`](Self::insertion_point), with points above the
    /// text resolving to the start and points below it to the end.
    fn offset_at(&self, point: Point) -> usize {
        self.insertion_point(point).unwrap_or_else(|| {
            if point.y < self.config.margins.top {
                0
            } else {
                self.document.character_count()
            }
        })
    }

    /// The offset one row above or below `from` at content x `x`, crossing
    /// paragraph boundaries. `None` past the first or last row.
    fn vertical_neighbor(&self, x: f32, from: usize, direction: Direction) -> Option<usize> {
        let store = self.document.store();
        let (paragraph, local) = store.paragraph_at(from);
        let rows = self.rows(paragraph);
        if let Some(local) = geometry::next_insertion_point(&rows, x, local, direction) {
            return Some(store.paragraph_offset(paragraph) + local);
        }

        let target = match direction {
            Direction::Backward => paragraph.checked_sub(1)?,
            Direction::Forward => Some(paragraph + 1).filter(|&p| p < self.views.len())?,
        };
        let rows = self.rows(target);
        let row = match direction {
            Direction::Backward => rows.len() - 1,
            Direction::Forward => 0,
        };
        Some(store.paragraph_offset(target) + geometry::row_insertion_point(&rows, row, x))
    }

    /// Start and end offsets of the row holding `offset`. A wrapped row ends
    /// before its trailing whitespace so the caret stays on it.
    fn row_span(&self, offset: usize) -> (usize, usize) {
        let store = self.document.store();
        let (paragraph, local) = store.paragraph_at(offset);
        let rows = self.rows(paragraph);
        let index = geometry::row_index_of(&rows, local);
        let row = &rows[index];
        let first = store.paragraph_offset(paragraph);
        let end = if index + 1 == rows.len() {
            row.end()
        } else {
            row.end() - 1
        };
        (first + row.offset, first + end)
    }

    // =========================================================================
    // Internal: Synchronization
    // =========================================================================

    /// Bring layout, caret and timers up to date with the document and ask
    /// the viewport to show the caret. Every handler ends here.
    pub fn refresh(&mut self) {
        self.sync_views();
        let caret = self.caret_rect();
        self.base.scroll_to_visible(caret);
        let show_caret = self.base.is_focused() && self.document.selection().is_caret();
        self.blink.update(show_caret);
        self.base.repaint(None);
    }

    fn mutate(&mut self, edit: impl FnOnce(&mut Document<ParagraphBuffer>) -> Result<(), EditError>) -> bool {
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

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend {
            extend_selection(&mut self.document, &mut self.select_direction, target);
        } else {
            place_caret(&mut self.document, &mut self.select_direction, target);
        }
    }

    fn navigate_vertical(&mut self, direction: Direction, extend: bool) {
        let selection = self.document.selection();
        let from = if extend {
            moving_end(selection, self.select_direction)
        } else {
            match direction {
                Direction::Backward => selection.start(),
                Direction::Forward => selection.end(),
            }
        };
        let x = self.character_bounds(from).left() - self.config.margins.left;
        let target = self.vertical_neighbor(x, from, direction).unwrap_or(match direction {
            Direction::Backward => 0,
            Direction::Forward => self.document.character_count(),
        });
        self.move_to(target, extend);
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    pub fn copy(&mut self) -> bool {
        copy_selection(&self.document, self.clipboard.as_mut())
    }

    pub fn cut(&mut self) -> bool {
        if !self.editable {
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

    /// Replace the selection with the clipboard text. Control characters
    /// other than line breaks and tabs are dropped.
    pub fn paste(&mut self) -> bool {
        if !self.editable {
            self.base.beep();
            return false;
        }
        let keep = |c: char| matches!(c, '\n' | '\r' | '\t') || !c.is_control();
        let Some(text) = clipboard_text(self.clipboard.as_mut(), keep) else {
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
        let command = modifiers.command();

        if command {
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
            Key::ArrowUp => self.navigate_vertical(Direction::Backward, shift),
            Key::ArrowDown => self.navigate_vertical(Direction::Forward, shift),
            Key::Home if command => self.move_to(0, shift),
            Key::End if command => self.move_to(self.document.character_count(), shift),
            Key::Home => {
                let (start, _) = self.row_span(self.caret_offset());
                self.move_to(start, shift);
            }
            Key::End => {
                let (_, end) = self.row_span(self.caret_offset());
                self.move_to(end, shift);
            }
            Key::Backspace => {
                self.mutate(|document| delete_backward(document, modifiers.word()));
            }
            Key::Delete => {
                self.mutate(|document| delete_forward(document, modifiers.word()));
            }
            Key::Enter => {
                self.mutate(|document| document.replace_selection("\n"));
            }
            Key::Tab if self.config.accepts_tab && !shift => {
                self.mutate(|document| document.replace_selection("\t"));
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

    /// Handle a button press. Two clicks select a word, three a paragraph.
    pub fn mouse_down(&mut self, button: MouseButton, point: Point, click_count: u32, input: &InputState) -> bool {
        if button != MouseButton::Left || !self.base.bounds().contains(point) {
            return false;
        }

        let offset = self.offset_at(point);
        match click_count {
            0 | 1 => {
                if input.shift() {
                    let anchor = anchor_end(self.document.selection(), self.select_direction);
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
            2 => {
                let chars: Vec<char> = self.document.full_text().chars().collect();
                // A hit past a paragraph's end selects the word before it.
                let at = if offset > 0 && chars.get(offset).is_none_or(|&c| c == '\n') {
                    offset - 1
                } else {
                    offset
                };
                let (start, end) = match chars.get(at) {
                    Some(&c) if c != '\n' => word_range(&chars, at),
                    _ => (offset, offset),
                };
                select_span(&mut self.document, &mut self.select_direction, start, end);
                self.drag = DragState::Idle;
            }
            _ => {
                let store = self.document.store();
                let (paragraph, _) = store.paragraph_at(offset);
                let start = store.paragraph_offset(paragraph);
                let end = start + store.paragraph(paragraph).character_count();
                select_span(&mut self.document, &mut self.select_direction, start, end);
                self.drag = DragState::Idle;
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

        let bounds = self.base.bounds();
        if point.y < bounds.top() || point.y > bounds.bottom() {
            let direction = if point.y < bounds.top() {
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
        let offset = self.offset_at(point);
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

    /// The host gave this area focus. The selection is kept.
    pub fn focus_gained(&mut self, _change: FocusChange, _input: &InputState) {
        self.base.set_focused(true);
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

    /// Handle a timer event. Returns `true` if `id` belongs to this area.
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

    /// Move the moving end one row toward the drag direction.
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
        let x = self.character_bounds(moving).left() - self.config.margins.left;
        let target = self.vertical_neighbor(x, moving, direction).unwrap_or(match direction {
            Direction::Backward => 0,
            Direction::Forward => self.document.character_count(),
        });
        if target == moving {
            return;
        }
        select_span(&mut self.document, &mut self.select_direction, anchor, target);
        self.refresh();
    }
}

impl std::fmt::Debug for TextArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextArea")
            .field("document", &self.document)
            .field("views", &self.views.len())
            .field("drag", &self.drag)
            .field("editable", &self.editable)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TextArea: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyboardModifiers;
    use crate::platform::LocalClipboard;
    use crate::text::MonospaceMetrics;

    const TEXT: &str = "the quick brown fox jumps over";

    /// 10px per character, 20px rows, 99px wide with 2px margins: paragraphs
    /// break at 95px.
    fn setup() -> (TextArea, TimerHandle) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let timers = TimerHandle::new();
        let mut area = TextArea::new(timers.clone(), Arc::new(MonospaceMetrics::new(10.0, 20.0)))
            .with_clipboard(LocalClipboard::new());
        area.set_size(Size::new(99.0, 44.0));
        (area, timers)
    }

    fn press(area: &mut TextArea, key: Key) {
        area.key_pressed(key, &InputState::new());
    }

    fn assert_views_match(area: &TextArea) {
        let store = area.document().store();
        assert_eq!(area.view_count(), store.paragraph_count());
        for (index, paragraph) in store.paragraphs().iter().enumerate() {
            assert_eq!(area.view(index).text(), paragraph.as_str());
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn test_wraps_to_width() {
        let (mut area, _) = setup();
        area.set_text("the quick brown fox");
        assert_eq!(area.break_width(), Some(95.0));
        assert_eq!(area.content_height(), 40.0);
        assert_eq!(area.preferred_size().height, 44.0);

        area.set_size(Size::new(300.0, 44.0));
        assert_eq!(area.content_height(), 20.0);
    }

    #[test]
    fn test_views_follow_structural_edits() {
        let (mut area, _) = setup();
        area.set_text("one\ntwo\nthree");
        assert_views_match(&area);

        area.edit(|document| document.remove(2, 6).map(drop)).unwrap();
        assert_eq!(area.text(), "onthree");
        assert_views_match(&area);

        area.edit(|document| {
            document.insert("a\nb", 1)?;
            document.insert("\n\n", 0)
        })
        .unwrap();
        assert_eq!(area.text(), "\n\noa\nbnthree");
        assert_views_match(&area);
    }

    #[test]
    fn test_enter_splits_and_backspace_merges() {
        let (mut area, _) = setup();
        area.set_text("abcd");
        press(&mut area, Key::ArrowLeft);
        press(&mut area, Key::ArrowLeft);
        press(&mut area, Key::Enter);
        assert_eq!(area.text(), "ab\ncd");
        assert_eq!(area.view_count(), 2);
        assert_eq!(area.selection(), Selection::caret(3));

        press(&mut area, Key::Backspace);
        assert_eq!(area.text(), "abcd");
        assert_eq!(area.view_count(), 1);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn test_up_down_within_paragraph() {
        let (mut area, _) = setup();
        area.set_text("the quick brown fox");
        area.edit(|document| document.select(12, 0));

        press(&mut area, Key::ArrowUp);
        assert_eq!(area.selection(), Selection::caret(2));
        press(&mut area, Key::ArrowUp);
        assert_eq!(area.selection(), Selection::caret(0));

        press(&mut area, Key::ArrowDown);
        assert_eq!(area.selection(), Selection::caret(10));
        press(&mut area, Key::ArrowDown);
        assert_eq!(area.selection(), Selection::caret(19));
    }

    #[test]
    fn test_up_down_across_paragraphs() {
        let (mut area, _) = setup();
        area.set_text("ab\ncd");
        area.edit(|document| document.select(1, 0));
        press(&mut area, Key::ArrowDown);
        assert_eq!(area.selection(), Selection::caret(4));
        area.key_pressed(Key::ArrowUp, &InputState::with_modifiers(KeyboardModifiers::SHIFT));
        assert_eq!(area.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_home_end_follow_rows() {
        let (mut area, _) = setup();
        area.set_text("the quick brown fox");
        area.edit(|document| document.select(12, 0));
        press(&mut area, Key::Home);
        assert_eq!(area.selection(), Selection::caret(10));
        press(&mut area, Key::End);
        assert_eq!(area.selection(), Selection::caret(19));

        area.edit(|document| document.select(3, 0));
        press(&mut area, Key::End);
        assert_eq!(area.selection(), Selection::caret(9));

        let command = InputState::with_modifiers(KeyboardModifiers::COMMAND);
        area.key_pressed(Key::End, &command);
        assert_eq!(area.selection(), Selection::caret(19));
        area.key_pressed(Key::Home, &command);
        assert_eq!(area.selection(), Selection::caret(0));
    }

    #[test]
    fn test_tab_requires_config() {
        let (mut area, _) = setup();
        assert!(!area.key_pressed(Key::Tab, &InputState::new()));

        area.set_config(EditorConfig::default().with_accepts_tab(true));
        assert!(area.key_pressed(Key::Tab, &InputState::new()));
        assert_eq!(area.text(), "\t");
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn test_selection_across_three_rows() {
        let (mut area, _) = setup();
        area.set_text(TEXT);
        area.edit(|document| document.select(2, 20));

        let region = area.selection_region();
        assert_eq!(
            region.rects(),
            &[
                Rect::new(22.0, 2.0, 75.0, 20.0),
                Rect::new(2.0, 22.0, 95.0, 20.0),
                Rect::new(2.0, 42.0, 20.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_selection_within_row() {
        let (mut area, _) = setup();
        area.set_text(TEXT);
        area.edit(|document| document.select(2, 3));
        assert_eq!(area.selection_region().rects(), &[Rect::new(22.0, 2.0, 30.0, 20.0)]);
    }

    #[test]
    fn test_insertion_point_stacks_paragraphs() {
        let (mut area, _) = setup();
        area.set_text("the quick brown fox\nxy");
        assert_eq!(area.insertion_point(Point::new(500.0, 5.0)), Some(9));
        assert_eq!(area.insertion_point(Point::new(13.0, 45.0)), Some(21));
        assert_eq!(area.insertion_point(Point::new(13.0, 70.0)), None);
        assert_eq!(area.caret_rect(), Rect::new(22.0, 42.0, 1.0, 20.0));
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    #[test]
    fn test_click_counts() {
        let (mut area, _) = setup();
        area.set_text("one two\nthree");
        let state = InputState::new();

        area.mouse_down(MouseButton::Left, Point::new(45.0, 5.0), 2, &state);
        assert_eq!(area.selection(), Selection::new(4, 3));

        area.mouse_down(MouseButton::Left, Point::new(45.0, 5.0), 3, &state);
        assert_eq!(area.selection(), Selection::new(0, 7));

        area.mouse_down(MouseButton::Left, Point::new(45.0, 30.0), 1, &state);
        assert_eq!(area.selection(), Selection::caret(12));
    }

    #[test]
    fn test_double_click_past_paragraph_end() {
        let (mut area, _) = setup();
        area.set_text("one two\nthree\n\nx");
        let state = InputState::new();

        area.mouse_down(MouseButton::Left, Point::new(90.0, 5.0), 2, &state);
        assert_eq!(area.selection(), Selection::new(4, 3));

        area.mouse_down(MouseButton::Left, Point::new(50.0, 43.0), 2, &state);
        assert_eq!(area.selection(), Selection::caret(14));
    }

    #[test]
    fn test_word_navigation_crosses_line_breaks() {
        let (mut area, _) = setup();
        area.set_text("ab\ncd");
        area.edit(|document| document.select(0, 0));
        let word = InputState::with_modifiers(KeyboardModifiers::WORD);

        let mut carets = Vec::new();
        for _ in 0..4 {
            area.key_pressed(Key::ArrowRight, &word);
            carets.push(area.selection().end());
        }
        assert_eq!(carets, vec![2, 3, 5, 5]);

        area.key_pressed(Key::ArrowLeft, &word);
        assert_eq!(area.selection(), Selection::caret(3));
        area.key_pressed(Key::ArrowLeft, &word);
        assert_eq!(area.selection(), Selection::caret(0));

        let shift_word = InputState::with_modifiers(KeyboardModifiers::WORD.with_shift());
        area.key_pressed(Key::ArrowRight, &shift_word);
        area.key_pressed(Key::ArrowRight, &shift_word);
        assert_eq!(area.selection(), Selection::new(0, 3));
    }

    #[test]
    fn test_vertical_autoscroll_moves_by_rows() {
        let (mut area, timers) = setup();
        area.set_text(TEXT);

        let mut state = InputState::new();
        state.press(MouseButton::Left, Point::new(3.0, 5.0));
        area.mouse_down(MouseButton::Left, Point::new(3.0, 5.0), 1, &state);
        assert_eq!(area.selection(), Selection::caret(0));
        area.mouse_move(Point::new(3.0, 100.0), &state);
        assert!(area.is_autoscrolling());

        let start = std::time::Instant::now();
        let mut ends = Vec::new();
        for tick in 0..6u32 {
            let now = start + std::time::Duration::from_millis(30) * tick;
            for event in timers.process_expired(now) {
                if let quill_core::CoreEvent::Timer { id } = event {
                    area.handle_timer(id);
                }
            }
            ends.push(area.selection().end());
        }
        assert_eq!(ends, vec![10, 20, 26, 30, 30, 30]);
        assert_eq!(area.selection().start(), 0);
    }

    #[test]
    fn test_focus_keeps_selection() {
        let (mut area, _) = setup();
        area.set_text("abc");
        area.edit(|document| document.select(1, 1));
        area.focus_gained(FocusChange::PERMANENT, &InputState::new());
        assert_eq!(area.selection(), Selection::new(1, 1));
        assert!(!area.is_blinking());

        area.focus_lost(FocusChange::PERMANENT);
        assert_eq!(area.selection(), Selection::caret(1));
    }
}
