//! End-to-end editing scenarios driven the way a host would drive a skin:
//! input events in, timer events through the event loop, requests drained
//! from the skin base afterwards.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use quill::{
    Damage, EditorConfig, FnValidator, FocusChange, InputState, Key, LocalClipboard, MonospaceMetrics, MouseButton,
    Point, Rect, Selection, Size, TextArea, TextInput,
};
use quill_core::{CoreEvent, EventLoop};

fn metrics() -> Arc<MonospaceMetrics> {
    Arc::new(MonospaceMetrics::new(10.0, 20.0))
}

fn text_input(event_loop: &EventLoop) -> TextInput {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut input = TextInput::new(event_loop.timers(), metrics()).with_clipboard(LocalClipboard::new());
    input.set_size(Size::new(100.0, 24.0));
    input
}

fn text_area(event_loop: &EventLoop) -> TextArea {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut area = TextArea::new(event_loop.timers(), metrics()).with_clipboard(LocalClipboard::new());
    area.set_size(Size::new(99.0, 44.0));
    area
}

/// Run one turn of the loop at `now`, handing timer events to `handle`.
fn turn(event_loop: &EventLoop, now: Instant, mut handle: impl FnMut(quill_core::TimerId) -> bool) -> usize {
    event_loop.poll(now);
    let mut handled = 0;
    while let Some(event) = event_loop.next_event() {
        if let CoreEvent::Timer { id } = event
            && handle(id)
        {
            handled += 1;
        }
    }
    handled
}

// =========================================================================
// Wrapping
// =========================================================================

#[test]
fn paragraphs_wrap_at_whitespace() {
    let event_loop = EventLoop::new();
    let mut area = text_area(&event_loop);
    area.set_text("the quick brown fox jumps over\nend");

    let view = area.view(0);
    let rows = view.rows(quill::text::LayoutContext::new(&MonospaceMetrics::new(10.0, 20.0), area.font()));
    let spans: Vec<(usize, usize)> = rows.iter().map(|row| (row.offset, row.len())).collect();
    assert_eq!(spans, vec![(0, 10), (10, 10), (20, 6), (26, 4)]);
    assert_eq!(area.content_height(), 100.0);

    area.set_size(Size::new(400.0, 44.0));
    assert_eq!(area.content_height(), 40.0);
}

#[test]
fn selection_region_spans_rows() {
    let event_loop = EventLoop::new();
    let mut area = text_area(&event_loop);
    area.set_text("the quick brown fox jumps over");

    area.edit(|document| document.select(12, 3));
    assert_eq!(area.selection_region().rects(), &[Rect::new(22.0, 22.0, 30.0, 20.0)]);

    area.edit(|document| document.select(2, 20));
    let rects = area.selection_region();
    assert_eq!(rects.len(), 3);
    assert_eq!(rects.rects()[1], Rect::new(2.0, 22.0, 95.0, 20.0));
}

// =========================================================================
// Validation
// =========================================================================

#[test]
fn strict_validator_vetoes_typed_letters() {
    let event_loop = EventLoop::new();
    let mut input = text_input(&event_loop).with_config(EditorConfig::default().with_strict_validation(true));
    input.edit(|document| {
        document.set_validator(Some(FnValidator::new(|text: &str| {
            text.chars().all(|c| c.is_ascii_digit())
        })))
    });

    let vetoed = Arc::new(Mutex::new(Vec::new()));
    let seen = vetoed.clone();
    input
        .document()
        .insert_vetoed
        .connect(move |(text, index)| seen.lock().push((text.clone(), *index)));

    let state = InputState::new();
    for ch in "12a3".chars() {
        input.key_typed(ch, &state);
    }

    assert_eq!(input.text(), "123");
    assert_eq!(*vetoed.lock(), vec![("a".to_string(), 2)]);
    assert_eq!(input.base().beep_count(), 1);
}

#[test]
fn lenient_validator_tracks_validity() {
    let event_loop = EventLoop::new();
    let mut input = text_input(&event_loop);
    input.edit(|document| document.set_validator(Some(quill::IntValidator::new(0, 99))));

    let state = InputState::new();
    input.key_typed('4', &state);
    assert!(input.document().is_text_valid());
    input.key_typed('x', &state);
    assert_eq!(input.text(), "4x");
    assert!(!input.document().is_text_valid());
}

// =========================================================================
// Timers
// =========================================================================

#[test]
fn autoscroll_extends_one_character_per_tick() {
    let event_loop = EventLoop::new();
    let mut input = text_input(&event_loop);
    input.set_text("hello world");
    input.key_pressed(Key::Home, &InputState::new());

    let mut state = InputState::new();
    state.press(MouseButton::Left, Point::new(22.0, 10.0));
    input.mouse_down(MouseButton::Left, Point::new(22.0, 10.0), 1, &state);
    input.mouse_move(Point::new(150.0, 10.0), &state);
    assert!(input.is_autoscrolling());

    let start = Instant::now();
    let mut ends = Vec::new();
    for tick in 0..11u32 {
        turn(&event_loop, start + Duration::from_millis(30) * tick, |id| input.handle_timer(id));
        ends.push(input.selection().end());
    }
    assert_eq!(ends, vec![3, 4, 5, 6, 7, 8, 9, 10, 11, 11, 11]);
    assert_eq!(input.selection().start(), 2);

    state.release(MouseButton::Left, Point::new(150.0, 10.0));
    assert!(input.mouse_up(MouseButton::Left, Point::new(150.0, 10.0), &state));
    assert!(!input.is_autoscrolling());
    let later = start + Duration::from_millis(30) * 12;
    assert_eq!(turn(&event_loop, later, |id| input.handle_timer(id)), 0);
}

#[test]
fn area_autoscroll_moves_by_rows() {
    let event_loop = EventLoop::new();
    let mut area = text_area(&event_loop);
    area.set_text("the quick brown fox jumps over");

    let mut state = InputState::new();
    state.press(MouseButton::Left, Point::new(3.0, 5.0));
    area.mouse_down(MouseButton::Left, Point::new(3.0, 5.0), 1, &state);
    area.mouse_move(Point::new(3.0, -10.0), &state);
    assert!(area.is_autoscrolling());

    let start = Instant::now();
    assert_eq!(turn(&event_loop, start, |id| area.handle_timer(id)), 1);
    assert_eq!(area.selection(), Selection::caret(0));

    area.mouse_move(Point::new(3.0, 90.0), &state);
    turn(&event_loop, start + Duration::from_millis(30), |id| area.handle_timer(id));
    assert_eq!(area.selection(), Selection::new(0, 10));
}

#[test]
fn focused_caret_blinks() {
    let event_loop = EventLoop::new();
    let mut input = text_input(&event_loop);
    input.set_text("abc");
    input.focus_gained(FocusChange::TEMPORARY, &InputState::new());
    assert!(input.is_blinking());
    assert!(input.is_caret_on());
    input.base_mut().take_damage();

    let start = Instant::now();
    assert_eq!(turn(&event_loop, start, |id| input.handle_timer(id)), 0);
    assert_eq!(turn(&event_loop, start + Duration::from_millis(600), |id| input.handle_timer(id)), 1);
    assert!(!input.is_caret_on());
    assert_eq!(input.base_mut().take_damage(), Some(Damage::Region(input.caret_rect())));

    input.focus_lost(FocusChange::TEMPORARY);
    assert!(!input.is_blinking());
    assert_eq!(turn(&event_loop, start + Duration::from_millis(1800), |id| input.handle_timer(id)), 0);
}

// =========================================================================
// Clipboard
// =========================================================================

#[test]
fn clipboard_moves_text_between_skins() {
    let event_loop = EventLoop::new();
    let clipboard = LocalClipboard::new();
    let mut input = TextInput::new(event_loop.timers(), metrics()).with_clipboard(clipboard.clone());
    let mut area = TextArea::new(event_loop.timers(), metrics()).with_clipboard(clipboard);
    input.set_size(Size::new(100.0, 24.0));
    area.set_size(Size::new(99.0, 44.0));

    area.set_text("one\ntwo");
    area.key_pressed(Key::A, &InputState::with_modifiers(quill::KeyboardModifiers::COMMAND));
    assert!(area.copy());

    assert!(input.paste());
    assert_eq!(input.text(), "onetwo");

    input.key_pressed(Key::A, &InputState::with_modifiers(quill::KeyboardModifiers::COMMAND));
    assert!(input.cut());
    assert_eq!(input.text(), "");
    area.key_pressed(Key::End, &InputState::with_modifiers(quill::KeyboardModifiers::COMMAND));
    assert!(area.paste());
    assert_eq!(area.text(), "one\ntwoonetwo");
}
