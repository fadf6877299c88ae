//! Quill - text editing and caret/selection engine.
//!
//! Quill provides the editing core behind two editor skins:
//!
//! - [`TextInput`]: a single-line field with horizontal scrolling, password
//!   echo and a prompt shown while empty
//! - [`TextArea`]: a multi-paragraph editor that wraps each paragraph to its
//!   width
//!
//! Both edit a [`Document`], which gates every insertion and removal
//! through range, length and [`Validator`] checks before notifying
//! observers. Layout uses a host-supplied [`GlyphMetrics`] provider; caret
//! blinking and drag autoscroll run on [`quill_core`] timers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill::{InputState, Key, MonospaceMetrics, Size, TextInput};
//! use quill_core::EventLoop;
//!
//! let event_loop = EventLoop::new();
//! let mut input = TextInput::new(event_loop.timers(), Arc::new(MonospaceMetrics::new(8.0, 16.0)))
//!     .with_clipboard(quill::LocalClipboard::new());
//! input.set_size(Size::new(120.0, 20.0));
//!
//! let state = InputState::new();
//! for ch in "hello".chars() {
//!     input.key_typed(ch, &state);
//! }
//! input.key_pressed(Key::Backspace, &state);
//! assert_eq!(input.text(), "hell");
//! ```

pub mod config;
pub mod geometry;
pub mod input;
pub mod platform;
pub mod skin;
pub mod text;

pub use config::{ConfigError, EditorConfig, RewrapPolicy};
pub use geometry::{Insets, Point, Rect, Size};
pub use input::{FocusChange, InputState, Key, KeyboardModifiers, MouseButton, MouseButtons};
pub use platform::{Clipboard, ClipboardError, LocalClipboard, Manifest, SystemClipboard};
pub use skin::{Damage, DragState, EchoMode, FocusRequest, SkinBase, TextArea, TextInput};
pub use text::validator::{DoubleValidator, FnValidator, IntValidator, MaxLengthValidator, RegexValidator};
pub use text::{
    Direction, Document, EditError, Font, GlyphMetrics, MonospaceMetrics, ParagraphBuffer, Selection,
    SelectionRegion, StructuralChange, TextBuffer, TextStore, ValidationState, Validator,
};
