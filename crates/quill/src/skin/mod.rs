//! Editor skins.
//!
//! A skin owns a document, lays it out and translates host input into
//! edits and selection changes. Painting is left to the host: after each
//! handler it drains the requests a skin accumulated on its [`SkinBase`]
//! (damage, focus, scroll-to-visible, beeps) and reads caret and selection
//! geometry back.

pub mod base;
mod text_area;
mod text_input;

pub use base::{CaretBlink, Damage, DragState, FocusRequest, SkinBase, TimerSlot};
pub use text_area::TextArea;
pub use text_input::{EchoMode, TextInput};
