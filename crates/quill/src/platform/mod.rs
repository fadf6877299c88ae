//! Platform services used by the editor skins.
//!
//! Currently this is clipboard access; see [`clipboard`].

pub mod clipboard;

pub use clipboard::{Clipboard, ClipboardError, ImagePayload, LocalClipboard, Manifest, SystemClipboard};
