//! Clipboard access for cut/copy/paste.
//!
//! Skins talk to the clipboard through the [`Clipboard`] trait so hosts and
//! tests can swap the backing store. Two implementations are provided:
//!
//! - [`SystemClipboard`]: the desktop clipboard via the `arboard` crate
//! - [`LocalClipboard`]: an in-process clipboard shared by clones
//!
//! Clipboard failures (sandboxing, a locked pasteboard, no display server) are
//! caught here, logged, and reported as "no content" rather than propagated.
//!
//! # Example
//!
//! ```
//! use quill::platform::{Clipboard, LocalClipboard, Manifest};
//!
//! let mut clipboard = LocalClipboard::new();
//! clipboard.set_content(Manifest::from_text("Hello, world!"));
//!
//! let content = clipboard.content().unwrap();
//! assert!(content.contains_text());
//! assert_eq!(content.text(), Some("Hello, world!"));
//! ```

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Error type for clipboard operations.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The platform clipboard reported an error.
    #[error("clipboard error: {0}")]
    Platform(#[from] arboard::Error),
    /// The manifest has no payload the clipboard can store.
    #[error("manifest holds no transferable payload")]
    EmptyManifest,
}

/// RGBA8 image data carried by a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Pixel bytes, four per pixel, row-major.
    pub rgba: Vec<u8>,
}

/// A bag of typed payloads moved through the clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    text: Option<String>,
    image: Option<ImagePayload>,
    files: Option<Vec<PathBuf>>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manifest holding only text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    /// Set the text payload using builder pattern.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the image payload using builder pattern.
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// Set the file list payload using builder pattern.
    pub fn with_file_list(mut self, files: Vec<PathBuf>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn contains_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn contains_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn contains_file_list(&self) -> bool {
        self.files.is_some()
    }

    pub fn file_list(&self) -> Option<&[PathBuf]> {
        self.files.as_deref()
    }

    /// Whether no payload is present.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none() && self.files.is_none()
    }
}

/// Clipboard access as seen by the editor skins.
pub trait Clipboard: Send {
    /// The current clipboard content, or `None` when the clipboard is empty
    /// or cannot be read.
    fn content(&mut self) -> Option<Manifest>;

    /// Replace the clipboard content. Returns `false` when the content could
    /// not be stored.
    fn set_content(&mut self, content: Manifest) -> bool;
}

/// The desktop clipboard.
///
/// A platform handle is opened per operation and dropped afterwards, so this
/// type holds no platform resources between calls. File lists are not
/// transferred; only text and images reach the platform clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    /// Read the clipboard, reporting failures to the caller.
    pub fn try_content(&self) -> Result<Manifest, ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()?;
        let mut manifest = Manifest::new();
        if let Ok(text) = clipboard.get_text() {
            manifest.text = Some(text);
        }
        if let Ok(image) = clipboard.get_image() {
            manifest.image = Some(ImagePayload {
                width: image.width,
                height: image.height,
                rgba: image.bytes.into_owned(),
            });
        }
        Ok(manifest)
    }

    /// Write the clipboard, reporting failures to the caller.
    pub fn try_set_content(&self, content: &Manifest) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()?;
        if let Some(text) = content.text() {
            clipboard.set_text(text)?;
        } else if let Some(image) = content.image() {
            clipboard.set_image(arboard::ImageData {
                width: image.width,
                height: image.height,
                bytes: Cow::Borrowed(&image.rgba),
            })?;
        } else {
            return Err(ClipboardError::EmptyManifest);
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn content(&mut self) -> Option<Manifest> {
        match self.try_content() {
            Ok(manifest) if !manifest.is_empty() => Some(manifest),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(target: "quill::clipboard", error = %err, "clipboard unavailable, treating as empty");
                None
            }
        }
    }

    fn set_content(&mut self, content: Manifest) -> bool {
        match self.try_set_content(&content) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "quill::clipboard", error = %err, "failed to write clipboard");
                false
            }
        }
    }
}

/// An in-process clipboard.
///
/// Clones share the same content, so two skins built with clones of one
/// `LocalClipboard` can copy and paste between each other.
#[derive(Debug, Clone, Default)]
pub struct LocalClipboard {
    content: Arc<Mutex<Option<Manifest>>>,
}

impl LocalClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove any content.
    pub fn clear(&self) {
        *self.content.lock() = None;
    }
}

impl Clipboard for LocalClipboard {
    fn content(&mut self) -> Option<Manifest> {
        self.content.lock().clone()
    }

    fn set_content(&mut self, content: Manifest) -> bool {
        tracing::trace!(target: "quill::clipboard", has_text = content.contains_text(), "local clipboard set");
        *self.content.lock() = Some(content);
        true
    }
}

static_assertions::assert_impl_all!(SystemClipboard: Send, Sync);
static_assertions::assert_impl_all!(LocalClipboard: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_payloads() {
        let manifest = Manifest::from_text("abc").with_file_list(vec![PathBuf::from("/tmp/a")]);
        assert!(manifest.contains_text());
        assert!(!manifest.contains_image());
        assert_eq!(manifest.file_list().map(|f| f.len()), Some(1));
        assert!(Manifest::new().is_empty());
    }

    #[test]
    fn test_local_clipboard_shared_between_clones() {
        let mut first = LocalClipboard::new();
        let mut second = first.clone();
        assert!(second.content().is_none());

        assert!(first.set_content(Manifest::from_text("shared")));
        assert_eq!(second.content().unwrap().text(), Some("shared"));

        second.clear();
        assert!(first.content().is_none());
    }
}
