//! Editor configuration.
//!
//! [`EditorConfig`] collects the tunables shared by both editor skins. It can
//! be built in code with the `with_*` methods or loaded from TOML:
//!
//! ```
//! use quill::config::{EditorConfig, RewrapPolicy};
//!
//! let config = EditorConfig::from_toml_str(r#"
//! caret_blink_ms = 500
//! rewrap = "on_shrink"
//!
//! [margins]
//! left = 4.0
//! top = 4.0
//! right = 4.0
//! bottom = 4.0
//! "#).unwrap();
//!
//! assert_eq!(config.caret_blink_ms, 500);
//! assert_eq!(config.rewrap, RewrapPolicy::OnShrink);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Insets;

/// Default caret blink period in milliseconds.
pub const DEFAULT_CARET_BLINK_MS: u64 = 600;
/// Default autoscroll tick period in milliseconds.
pub const DEFAULT_AUTOSCROLL_MS: u64 = 30;
/// Default mask character for password echo.
pub const DEFAULT_PASSWORD_CHAR: char = '\u{2022}';

/// When a wrapping paragraph view lays its rows out again after the break
/// width changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewrapPolicy {
    /// Re-wrap on any break width change.
    #[default]
    Always,
    /// Re-wrap only when the break width shrinks below the width the rows
    /// were laid out for. Widening keeps the existing rows.
    OnShrink,
}

/// Errors produced while loading or saving an [`EditorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML source could not be parsed.
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize editor config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value parsed but is not usable.
    #[error("invalid editor config: {0}")]
    Invalid(String),
}

/// Tunables shared by the editor skins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Caret blink period in milliseconds.
    pub caret_blink_ms: u64,
    /// Autoscroll tick period in milliseconds while dragging past an edge.
    pub autoscroll_ms: u64,
    /// Re-wrap policy for paragraph views.
    pub rewrap: RewrapPolicy,
    /// Whether new documents veto edits their validator marks invalid.
    pub strict_validation: bool,
    /// Whether a text area inserts a tab character on TAB.
    pub accepts_tab: bool,
    /// Character drawn in place of each character of a password field.
    pub password_char: char,
    /// Spacing between the skin bounds and the text.
    pub margins: Insets,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            caret_blink_ms: DEFAULT_CARET_BLINK_MS,
            autoscroll_ms: DEFAULT_AUTOSCROLL_MS,
            rewrap: RewrapPolicy::default(),
            strict_validation: false,
            accepts_tab: false,
            password_char: DEFAULT_PASSWORD_CHAR,
            margins: Insets::uniform(2.0),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the timer periods are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.caret_blink_ms == 0 {
            return Err(ConfigError::Invalid("caret_blink_ms must be non-zero".into()));
        }
        if self.autoscroll_ms == 0 {
            return Err(ConfigError::Invalid("autoscroll_ms must be non-zero".into()));
        }
        Ok(())
    }

    /// Set the caret blink period.
    pub fn with_caret_blink_ms(mut self, ms: u64) -> Self {
        self.caret_blink_ms = ms;
        self
    }

    /// Set the autoscroll tick period.
    pub fn with_autoscroll_ms(mut self, ms: u64) -> Self {
        self.autoscroll_ms = ms;
        self
    }

    /// Set the re-wrap policy.
    pub fn with_rewrap(mut self, policy: RewrapPolicy) -> Self {
        self.rewrap = policy;
        self
    }

    /// Set the content margins.
    pub fn with_margins(mut self, margins: Insets) -> Self {
        self.margins = margins;
        self
    }

    /// Set whether documents start in strict validation mode.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Set whether TAB inserts a tab character in text areas.
    pub fn with_accepts_tab(mut self, accepts: bool) -> Self {
        self.accepts_tab = accepts;
        self
    }

    /// Set the password mask character.
    pub fn with_password_char(mut self, ch: char) -> Self {
        self.password_char = ch;
        self
    }

    /// Caret blink period as a [`Duration`].
    pub fn caret_blink_period(&self) -> Duration {
        Duration::from_millis(self.caret_blink_ms)
    }

    /// Autoscroll tick period as a [`Duration`].
    pub fn autoscroll_period(&self) -> Duration {
        Duration::from_millis(self.autoscroll_ms)
    }
}
