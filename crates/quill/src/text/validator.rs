//! Validators consulted by the mutation gate.
//!
//! Every edit a [`Document`](super::Document) commits is first previewed: the
//! prospective full text is handed to the document's validator. A validator
//! classifies text into three states:
//!
//! - [`ValidationState::Invalid`]: the text is wrong and more typing cannot fix it
//! - [`ValidationState::Intermediate`]: the text is incomplete but could become valid
//! - [`ValidationState::Acceptable`]: the text is valid as a final result
//!
//! In strict mode the document vetoes edits whose result is `Invalid`.
//! Whatever the mode, the document reports whether its current text is
//! `Acceptable` through `text_valid`.
//!
//! # Built-in Validators
//!
//! - [`IntValidator`]: integers within a range
//! - [`DoubleValidator`]: decimals within a range, with limited precision
//! - [`RegexValidator`]: text matching a regular expression
//! - [`MaxLengthValidator`]: text no longer than a character count
//! - [`FnValidator`]: a closure answering valid or not
//!
//! # Example
//!
//! ```
//! use quill::text::validator::{IntValidator, ValidationState, Validator};
//!
//! let validator = IntValidator::new(0, 100);
//! assert_eq!(validator.validate("42"), ValidationState::Acceptable);
//! assert_eq!(validator.validate("-"), ValidationState::Invalid);
//! assert_eq!(validator.validate(""), ValidationState::Intermediate);
//! ```

use std::fmt;
use std::sync::Arc;

/// The result of validating text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationState {
    /// The text is wrong and cannot be made valid by further editing.
    Invalid,
    /// The text is incomplete but could become valid with more input.
    Intermediate,
    /// The text is valid as a final result.
    #[default]
    Acceptable,
}

impl ValidationState {
    pub fn is_acceptable(self) -> bool {
        self == ValidationState::Acceptable
    }

    pub fn is_invalid(self) -> bool {
        self == ValidationState::Invalid
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationState::Invalid => write!(f, "Invalid"),
            ValidationState::Intermediate => write!(f, "Intermediate"),
            ValidationState::Acceptable => write!(f, "Acceptable"),
        }
    }
}

/// Classifies prospective text.
///
/// Validators run synchronously inside every mutation preview, so they
/// should be cheap and deterministic.
pub trait Validator: Send + Sync {
    /// Classify `input`.
    fn validate(&self, input: &str) -> ValidationState;

    /// Attempt to turn `input` into acceptable text, for example by clamping
    /// a number into range. `None` means no fixup applies.
    fn fixup(&self, _input: &str) -> Option<String> {
        None
    }
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn validate(&self, input: &str) -> ValidationState {
        (**self).validate(input)
    }

    fn fixup(&self, input: &str) -> Option<String> {
        (**self).fixup(input)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, input: &str) -> ValidationState {
        (**self).validate(input)
    }

    fn fixup(&self, input: &str) -> Option<String> {
        (**self).fixup(input)
    }
}

/// Accepts integers within `[minimum, maximum]`.
///
/// Empty text and a lone sign the range allows are intermediate. A
/// non-negative value below a non-negative minimum is intermediate when it
/// has fewer digits than the maximum, since typing more digits can bring it
/// into range.
#[derive(Debug, Clone)]
pub struct IntValidator {
    minimum: i64,
    maximum: i64,
}

impl IntValidator {
    pub fn new(minimum: i64, maximum: i64) -> Self {
        Self {
            minimum: minimum.min(maximum),
            maximum: minimum.max(maximum),
        }
    }

    /// Accept 0 and above.
    pub fn non_negative() -> Self {
        Self::new(0, i64::MAX)
    }

    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    fn could_grow_into_range(&self, value: i64) -> bool {
        self.minimum >= 0
            && value >= 0
            && value.to_string().len() < self.maximum.to_string().len()
    }
}

impl Validator for IntValidator {
    fn validate(&self, input: &str) -> ValidationState {
        let trimmed = input.trim();
        match trimmed {
            "" | "+" => return ValidationState::Intermediate,
            "-" if self.minimum < 0 => return ValidationState::Intermediate,
            "-" => return ValidationState::Invalid,
            _ => {}
        }

        let well_formed = trimmed
            .char_indices()
            .all(|(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')));
        if !well_formed {
            return ValidationState::Invalid;
        }

        match trimmed.parse::<i64>() {
            Ok(value) if (self.minimum..=self.maximum).contains(&value) => ValidationState::Acceptable,
            Ok(value) if value < self.minimum && self.could_grow_into_range(value) => {
                ValidationState::Intermediate
            }
            _ => ValidationState::Invalid,
        }
    }

    fn fixup(&self, input: &str) -> Option<String> {
        let value = input.trim().parse::<i64>().ok()?;
        let clamped = value.clamp(self.minimum, self.maximum);
        (clamped != value).then(|| clamped.to_string())
    }
}

/// Accepts decimal numbers within `[minimum, maximum]` with at most
/// `decimals` fractional digits.
#[derive(Debug, Clone)]
pub struct DoubleValidator {
    minimum: f64,
    maximum: f64,
    decimals: u32,
}

impl DoubleValidator {
    pub fn new(minimum: f64, maximum: f64, decimals: u32) -> Self {
        Self {
            minimum: minimum.min(maximum),
            maximum: minimum.max(maximum),
            decimals,
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    fn is_well_formed(text: &str) -> bool {
        let mut seen_dot = false;
        let mut seen_digit = false;
        for (i, c) in text.char_indices() {
            match c {
                '0'..='9' => seen_digit = true,
                '.' if !seen_dot => seen_dot = true,
                '-' | '+' if i == 0 => {}
                _ => return false,
            }
        }
        seen_digit || seen_dot
    }
}

impl Validator for DoubleValidator {
    fn validate(&self, input: &str) -> ValidationState {
        let trimmed = input.trim();
        match trimmed {
            "" | "+" | "." | "+." => return ValidationState::Intermediate,
            "-" | "-." if self.minimum < 0.0 => return ValidationState::Intermediate,
            "-" | "-." => return ValidationState::Invalid,
            _ => {}
        }

        if !Self::is_well_formed(trimmed) {
            return ValidationState::Invalid;
        }
        if let Some((_, fraction)) = trimmed.split_once('.')
            && fraction.len() > self.decimals as usize
        {
            return ValidationState::Invalid;
        }
        if trimmed.ends_with('.') {
            return ValidationState::Intermediate;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if !value.is_finite() => ValidationState::Invalid,
            Ok(value) if value >= self.minimum && value <= self.maximum => ValidationState::Acceptable,
            Ok(value) if value < self.minimum && self.minimum >= 0.0 && value >= 0.0 => {
                ValidationState::Intermediate
            }
            _ => ValidationState::Invalid,
        }
    }

    fn fixup(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        let value = trimmed.trim_end_matches('.').parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        let clamped = value.clamp(self.minimum, self.maximum);
        let changed = clamped != value || trimmed.ends_with('.');
        changed.then(|| format!("{:.prec$}", clamped, prec = self.decimals as usize))
    }
}

/// Accepts text that matches a regular expression in full.
///
/// The pattern is anchored at both ends. Text that does not match is
/// `Invalid` when an intermediate pattern is given and does not match it
/// either; without an intermediate pattern, non-matching text is
/// `Intermediate`, so a strict document never vetoes partial input.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: regex::Regex,
    intermediate: Option<regex::Regex>,
}

impl RegexValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: anchored(pattern)?,
            intermediate: None,
        })
    }

    /// A validator with a second pattern describing acceptable partial input.
    pub fn with_intermediate(pattern: &str, intermediate: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: anchored(pattern)?,
            intermediate: Some(anchored(intermediate)?),
        })
    }
}

fn anchored(pattern: &str) -> Result<regex::Regex, regex::Error> {
    regex::Regex::new(&format!("^(?:{pattern})$"))
}

impl Validator for RegexValidator {
    fn validate(&self, input: &str) -> ValidationState {
        if self.pattern.is_match(input) {
            return ValidationState::Acceptable;
        }
        if input.is_empty() {
            return ValidationState::Intermediate;
        }
        match &self.intermediate {
            Some(intermediate) if intermediate.is_match(input) => ValidationState::Intermediate,
            Some(_) => ValidationState::Invalid,
            None => ValidationState::Intermediate,
        }
    }
}

/// Rejects text longer than a number of characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
    maximum: usize,
}

impl MaxLengthValidator {
    pub fn new(maximum: usize) -> Self {
        Self { maximum }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, input: &str) -> ValidationState {
        if input.chars().count() <= self.maximum {
            ValidationState::Acceptable
        } else {
            ValidationState::Invalid
        }
    }

    fn fixup(&self, input: &str) -> Option<String> {
        (input.chars().count() > self.maximum).then(|| input.chars().take(self.maximum).collect())
    }
}

/// Wraps a yes/no predicate: `true` is `Acceptable`, `false` is `Invalid`.
///
/// ```
/// use quill::text::validator::{FnValidator, ValidationState, Validator};
///
/// let no_digits = FnValidator::new(|text: &str| !text.chars().any(|c| c.is_ascii_digit()));
/// assert_eq!(no_digits.validate("abc"), ValidationState::Acceptable);
/// assert_eq!(no_digits.validate("a5"), ValidationState::Invalid);
/// ```
pub struct FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, input: &str) -> ValidationState {
        if (self.predicate)(input) {
            ValidationState::Acceptable
        } else {
            ValidationState::Invalid
        }
    }
}

impl<F> fmt::Debug for FnValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // IntValidator Tests
    // =========================================================================

    #[test]
    fn test_int_validator_range() {
        let validator = IntValidator::new(0, 100);
        assert_eq!(validator.validate("0"), ValidationState::Acceptable);
        assert_eq!(validator.validate("100"), ValidationState::Acceptable);
        assert_eq!(validator.validate("101"), ValidationState::Invalid);
        assert_eq!(validator.validate("-1"), ValidationState::Invalid);
        assert_eq!(validator.validate("12a"), ValidationState::Invalid);
    }

    #[test]
    fn test_int_validator_intermediate() {
        let validator = IntValidator::new(10, 100);
        assert_eq!(validator.validate(""), ValidationState::Intermediate);
        assert_eq!(validator.validate("5"), ValidationState::Intermediate);
        assert_eq!(validator.validate("+"), ValidationState::Intermediate);

        let signed = IntValidator::new(-100, 100);
        assert_eq!(signed.validate("-"), ValidationState::Intermediate);
        assert_eq!(signed.validate("-50"), ValidationState::Acceptable);
    }

    #[test]
    fn test_int_validator_fixup() {
        let validator = IntValidator::new(0, 100);
        assert_eq!(validator.fixup("150"), Some("100".to_string()));
        assert_eq!(validator.fixup("50"), None);
        assert_eq!(validator.fixup("abc"), None);
    }

    // =========================================================================
    // DoubleValidator Tests
    // =========================================================================

    #[test]
    fn test_double_validator() {
        let validator = DoubleValidator::new(-10.0, 10.0, 2);
        assert_eq!(validator.validate("3.14"), ValidationState::Acceptable);
        assert_eq!(validator.validate("3."), ValidationState::Intermediate);
        assert_eq!(validator.validate("-."), ValidationState::Intermediate);
        assert_eq!(validator.validate("3.141"), ValidationState::Invalid);
        assert_eq!(validator.validate("100.0"), ValidationState::Invalid);
        assert_eq!(validator.validate("1.2.3"), ValidationState::Invalid);
    }

    #[test]
    fn test_double_validator_fixup() {
        let validator = DoubleValidator::new(0.0, 1.0, 2);
        assert_eq!(validator.fixup("2.5"), Some("1.00".to_string()));
        assert_eq!(validator.fixup("0.5."), Some("0.50".to_string()));
        assert_eq!(validator.fixup("0.5"), None);
        assert_eq!(validator.fixup("0."), Some("0.00".to_string()));
    }

    // =========================================================================
    // Other Validators
    // =========================================================================

    #[test]
    fn test_regex_validator_is_anchored() {
        let validator = RegexValidator::with_intermediate(r"\d{3}-\d{4}", r"\d{0,3}(-\d{0,4})?").unwrap();
        assert_eq!(validator.validate("555-1234"), ValidationState::Acceptable);
        assert_eq!(validator.validate("555-12"), ValidationState::Intermediate);
        assert_eq!(validator.validate("x555-1234"), ValidationState::Invalid);

        let loose = RegexValidator::new("[a-z]+").unwrap();
        assert_eq!(loose.validate("abc"), ValidationState::Acceptable);
        assert_eq!(loose.validate("ABC"), ValidationState::Intermediate);
        assert!(RegexValidator::new("(").is_err());
    }

    #[test]
    fn test_max_length_validator() {
        let validator = MaxLengthValidator::new(3);
        assert!(validator.validate("äöü").is_acceptable());
        assert!(validator.validate("abcd").is_invalid());
        assert_eq!(validator.fixup("abcd"), Some("abc".to_string()));
    }

    #[test]
    fn test_boxed_validators_delegate() {
        let boxed: Box<dyn Validator> = Box::new(FnValidator::new(|text: &str| text.len() < 2));
        assert!(boxed.validate("a").is_acceptable());
        let shared: Arc<dyn Validator> = Arc::new(IntValidator::non_negative());
        assert!(shared.validate("-3").is_invalid());
    }
}
