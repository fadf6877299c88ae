//! Glyph measurement.
//!
//! Layout never measures text itself. It asks a [`GlyphMetrics`] provider for
//! per-character advances and line metrics, so a host can plug in its real
//! font machinery. [`MonospaceMetrics`] is a deterministic provider for hosts
//! with fixed-width text and for tests.

/// A font as seen by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Family name.
    pub family: String,
    /// Point size.
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 12.0)
    }
}

/// Horizontal bounds of one character, relative to the start of the
/// measured run (or of the row, once laid out).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBounds {
    pub x: f32,
    pub width: f32,
}

impl GlyphBounds {
    pub fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Horizontal midpoint.
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// The logical bounds of a measured run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMeasure {
    /// Total advance of the run.
    pub width: f32,
    /// One entry per character, in order.
    pub glyphs: Vec<GlyphBounds>,
}

/// Vertical metrics of a font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    /// Distance between consecutive baselines.
    pub height: f32,
}

/// Process-wide rendering hints that influence measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderingHints {
    pub antialiased: bool,
    pub fractional_metrics: bool,
}

impl Default for RenderingHints {
    fn default() -> Self {
        Self {
            antialiased: true,
            fractional_metrics: false,
        }
    }
}

/// Measures text for layout.
///
/// Implementations must be deterministic: the same font, text and hints
/// always produce the same measurements.
pub trait GlyphMetrics: Send + Sync {
    /// Measure `text` set in `font`, one glyph per character.
    fn measure(&self, font: &Font, text: &str) -> TextMeasure;

    /// Vertical metrics of `font`.
    fn line_metrics(&self, font: &Font) -> LineMetrics;

    /// The hints this provider measures with.
    fn hints(&self) -> RenderingHints {
        RenderingHints::default()
    }
}

/// Every character has the same advance, regardless of the font.
///
/// Tabs advance by `tab_width` characters. Without fractional metrics the
/// advance is rounded to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    advance: f32,
    line_height: f32,
    tab_width: usize,
    hints: RenderingHints,
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            tab_width: 1,
            hints: RenderingHints::default(),
        }
    }

    /// Set how many advances a tab takes.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Set the rendering hints.
    pub fn with_hints(mut self, hints: RenderingHints) -> Self {
        self.hints = hints;
        self
    }

    fn advance(&self) -> f32 {
        if self.hints.fractional_metrics {
            self.advance
        } else {
            self.advance.round()
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure(&self, _font: &Font, text: &str) -> TextMeasure {
        let advance = self.advance();
        let mut x = 0.0;
        let glyphs = text
            .chars()
            .map(|c| {
                let width = if c == '\t' {
                    advance * self.tab_width as f32
                } else {
                    advance
                };
                let glyph = GlyphBounds::new(x, width);
                x += width;
                glyph
            })
            .collect();
        TextMeasure { width: x, glyphs }
    }

    fn line_metrics(&self, _font: &Font) -> LineMetrics {
        let ascent = self.line_height * 0.8;
        LineMetrics {
            ascent,
            descent: self.line_height - ascent,
            height: self.line_height,
        }
    }

    fn hints(&self) -> RenderingHints {
        self.hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_measure() {
        let metrics = MonospaceMetrics::new(10.0, 20.0).with_tab_width(4);
        let measure = metrics.measure(&Font::default(), "a\tb");
        assert_eq!(measure.width, 60.0);
        assert_eq!(measure.glyphs[1], GlyphBounds::new(10.0, 40.0));
        assert_eq!(measure.glyphs[2].x, 50.0);
        assert_eq!(metrics.line_metrics(&Font::default()).height, 20.0);
    }

    #[test]
    fn test_fractional_metrics_hint() {
        let rounded = MonospaceMetrics::new(7.4, 16.0);
        assert_eq!(rounded.measure(&Font::default(), "ab").width, 14.0);

        let fractional = rounded.with_hints(RenderingHints {
            antialiased: true,
            fractional_metrics: true,
        });
        assert!((fractional.measure(&Font::default(), "ab").width - 14.8).abs() < 1e-4);
    }
}
