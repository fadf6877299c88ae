//! Greedy line breaking and per-paragraph row caches.
//!
//! [`break_rows`] turns the characters of one paragraph into visual rows for
//! a break width. [`ParagraphView`] caches those rows and lays them out again
//! lazily, on the first query after something invalidated them.

use std::sync::Arc;

use parking_lot::RwLock;
use quill_core::PerfSpan;

use crate::config::RewrapPolicy;

use super::metrics::{Font, GlyphBounds, GlyphMetrics};

/// The measurement inputs of a layout pass.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub metrics: &'a dyn GlyphMetrics,
    pub font: &'a Font,
}

impl<'a> LayoutContext<'a> {
    pub fn new(metrics: &'a dyn GlyphMetrics, font: &'a Font) -> Self {
        Self { metrics, font }
    }

    /// Height of one row.
    pub fn row_height(&self) -> f32 {
        self.metrics.line_metrics(self.font).height
    }
}

impl std::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext").field("font", self.font).finish_non_exhaustive()
    }
}

/// One visual line of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Bounds of each character, relative to the row's left edge.
    pub glyphs: Vec<GlyphBounds>,
    /// Paragraph-relative offset of the first character.
    pub offset: usize,
    /// Total advance of the row's characters.
    pub width: f32,
    pub height: f32,
}

impl Row {
    /// Number of characters on the row.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Paragraph-relative offset just past the row's last character.
    pub fn end(&self) -> usize {
        self.offset + self.glyphs.len()
    }
}

/// Break `text` into rows no wider than `break_width`.
///
/// Rows break after the last whitespace of the run that overflowed, with the
/// whitespace kept on the ending row. A run without whitespace is cut before
/// the overflowing character; a lone character wider than the break width
/// gets a row of its own. `None` lays everything out on one row.
///
/// Always returns at least one row; an empty paragraph yields one empty row
/// so that offset 0 has a position.
#[tracing::instrument(skip(text, ctx), target = "quill::layout", level = "trace", fields(chars = tracing::field::Empty))]
pub fn break_rows(text: &str, ctx: LayoutContext<'_>, break_width: Option<f32>) -> Vec<Row> {
    let measure = ctx.metrics.measure(ctx.font, text);
    let height = ctx.row_height();
    let chars: Vec<char> = text.chars().collect();
    let glyphs = &measure.glyphs;
    tracing::Span::current().record("chars", chars.len());

    let make_row = |start: usize, end: usize| {
        let origin = glyphs.get(start).map_or(0.0, |g| g.x);
        let row_glyphs: Vec<GlyphBounds> = glyphs[start..end]
            .iter()
            .map(|g| GlyphBounds::new(g.x - origin, g.width))
            .collect();
        let width = row_glyphs.last().map_or(0.0, GlyphBounds::right);
        Row {
            glyphs: row_glyphs,
            offset: start,
            width,
            height,
        }
    };

    let mut rows = Vec::new();
    if let Some(break_width) = break_width {
        let mut start = 0;
        let mut width = 0.0;
        let mut last_whitespace = None;
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() {
                last_whitespace = Some(i);
            }
            width += glyphs[i].width;

            if width > break_width {
                let end = match last_whitespace {
                    Some(whitespace) => whitespace + 1,
                    None if i == start => i + 1,
                    None => i,
                };
                rows.push(make_row(start, end));
                start = end;
                i = end;
                width = 0.0;
                last_whitespace = None;
                continue;
            }
            i += 1;
        }
        rows.push(make_row(start, chars.len()));
    } else {
        rows.push(make_row(0, chars.len()));
    }

    tracing::trace!(target: "quill::layout", rows = rows.len(), "paragraph laid out");
    rows
}

#[derive(Debug)]
struct ViewState {
    rows: Option<Arc<Vec<Row>>>,
    break_width: Option<f32>,
    /// Width of the widest row of the current layout.
    laid_out_width: f32,
}

/// The cached rows of one paragraph.
///
/// Rows are computed on first access and kept until the view is
/// invalidated. A view is bound to its paragraph's text: when the text
/// changes the owner builds a new view.
#[derive(Debug)]
pub struct ParagraphView {
    text: String,
    character_count: usize,
    policy: RewrapPolicy,
    state: RwLock<ViewState>,
}

impl ParagraphView {
    /// Create a view over `text` with no layout yet.
    pub fn new(text: impl Into<String>, break_width: Option<f32>, policy: RewrapPolicy) -> Self {
        let text = text.into();
        let character_count = text.chars().count();
        Self {
            text,
            character_count,
            policy,
            state: RwLock::new(ViewState {
                rows: None,
                break_width,
                laid_out_width: 0.0,
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters in the paragraph, not counting its terminator.
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    pub fn break_width(&self) -> Option<f32> {
        self.state.read().break_width
    }

    /// Change the break width, invalidating the rows as the re-wrap policy
    /// requires.
    pub fn set_break_width(&self, break_width: Option<f32>) {
        let mut state = self.state.write();
        if state.break_width == break_width {
            return;
        }
        let rewrap = match (self.policy, break_width) {
            (RewrapPolicy::Always, _) => true,
            (RewrapPolicy::OnShrink, Some(width)) => {
                width < state.laid_out_width || state.break_width.is_none()
            }
            (RewrapPolicy::OnShrink, None) => true,
        };
        state.break_width = break_width;
        if rewrap {
            state.rows = None;
        }
    }

    /// Drop the cached rows, for example after a font change.
    pub fn invalidate(&self) {
        self.state.write().rows = None;
    }

    /// Whether the rows are cached.
    pub fn is_valid(&self) -> bool {
        self.state.read().rows.is_some()
    }

    /// The rows, laying them out first if needed.
    pub fn rows(&self, ctx: LayoutContext<'_>) -> Arc<Vec<Row>> {
        if let Some(rows) = &self.state.read().rows {
            return Arc::clone(rows);
        }

        let mut state = self.state.write();
        if let Some(rows) = &state.rows {
            return Arc::clone(rows);
        }
        let _span = PerfSpan::new("paragraph layout");
        let rows = Arc::new(break_rows(&self.text, ctx, state.break_width));
        state.laid_out_width = rows.iter().map(|r| r.width).fold(0.0, f32::max);
        state.rows = Some(Arc::clone(&rows));
        rows
    }

    /// Total height of the rows.
    pub fn height(&self, ctx: LayoutContext<'_>) -> f32 {
        self.rows(ctx).iter().map(|r| r.height).sum()
    }

    /// Width of the widest row.
    pub fn width(&self, ctx: LayoutContext<'_>) -> f32 {
        self.rows(ctx).iter().map(|r| r.width).fold(0.0, f32::max)
    }
}

static_assertions::assert_impl_all!(ParagraphView: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::metrics::MonospaceMetrics;

    fn row_texts(text: &str, rows: &[Row]) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        rows.iter().map(|r| chars[r.offset..r.end()].iter().collect()).collect()
    }

    fn layout(text: &str, break_width: Option<f32>) -> Vec<Row> {
        let metrics = MonospaceMetrics::new(10.0, 20.0);
        let font = Font::default();
        break_rows(text, LayoutContext::new(&metrics, &font), break_width)
    }

    #[test]
    fn test_breaks_after_whitespace() {
        let text = "the quick brown fox";
        // "the quick" is 90px, "the quick " is 100px
        let rows = layout(text, Some(95.0));
        assert_eq!(row_texts(text, &rows), vec!["the quick ", "brown fox"]);
        assert_eq!(rows[1].offset, 10);
        assert_eq!(rows[1].glyphs[0].x, 0.0);
        assert_eq!(rows[1].width, 90.0);
    }

    #[test]
    fn test_forced_break_without_whitespace() {
        let text = "abcdefgh";
        let rows = layout(text, Some(35.0));
        assert_eq!(row_texts(text, &rows), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_single_character_wider_than_break_width() {
        let text = "abc";
        let rows = layout(text, Some(5.0));
        assert_eq!(row_texts(text, &rows), vec!["a", "b", "c", ""]);
    }

    #[test]
    fn test_empty_paragraph_has_one_row() {
        let rows = layout("", Some(50.0));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
        assert_eq!(rows[0].height, 20.0);
    }

    #[test]
    fn test_unbounded_is_one_row() {
        let text = "a long line that would otherwise wrap";
        let rows = layout(text, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), text.chars().count());
    }

    #[test]
    fn test_view_lays_out_lazily() {
        let metrics = MonospaceMetrics::new(10.0, 20.0);
        let font = Font::default();
        let ctx = LayoutContext::new(&metrics, &font);
        let view = ParagraphView::new("the quick brown fox", Some(95.0), RewrapPolicy::Always);

        assert!(!view.is_valid());
        assert_eq!(view.rows(ctx).len(), 2);
        assert!(view.is_valid());
        assert_eq!(view.height(ctx), 40.0);

        view.set_break_width(Some(500.0));
        assert!(!view.is_valid());
        assert_eq!(view.rows(ctx).len(), 1);
    }

    #[test]
    fn test_on_shrink_policy_keeps_rows_when_widening() {
        let metrics = MonospaceMetrics::new(10.0, 20.0);
        let font = Font::default();
        let ctx = LayoutContext::new(&metrics, &font);
        let view = ParagraphView::new("the quick brown fox", Some(95.0), RewrapPolicy::OnShrink);
        assert_eq!(view.rows(ctx).len(), 2);

        view.set_break_width(Some(500.0));
        assert!(view.is_valid());
        assert_eq!(view.rows(ctx).len(), 2);

        view.set_break_width(Some(60.0));
        assert!(!view.is_valid());
        assert_eq!(view.rows(ctx).len(), 4);
    }
}
