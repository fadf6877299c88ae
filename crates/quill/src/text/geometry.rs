//! Caret and selection geometry over laid-out rows.
//!
//! The functions here work on the rows of a single paragraph, in paragraph
//! coordinates: x from the paragraph's left edge, y from its top, offsets
//! relative to its first character. Rows stack vertically in order.

use crate::geometry::Rect;

use super::layout::Row;
use super::selection::Direction;

/// Index of the row holding `index`: the last row starting at or before it.
pub fn row_index_of(rows: &[Row], index: usize) -> usize {
    rows.iter().rposition(|row| row.offset <= index).unwrap_or(0)
}

fn row_top(rows: &[Row], row_index: usize) -> f32 {
    rows[..row_index].iter().map(|row| row.height).sum()
}

/// Bounds of the character at `index`.
///
/// The offset just past the last character (the paragraph terminator)
/// yields a zero-width rectangle right after the last glyph.
///
/// # Panics
///
/// Panics if `index` lies past the end of the last row.
pub fn character_bounds(rows: &[Row], index: usize) -> Rect {
    let row_index = row_index_of(rows, index);
    let row = &rows[row_index];
    let local = index - row.offset;
    assert!(
        local <= row.len(),
        "index {index} out of bounds for paragraph of {} characters",
        rows.last().map_or(0, Row::end)
    );

    let top = row_top(rows, row_index);
    match row.glyphs.get(local) {
        Some(glyph) => Rect::new(glyph.x, top, glyph.width, row.height),
        None => Rect::new(row.width, top, 0.0, row.height),
    }
}

/// Resolve `x` within row `row_index` to an offset.
///
/// Left of the first glyph resolves to the row's first offset. Right of the
/// last glyph resolves past the last character on the final row, and to the
/// last character on earlier rows so the caret stays on the clicked row.
/// Past a glyph's midpoint the next offset wins, except on the last glyph of
/// a wrapped row.
pub fn row_insertion_point(rows: &[Row], row_index: usize, x: f32) -> usize {
    let row = &rows[row_index];
    let is_last_row = row_index + 1 == rows.len();
    if row.is_empty() {
        return row.offset;
    }

    for (i, glyph) in row.glyphs.iter().enumerate() {
        if x < glyph.right() {
            let past_middle = x > glyph.center();
            let stays_on_row = i + 1 < row.len() || is_last_row;
            return if past_middle && stays_on_row {
                row.offset + i + 1
            } else {
                row.offset + i
            };
        }
    }

    if is_last_row { row.end() } else { row.end() - 1 }
}

/// Map a point to the nearest offset, or `None` when `y` lies above or
/// below the rows.
pub fn insertion_point(rows: &[Row], x: f32, y: f32) -> Option<usize> {
    if y < 0.0 {
        return None;
    }
    let mut top = 0.0;
    for (row_index, row) in rows.iter().enumerate() {
        if y < top + row.height {
            return Some(row_insertion_point(rows, row_index, x));
        }
        top += row.height;
    }
    None
}

/// The offset one row above or below the row holding `from`, at
/// horizontal position `x`. `None` at the first row going backward or the
/// last row going forward.
pub fn next_insertion_point(rows: &[Row], x: f32, from: usize, direction: Direction) -> Option<usize> {
    let row_index = row_index_of(rows, from);
    let target = match direction {
        Direction::Backward => row_index.checked_sub(1)?,
        Direction::Forward => Some(row_index + 1).filter(|&i| i < rows.len())?,
    };
    Some(row_insertion_point(rows, target, x))
}

/// The highlighted area of a selection: up to three rectangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionRegion {
    rects: Vec<Rect>,
}

impl SelectionRegion {
    /// An empty region.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The bounding box, for repainting.
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.rects.split_first()?;
        Some(rest.iter().fold(*first, |acc, rect| acc.union(rect)))
    }

    /// Shift every rectangle.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            rects: self.rects.iter().map(|r| r.offset(dx, dy)).collect(),
        }
    }
}

/// Build the region between the bounds of the first selected character
/// (`leading`) and of the offset just past the selection (`trailing`).
///
/// On one row this is a single rectangle. Otherwise the leading row is
/// highlighted to `content_right`, any rows in between across the full
/// content width, and the trailing row from `content_left`. A trailing band
/// of zero width (a selection ending at a row start) is omitted.
pub fn selection_region(leading: Rect, trailing: Rect, content_left: f32, content_right: f32) -> SelectionRegion {
    let mut rects = Vec::with_capacity(3);

    if leading.top() == trailing.top() {
        rects.push(Rect::from_edges(
            leading.left(),
            leading.top(),
            trailing.left(),
            leading.bottom(),
        ));
    } else {
        rects.push(Rect::from_edges(
            leading.left(),
            leading.top(),
            content_right,
            leading.bottom(),
        ));
        if trailing.top() > leading.bottom() {
            rects.push(Rect::from_edges(
                content_left,
                leading.bottom(),
                content_right,
                trailing.top(),
            ));
        }
        if trailing.left() > content_left {
            rects.push(Rect::from_edges(
                content_left,
                trailing.top(),
                trailing.left(),
                trailing.bottom(),
            ));
        }
    }

    SelectionRegion { rects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewrapPolicy;
    use crate::text::layout::{LayoutContext, ParagraphView};
    use crate::text::metrics::{Font, MonospaceMetrics};

    /// "the quick brown fox" wrapped at 95px: rows "the quick " and "brown fox",
    /// 10px per character, 20px per row.
    fn setup() -> Vec<Row> {
        let metrics = MonospaceMetrics::new(10.0, 20.0);
        let font = Font::default();
        let view = ParagraphView::new("the quick brown fox", Some(95.0), RewrapPolicy::Always);
        view.rows(LayoutContext::new(&metrics, &font)).as_ref().clone()
    }

    #[test]
    fn test_row_index_of() {
        let rows = setup();
        assert_eq!(row_index_of(&rows, 0), 0);
        assert_eq!(row_index_of(&rows, 9), 0);
        assert_eq!(row_index_of(&rows, 10), 1);
        assert_eq!(row_index_of(&rows, 19), 1);
    }

    #[test]
    fn test_character_bounds() {
        let rows = setup();
        assert_eq!(character_bounds(&rows, 4), Rect::new(40.0, 0.0, 10.0, 20.0));
        assert_eq!(character_bounds(&rows, 11), Rect::new(10.0, 20.0, 10.0, 20.0));
        // terminator position
        assert_eq!(character_bounds(&rows, 19), Rect::new(90.0, 20.0, 0.0, 20.0));
    }

    #[test]
    fn test_insertion_point_midpoint_bias() {
        let rows = setup();
        assert_eq!(insertion_point(&rows, 12.0, 5.0), Some(1));
        assert_eq!(insertion_point(&rows, 17.0, 5.0), Some(2));
        assert_eq!(insertion_point(&rows, -5.0, 25.0), Some(10));
        assert_eq!(insertion_point(&rows, 5.0, -1.0), None);
        assert_eq!(insertion_point(&rows, 5.0, 40.0), None);
    }

    #[test]
    fn test_insertion_point_past_row_end() {
        let rows = setup();
        // wrapped row: stays on the row, at its last character
        assert_eq!(insertion_point(&rows, 500.0, 5.0), Some(9));
        assert_eq!(insertion_point(&rows, 98.0, 5.0), Some(9));
        // final row: past the last character
        assert_eq!(insertion_point(&rows, 500.0, 25.0), Some(19));
        assert_eq!(insertion_point(&rows, 88.0, 25.0), Some(19));
    }

    #[test]
    fn test_next_insertion_point() {
        let rows = setup();
        assert_eq!(next_insertion_point(&rows, 22.0, 2, Direction::Forward), Some(12));
        assert_eq!(next_insertion_point(&rows, 22.0, 12, Direction::Backward), Some(2));
        assert_eq!(next_insertion_point(&rows, 22.0, 2, Direction::Backward), None);
        assert_eq!(next_insertion_point(&rows, 22.0, 12, Direction::Forward), None);
    }

    #[test]
    fn test_single_row_selection_region() {
        let rows = setup();
        let region = selection_region(character_bounds(&rows, 2), character_bounds(&rows, 5), 0.0, 95.0);
        assert_eq!(region.rects(), &[Rect::new(20.0, 0.0, 30.0, 20.0)]);
    }

    #[test]
    fn test_multi_row_selection_region() {
        let leading = Rect::new(30.0, 0.0, 10.0, 20.0);
        let trailing = Rect::new(20.0, 40.0, 10.0, 20.0);
        let region = selection_region(leading, trailing, 0.0, 100.0);
        assert_eq!(
            region.rects(),
            &[
                Rect::new(30.0, 0.0, 70.0, 20.0),
                Rect::new(0.0, 20.0, 100.0, 20.0),
                Rect::new(0.0, 40.0, 20.0, 20.0),
            ]
        );
        assert_eq!(region.bounds(), Some(Rect::new(0.0, 0.0, 100.0, 60.0)));

        let adjacent = selection_region(leading, Rect::new(20.0, 20.0, 10.0, 20.0), 0.0, 100.0);
        assert_eq!(adjacent.len(), 2);
    }
}
