//! Selection state handed to source-editor commands.
//!
//! A host supplies an ordered set of ranges (several when multi-cursor
//! editing is active). Commands only care about which *lines* those ranges
//! touch, derived by `Selections::line_span`:
//!
//! - start = first range's start line
//! - end = max(last range's end line, start + 1), exclusive
//!
//! A caret (zero-width range) therefore still yields its own line, while a
//! range ending at column 0 of line `n` (a whole-line selection) stops before
//! line `n`. A range that ends mid-way through line `n` also stops before `n`;
//! the end line is never included on its own.

use core_text::Position;
use std::ops::Range;

/// A range between two positions, normalized so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Construct a range normalizing ordering so that start <= end (line, then column).
    pub fn new(mut a: Position, mut b: Position) -> Self {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        Self { start: a, end: b }
    }

    /// Zero-width range (cursor without selection).
    pub fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Whole lines `first..=last` as an editor reports them: from column 0 of
    /// `first` to column 0 of the line after `last`.
    pub fn lines(first: usize, last: usize) -> Self {
        Self::new(Position::new(first, 0), Position::new(last + 1, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered collection of selection ranges owned by the host.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selections {
    ranges: Vec<TextRange>,
}

impl Selections {
    pub fn new(ranges: Vec<TextRange>) -> Self {
        Self { ranges }
    }

    pub fn single(range: TextRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn first(&self) -> Option<&TextRange> {
        self.ranges.first()
    }

    pub fn last(&self) -> Option<&TextRange> {
        self.ranges.last()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Drop every range; afterwards no lines are selected.
    pub fn clear(&mut self) {
        if !self.ranges.is_empty() {
            tracing::trace!(target: "state.selection", ranges = self.ranges.len(), "selection_cleared");
        }
        self.ranges.clear();
    }

    /// Half-open range of line indices touched by the selection, or `None`
    /// when there is no range at all.
    pub fn line_span(&self) -> Option<Range<usize>> {
        let first = self.first()?;
        let last = self.last()?;
        let start = first.start.line;
        let end = last.end.line.max(start + 1);
        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_ordering() {
        let r = TextRange::new(Position::new(4, 2), Position::new(1, 7));
        assert_eq!(r.start, Position::new(1, 7));
        assert_eq!(r.end, Position::new(4, 2));
        let same_line = TextRange::new(Position::new(2, 9), Position::new(2, 3));
        assert_eq!(same_line.start.column, 3);
    }

    #[test]
    fn caret_spans_its_own_line() {
        let sel = Selections::single(TextRange::caret(Position::new(3, 5)));
        assert_eq!(sel.line_span(), Some(3..4));
    }

    #[test]
    fn whole_line_selection_excludes_following_line() {
        let sel = Selections::single(TextRange::lines(2, 4));
        assert_eq!(sel.line_span(), Some(2..5));
    }

    #[test]
    fn partial_end_line_is_not_included() {
        let sel = Selections::single(TextRange::new(Position::new(1, 3), Position::new(3, 4)));
        assert_eq!(sel.line_span(), Some(1..3));
    }

    #[test]
    fn span_uses_first_start_and_last_end() {
        let sel = Selections::new(vec![
            TextRange::caret(Position::new(5, 0)),
            TextRange::caret(Position::new(9, 0)),
        ]);
        assert_eq!(sel.line_span(), Some(5..9));
    }

    #[test]
    fn last_range_before_first_still_yields_one_line() {
        let sel = Selections::new(vec![
            TextRange::caret(Position::new(6, 0)),
            TextRange::caret(Position::new(2, 0)),
        ]);
        assert_eq!(sel.line_span(), Some(6..7));
    }

    #[test]
    fn empty_selection_has_no_span() {
        let mut sel = Selections::single(TextRange::lines(0, 0));
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(sel.line_span(), None);
    }
}
