//! Line Selector: candidate lines for one invocation.

use core_state::Selections;
use core_text::LineBuffer;

/// Ordered `(index, text)` pairs for every line in the selection's line span,
/// read from the buffer as it is before any edit. Indices past the end of the
/// buffer are skipped; an empty selection yields nothing.
pub fn candidate_lines<B: LineBuffer + ?Sized>(
    buffer: &B,
    selections: &Selections,
) -> Vec<(usize, String)> {
    let Some(span) = selections.line_span() else {
        return Vec::new();
    };
    let line_count = buffer.line_count();
    if span.end > line_count {
        tracing::trace!(target: "actions.select", start = span.start, end = span.end, line_count, "span_clamped");
    }
    (span.start..span.end.min(line_count))
        .filter_map(|idx| buffer.line(idx).map(|text| (idx, text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::TextRange;
    use core_text::Position;

    fn buffer() -> Vec<String> {
        ["zero", "one", "two", "three"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn caret_selects_its_line() {
        let sel = Selections::single(TextRange::caret(Position::new(2, 1)));
        assert_eq!(
            candidate_lines(&buffer(), &sel),
            vec![(2, "two".to_string())]
        );
    }

    #[test]
    fn multi_line_range_in_order() {
        let sel = Selections::single(TextRange::lines(1, 2));
        let lines = candidate_lines(&buffer(), &sel);
        assert_eq!(
            lines.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn out_of_range_is_clamped() {
        let sel = Selections::single(TextRange::lines(3, 8));
        assert_eq!(
            candidate_lines(&buffer(), &sel),
            vec![(3, "three".to_string())]
        );
        let past = Selections::single(TextRange::caret(Position::new(10, 0)));
        assert!(candidate_lines(&buffer(), &past).is_empty());
    }

    #[test]
    fn empty_selection_yields_nothing() {
        assert!(candidate_lines(&buffer(), &Selections::default()).is_empty());
    }
}
