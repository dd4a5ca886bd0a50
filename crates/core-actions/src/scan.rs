//! Single-pass bracket scanner over one line of source text.
//!
//! Tracks `()`, `[]`, `{}` nesting, double-quoted strings with backslash
//! escapes, char literals (`'x'`, `'\n'`) and generic parameter lists such as
//! `Dictionary<String, Int>`. The scanner never looks past the line it is
//! given; a bracket left open at the end simply means "unbalanced".
//!
//! `<`/`>` are ambiguous with comparison operators, so `<` only opens a generic
//! list when glued to an identifier (`Vec<`, `::<`) and followed by a
//! non-blank, and `>` only closes one that is open and is not part of `->`/`=>`.
//! A `<` still open when the argument text ends was a comparison after all
//! (`i<n, j`); the split is redone with it treated as one.

#[derive(Debug, Default)]
struct Nesting {
    // Expected closer plus the generic opens to restore once it closes.
    closers: Vec<(char, Vec<usize>)>,
    // Byte offsets of the open generic `<`s at the current bracket level.
    angles: Vec<usize>,
    // Byte offsets of `<`s known to be comparisons.
    comparisons: Vec<usize>,
    quote: Option<char>,
    escaped: bool,
}

impl Nesting {
    fn is_top_level(&self) -> bool {
        self.closers.is_empty() && self.angles.is_empty() && self.quote.is_none()
    }

    /// Advance over `c` found at byte `idx`. `prev` is the character before it
    /// and `rest` the text after it. Returns false when `c` closes a bracket it
    /// does not match.
    fn feed(&mut self, prev: Option<char>, c: char, idx: usize, rest: &str) -> bool {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return true;
        }
        match c {
            '"' => self.quote = Some('"'),
            '\'' if opens_char_literal(rest) => self.quote = Some('\''),
            '(' => self.open(')'),
            '[' => self.open(']'),
            '{' => self.open('}'),
            ')' | ']' | '}' => {
                if !self.closers.last().is_some_and(|(closer, _)| *closer == c) {
                    return false;
                }
                if let Some((_, outer)) = self.closers.pop() {
                    self.angles = outer;
                }
            }
            '<' if !self.comparisons.contains(&idx) && opens_generic(prev, rest) => {
                self.angles.push(idx)
            }
            '>' if !self.angles.is_empty() && !matches!(prev, Some('-') | Some('=')) => {
                self.angles.pop();
            }
            _ => {}
        }
        true
    }

    fn open(&mut self, closer: char) {
        let outer = std::mem::take(&mut self.angles);
        self.closers.push((closer, outer));
    }
}

fn opens_char_literal(rest: &str) -> bool {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), _) => true,
        (Some(_), Some('\'')) => true,
        _ => false,
    }
}

fn opens_generic(prev: Option<char>, rest: &str) -> bool {
    let glued = prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == ':');
    let next_ok = rest
        .chars()
        .next()
        .is_some_and(|n| !n.is_whitespace() && n != '=' && n != '<');
    glued && next_ok
}

/// Byte index of the `)` matching the `(` at byte `open`, or `None` when
/// `open` is not a `(` or the group is not closed on this line.
pub fn find_matching_close(line: &str, open: usize) -> Option<usize> {
    if line.get(open..)?.chars().next()? != '(' {
        return None;
    }
    let mut nesting = Nesting::default();
    let mut prev = None;
    for (offset, c) in line[open..].char_indices() {
        let idx = open + offset;
        let rest = &line[idx + c.len_utf8()..];
        if !nesting.feed(prev, c, idx, rest) {
            return None;
        }
        if nesting.closers.is_empty() && nesting.quote.is_none() {
            return Some(idx);
        }
        prev = Some(c);
    }
    None
}

/// Split argument text on commas at nesting depth zero.
///
/// Each piece keeps its trailing comma and is trimmed; blank pieces (for
/// example after a trailing comma) are dropped.
pub fn split_top_level(args: &str) -> Vec<String> {
    let mut comparisons = Vec::new();
    loop {
        let (pieces, unclosed) = split_pass(args, &comparisons);
        match unclosed {
            Some(at) => comparisons.push(at),
            None => return pieces,
        }
    }
}

/// One split over `args`, plus the last generic `<` left unclosed, if any.
fn split_pass(args: &str, comparisons: &[usize]) -> (Vec<String>, Option<usize>) {
    let mut pieces = Vec::new();
    let mut nesting = Nesting {
        comparisons: comparisons.to_vec(),
        ..Nesting::default()
    };
    let mut start = 0;
    let mut prev = None;
    for (idx, c) in args.char_indices() {
        let next = idx + c.len_utf8();
        if c == ',' && nesting.is_top_level() {
            push_piece(&mut pieces, &args[start..next]);
            start = next;
        } else {
            // Stray closers are tolerated here; only the outer match must balance.
            nesting.feed(prev, c, idx, &args[next..]);
        }
        prev = Some(c);
    }
    push_piece(&mut pieces, &args[start..]);
    (pieces, nesting.angles.last().copied())
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn close_of_simple_call() {
        let line = "foo(a, b) {";
        assert_eq!(find_matching_close(line, 3), Some(8));
    }

    #[test]
    fn close_skips_nested_groups() {
        let line = "x = foo(bar(1, 2), [3, (4)]) + 1";
        let open = line.find('(').unwrap();
        assert_eq!(find_matching_close(line, open), Some(line.len() - 5));
    }

    #[test]
    fn close_ignores_parens_in_strings() {
        let line = r#"log("a) \" (b", c)"#;
        assert_eq!(find_matching_close(line, 3), Some(line.len() - 1));
    }

    #[test]
    fn unclosed_or_mismatched_is_none() {
        assert_eq!(find_matching_close("foo(a, b", 3), None);
        assert_eq!(find_matching_close("foo(a]", 3), None);
        assert_eq!(find_matching_close("foo(a)", 0), None);
        assert_eq!(find_matching_close("foo", 10), None);
    }

    #[test]
    fn split_simple_list() {
        assert_eq!(split_top_level("a, b, c"), vec!["a,", "b,", "c"]);
    }

    #[test]
    fn split_keeps_nested_commas() {
        assert_eq!(
            split_top_level("bar(1, 2), [3, 4], { x, y }, z"),
            vec!["bar(1, 2),", "[3, 4],", "{ x, y },", "z"]
        );
    }

    #[test]
    fn split_keeps_commas_in_literals() {
        assert_eq!(
            split_top_level(r#""a, b", ',', "c\", d""#),
            vec![r#""a, b","#, "',',", r#""c\", d""#]
        );
    }

    #[test]
    fn split_respects_generics() {
        assert_eq!(
            split_top_level("map: Dictionary<String, Int>, f: (Int) -> Void, n: Int"),
            vec!["map: Dictionary<String, Int>,", "f: (Int) -> Void,", "n: Int"]
        );
        assert_eq!(
            split_top_level("x: HashMap<K, Vec<V>>, y: u8"),
            vec!["x: HashMap<K, Vec<V>>,", "y: u8"]
        );
    }

    #[test]
    fn generic_depth_survives_inner_tuple() {
        assert_eq!(
            split_top_level("x: Vec<(A, B), C>, y: D"),
            vec!["x: Vec<(A, B), C>,", "y: D"]
        );
    }

    #[test]
    fn comparisons_are_not_generics() {
        assert_eq!(split_top_level("a < b, c > d"), vec!["a < b,", "c > d"]);
    }

    #[test]
    fn unclosed_angle_is_a_comparison() {
        assert_eq!(split_top_level("i<n, j"), vec!["i<n,", "j"]);
        assert_eq!(
            split_top_level("a<b ? a : b, c"),
            vec!["a<b ? a : b,", "c"]
        );
        assert_eq!(
            split_top_level("x<Vec<y, z"),
            vec!["x<Vec<y,", "z"]
        );
    }

    #[test]
    fn closed_generic_kept_beside_comparison() {
        assert_eq!(
            split_top_level("m: Map<K, V>, i<n, j"),
            vec!["m: Map<K, V>,", "i<n,", "j"]
        );
    }

    #[test]
    fn lifetimes_are_not_char_literals() {
        assert_eq!(
            split_top_level("s: &'a str, t: &'b str"),
            vec!["s: &'a str,", "t: &'b str"]
        );
    }

    #[test]
    fn trailing_comma_and_blanks_dropped() {
        assert_eq!(split_top_level("a,  b, "), vec!["a,", "b,"]);
        assert_eq!(split_top_level("   "), Vec::<String>::new());
    }

    #[test]
    fn commas_without_space_still_split() {
        assert_eq!(split_top_level("a,b"), vec!["a,", "b"]);
    }
}
