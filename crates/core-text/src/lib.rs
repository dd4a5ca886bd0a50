//! Line-addressable text buffers.
//!
//! Source-editor commands see a buffer as an ordered sequence of lines that
//! can be read, removed and inserted by index. `LineBuffer` is that contract;
//! `Buffer` is a rope-backed implementation for whole files and `Vec<String>`
//! implements it directly for in-memory hosts.
//!
//! Lines never carry their terminator. `Buffer` follows `str::lines()`
//! semantics: empty text has zero lines and a trailing newline terminates the
//! last line instead of opening an empty one. Whether the text ended with a
//! newline survives any sequence of removals and insertions.

use ropey::Rope;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("line {idx} out of range (buffer has {line_count} lines)")]
    LineOutOfRange { idx: usize, line_count: usize },
}

/// A position inside a buffer expressed as (line index, column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Ordered, index-mutable sequence of lines owned by the host.
pub trait LineBuffer {
    fn line_count(&self) -> usize;

    /// Content of line `idx` without its terminator.
    fn line(&self, idx: usize) -> Option<String>;

    /// Remove line `idx`, returning its content. Lines below shift up by one.
    fn remove_line(&mut self, idx: usize) -> Result<String, BufferError>;

    /// Insert `text` so that it becomes line `idx`. `idx == line_count()` appends.
    /// `text` must not contain a line terminator.
    fn insert_line(&mut self, idx: usize, text: &str) -> Result<(), BufferError>;
}

impl LineBuffer for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, idx: usize) -> Option<String> {
        self.get(idx).cloned()
    }

    fn remove_line(&mut self, idx: usize) -> Result<String, BufferError> {
        if idx >= self.len() {
            return Err(BufferError::LineOutOfRange {
                idx,
                line_count: self.len(),
            });
        }
        Ok(self.remove(idx))
    }

    fn insert_line(&mut self, idx: usize, text: &str) -> Result<(), BufferError> {
        if idx > self.len() {
            return Err(BufferError::LineOutOfRange {
                idx,
                line_count: self.len(),
            });
        }
        self.insert(idx, text.to_string());
        Ok(())
    }
}

/// Line terminator style of a loaded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of rewriting every terminator in a text to `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    /// Majority style; ties go CRLF, then LF, then CR.
    pub original: LineEnding,
    /// More than one terminator style was present.
    pub mixed: bool,
}

/// Count CRLF, LF and lone CR terminators in `input` and rewrite them all to LF.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut seg_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                // Slicing only at '\r' keeps multi-byte UTF-8 sequences intact.
                out.push_str(&input[seg_start..i]);
                out.push('\n');
                if bytes.get(i + 1) == Some(&b'\n') {
                    crlf += 1;
                    i += 2;
                } else {
                    cr += 1;
                    i += 1;
                }
                seg_start = i;
            }
            b'\n' => {
                lf += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&input[seg_start..]);
    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;
    NormalizedText {
        normalized: out,
        original,
        mixed,
    }
}

/// A text buffer backed by a `ropey::Rope`.
///
/// The rope only ever holds `\n` terminators. The dominant terminator of the
/// loaded text is written back by `contents`, so a mixed-ending file comes out
/// with a single style.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    line_ending: LineEnding,
    mixed: bool,
    // Only consulted once every line has been removed; otherwise the rope itself says.
    terminated: bool,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_text(content: &str) -> Self {
        let norm = normalize_line_endings(content);
        Self {
            terminated: norm.normalized.ends_with('\n'),
            rope: Rope::from_str(&norm.normalized),
            line_ending: norm.original,
            mixed: norm.mixed,
        }
    }

    /// Full text, every terminator rendered in the loaded style.
    pub fn contents(&self) -> String {
        let text = self.rope.to_string();
        match self.line_ending {
            LineEnding::Lf => text,
            ending => text.replace('\n', ending.as_str()),
        }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn has_mixed_line_endings(&self) -> bool {
        self.mixed
    }

    fn is_terminated(&self) -> bool {
        let len = self.rope.len_chars();
        len > 0 && self.rope.char(len - 1) == '\n'
    }

    fn out_of_range(&self, idx: usize) -> BufferError {
        BufferError::LineOutOfRange {
            idx,
            line_count: self.line_count(),
        }
    }
}

impl LineBuffer for Buffer {
    fn line_count(&self) -> usize {
        if self.rope.len_chars() == 0 {
            return 0;
        }
        // ropey reports an empty line after a final terminator.
        let lines = self.rope.len_lines();
        if self.is_terminated() { lines - 1 } else { lines }
    }

    fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.line_count() {
            return None;
        }
        let raw = self.rope.line(idx).to_string();
        Some(raw.strip_suffix('\n').unwrap_or(&raw).to_string())
    }

    fn remove_line(&mut self, idx: usize) -> Result<String, BufferError> {
        let count = self.line_count();
        let removed = self.line(idx).ok_or_else(|| self.out_of_range(idx))?;
        let start = self.rope.line_to_char(idx);
        let end = self.rope.line_to_char(idx + 1);
        if idx + 1 == count && idx > 0 && !self.is_terminated() {
            // The previous line's '\n' goes too so it becomes the unterminated last line.
            self.rope.remove(start - 1..end);
        } else {
            self.rope.remove(start..end);
        }
        Ok(removed)
    }

    fn insert_line(&mut self, idx: usize, text: &str) -> Result<(), BufferError> {
        let count = self.line_count();
        if idx > count {
            return Err(self.out_of_range(idx));
        }
        if idx < count {
            let at = self.rope.line_to_char(idx);
            self.rope.insert(at, &format!("{text}\n"));
        } else if self.rope.len_chars() == 0 {
            if self.terminated {
                self.rope.insert(0, &format!("{text}\n"));
            } else {
                self.rope.insert(0, text);
            }
        } else {
            let end = self.rope.len_chars();
            if self.is_terminated() {
                self.rope.insert(end, &format!("{text}\n"));
            } else {
                self.rope.insert(end, &format!("\n{text}"));
            }
        }
        Ok(())
    }
}

/// Indentation helpers operating on a single line.
pub mod indent {
    /// Leading whitespace of `line` (spaces, tabs and other Unicode blanks).
    pub fn leading_whitespace(line: &str) -> &str {
        let end = line
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        &line[..end]
    }
}
