//! Matching policies: which single-line shapes are splittable.
//!
//! A policy's regex only recognizes the *head* of a line: everything after
//! the indentation up to and including the opening parenthesis. The argument text
//! and tail are then found by pairing that parenthesis with its close via
//! `scan::find_matching_close`, so nested groups and literals never confuse
//! where the argument list ends.

use crate::scan;
use core_text::indent;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("declaration policy needs at least one keyword")]
    NoKeywords,
    #[error("invalid head pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// How many matching lines one invocation rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    /// Stop after the first splittable line.
    FirstMatch,
    /// Rewrite every splittable line in the selection.
    EveryMatch,
}

/// Parts of a splittable line. All slices borrow from the original line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub indent: &'a str,
    /// From the first non-blank character through the opening `(`.
    pub head: &'a str,
    /// Text strictly between the parentheses; never blank.
    pub args: &'a str,
    /// From the closing `)` to end of line.
    pub tail: &'a str,
}

#[derive(Debug, Clone)]
pub struct SplitPolicy {
    name: &'static str,
    head: Regex,
    scope: ScanScope,
}

const CALL_HEAD: &str = r"^[^\s(][^(]*\(";

impl SplitPolicy {
    /// Any call site: a non-blank run ending at the line's first `(`.
    pub fn call() -> Result<Self, PolicyError> {
        Ok(Self {
            name: "call",
            head: Regex::new(CALL_HEAD)?,
            scope: ScanScope::FirstMatch,
        })
    }

    /// Declarations introduced by one of `keywords`: optional modifier words,
    /// the keyword, an identifier, an optional `<...>` generic list, then `(`.
    pub fn declaration<S: AsRef<str>>(keywords: &[S]) -> Result<Self, PolicyError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Err(PolicyError::NoKeywords);
        }
        let pattern = format!(
            r"^(?:[^\s(]+\s+)*?(?:{})\s+[\p{{L}}_][\p{{L}}\p{{N}}_]*\s*(?:<[^()]*>)?\s*\(",
            alternatives.join("|")
        );
        Ok(Self {
            name: "declaration",
            head: Regex::new(&pattern)?,
            scope: ScanScope::EveryMatch,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn scope(&self) -> ScanScope {
        self.scope
    }

    pub fn with_scope(mut self, scope: ScanScope) -> Self {
        self.scope = scope;
        self
    }

    /// Match `line`, or `None` when it is not splittable under this policy.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<LineMatch<'a>> {
        let indent = indent::leading_whitespace(line);
        let head = self.head.find(&line[indent.len()..])?;
        let open = indent.len() + head.end() - 1;
        let close = scan::find_matching_close(line, open)?;
        let args = &line[open + 1..close];
        if args.trim().is_empty() {
            return None;
        }
        Some(LineMatch {
            indent,
            head: head.as_str(),
            args,
            tail: &line[close..],
        })
    }
}
