//! Source-editor commands that reformat a single-line call or declaration
//! into one argument per line.
//!
//! Pipeline for one invocation:
//! * `selector` turns the host selection into candidate `(index, line)` pairs.
//! * `policy` decides whether a line is splittable and captures its parts.
//! * `scan` pairs brackets and splits arguments at nesting depth zero.
//! * `splitter` formats the replacement lines.
//! * `command` mutates the buffer, clears the selection and signals completion.

pub mod command;
pub mod policy;
pub mod scan;
pub mod selector;
pub mod splitter;

pub use command::{
    CommandSet, CompletionGuard, Invocation, SourceCommand, SplitReport, UnknownCommand,
};
pub use policy::{LineMatch, PolicyError, ScanScope, SplitPolicy};
pub use splitter::Splitter;
