//! Source-editor commands: the host-facing entry point.
//!
//! A host calls `CommandSet::perform` once per user-triggered command with
//! the buffer, its selection, and a completion handler. The handler is wrapped
//! in a `CompletionGuard` before any work happens, so it fires exactly once
//! with `Ok(())` on every exit path, including early returns and unwinding.
//! Nothing a command can run into is reported as an error: an unmatched line,
//! an empty selection, a splitter whose pattern failed to build, or a buffer
//! rejecting an edit all end as "nothing (more) happened".

use crate::splitter::Splitter;
use crate::{PolicyError, ScanScope, selector};
use core_config::SplitConfig;
use core_state::Selections;
use core_text::{BufferError, LineBuffer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCommand {
    /// Split the first call site in the selection.
    SplitCall,
    /// Split every function declaration in the selection.
    SplitDeclaration,
}

impl SourceCommand {
    pub const ALL: [SourceCommand; 2] = [SourceCommand::SplitCall, SourceCommand::SplitDeclaration];

    pub fn identifier(self) -> &'static str {
        match self {
            SourceCommand::SplitCall => "split-call",
            SourceCommand::SplitDeclaration => "split-declaration",
        }
    }
}

impl fmt::Display for SourceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command `{0}` (expected split-call or split-declaration)")]
pub struct UnknownCommand(pub String);

impl FromStr for SourceCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceCommand::ALL
            .into_iter()
            .find(|cmd| cmd.identifier() == s.trim())
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Buffer and selection handed over by the host for one invocation.
pub struct Invocation<'a, B: LineBuffer + ?Sized> {
    pub buffer: &'a mut B,
    pub selections: &'a mut Selections,
}

impl<'a, B: LineBuffer + ?Sized> Invocation<'a, B> {
    pub fn new(buffer: &'a mut B, selections: &'a mut Selections) -> Self {
        Self { buffer, selections }
    }
}

/// Runs the wrapped completion handler with `Ok(())` when dropped.
pub struct CompletionGuard<F: FnOnce(anyhow::Result<()>)> {
    handler: Option<F>,
}

impl<F: FnOnce(anyhow::Result<()>)> CompletionGuard<F> {
    pub fn new(handler: F) -> Self {
        Self {
            handler: Some(handler),
        }
    }
}

impl<F: FnOnce(anyhow::Result<()>)> Drop for CompletionGuard<F> {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler(Ok(()));
        }
    }
}

/// What one command did to the buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Original (pre-edit) indices of the lines that were split, ascending.
    pub split_lines: Vec<usize>,
    /// Total replacement lines inserted.
    pub lines_inserted: usize,
}

impl SplitReport {
    pub fn is_noop(&self) -> bool {
        self.split_lines.is_empty()
    }
}

/// The commands exposed to the host, each bound to its splitter.
#[derive(Debug, Clone)]
pub struct CommandSet {
    call: Option<Splitter>,
    declaration: Option<Splitter>,
}

impl CommandSet {
    /// Build both splitters. A splitter that cannot be built is logged and its
    /// command becomes a no-op.
    pub fn from_config(config: &SplitConfig) -> Self {
        let call = Splitter::call(config)
            .inspect_err(|e| log_unavailable(SourceCommand::SplitCall, e))
            .ok();
        let declaration = Splitter::declaration(config)
            .inspect_err(|e| log_unavailable(SourceCommand::SplitDeclaration, e))
            .ok();
        Self { call, declaration }
    }

    pub fn with_splitters(call: Option<Splitter>, declaration: Option<Splitter>) -> Self {
        Self { call, declaration }
    }

    pub fn splitter(&self, command: SourceCommand) -> Option<&Splitter> {
        match command {
            SourceCommand::SplitCall => self.call.as_ref(),
            SourceCommand::SplitDeclaration => self.declaration.as_ref(),
        }
    }

    /// Host entry point. Always signals completion with `Ok(())` exactly once.
    pub fn perform<B, F>(&self, command: SourceCommand, invocation: Invocation<'_, B>, completion: F)
    where
        B: LineBuffer + ?Sized,
        F: FnOnce(anyhow::Result<()>),
    {
        let _done = CompletionGuard::new(completion);
        let Invocation { buffer, selections } = invocation;
        if selections.is_empty() {
            debug!(target: "actions.command", command = %command, "no_selection");
            return;
        }
        let report = self.apply(command, buffer, selections);
        info!(
            target: "actions.command",
            command = %command,
            split = report.split_lines.len(),
            inserted = report.lines_inserted,
            "command_complete"
        );
    }

    /// Split candidate lines in the selection, then clear the selection.
    ///
    /// Candidates are read once up front. Each split replaces the line at its
    /// original index shifted by the lines already added above it, and lines
    /// produced by a split are never examined again.
    pub fn apply<B: LineBuffer + ?Sized>(
        &self,
        command: SourceCommand,
        buffer: &mut B,
        selections: &mut Selections,
    ) -> SplitReport {
        let mut report = SplitReport::default();
        if let Some(splitter) = self.splitter(command) {
            let candidates = selector::candidate_lines(&*buffer, &*selections);
            let mut shift = 0usize;
            for (idx, line) in candidates {
                let Some(replacement) = splitter.split_line(&line) else {
                    continue;
                };
                let at = idx + shift;
                if let Err(e) = replace_line(buffer, at, &replacement) {
                    warn!(target: "actions.split", line = idx, at, error = %e, "line_split_failed");
                    break;
                }
                debug!(
                    target: "actions.split",
                    policy = splitter.policy().name(),
                    line = idx,
                    at,
                    produced = replacement.len(),
                    "line_split"
                );
                shift += replacement.len() - 1;
                report.split_lines.push(idx);
                report.lines_inserted += replacement.len();
                if splitter.scope() == ScanScope::FirstMatch {
                    break;
                }
            }
        }
        selections.clear();
        report
    }
}

fn log_unavailable(command: SourceCommand, error: &PolicyError) {
    warn!(target: "actions.command", command = %command, error = %error, "splitter_unavailable");
}

/// Remove line `at`, then insert `replacement` at `at` last-to-first so the
/// lines end up at `at..at + replacement.len()` in order. If an insert is
/// rejected, the lines inserted so far are taken out again and the original
/// line is put back before the error is returned.
fn replace_line<B: LineBuffer + ?Sized>(
    buffer: &mut B,
    at: usize,
    replacement: &[String],
) -> Result<(), BufferError> {
    let original = buffer.remove_line(at)?;
    for (inserted, line) in replacement.iter().rev().enumerate() {
        if let Err(e) = buffer.insert_line(at, line) {
            for _ in 0..inserted {
                buffer.remove_line(at)?;
            }
            buffer.insert_line(at, &original)?;
            return Err(e);
        }
    }
    Ok(())
}
