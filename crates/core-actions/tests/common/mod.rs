#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{CommandSet, SourceCommand, SplitReport};
use core_config::SplitConfig;
use core_state::{Selections, TextRange};
use core_text::Position;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

pub fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|s| s.to_string()).collect()
}

pub fn commands() -> CommandSet {
    CommandSet::from_config(&SplitConfig::default())
}

pub fn caret(line: usize) -> Selections {
    Selections::single(TextRange::caret(Position::new(line, 0)))
}

/// Whole lines `first..=last`.
pub fn select_lines(first: usize, last: usize) -> Selections {
    Selections::single(TextRange::lines(first, last))
}

pub fn run(command: SourceCommand, buffer: &mut Vec<String>, selections: &mut Selections) -> SplitReport {
    commands().apply(command, buffer, selections)
}

/// Log sink for `tracing_subscriber::fmt().with_writer(..)`; read back via `captured`.
#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn captured(&self) -> String {
        String::from_utf8(self.inner.lock().expect("log buffer poisoned").clone())
            .expect("log output is UTF-8")
    }
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}
