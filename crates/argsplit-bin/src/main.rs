//! argsplit entrypoint: a command-line host for the source-editor commands.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{CommandSet, Invocation, SourceCommand};
use core_config::load_from;
use core_state::{Selections, TextRange};
use core_text::Buffer;
use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Once;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "argsplit",
    version,
    about = "Split a call or declaration onto one argument per line"
)]
struct Args {
    /// File to reformat (UTF-8 text). Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Command to run: `split-call` or `split-declaration`.
    #[arg(long, short = 'c', default_value = "split-call")]
    pub command: SourceCommand,
    /// First selected line (1-based).
    #[arg(long, short = 'l', default_value = "1")]
    pub line: NonZeroUsize,
    /// Last selected line (1-based, inclusive). Defaults to `--line`.
    #[arg(long, short = 't')]
    pub to: Option<NonZeroUsize>,
    /// Write the result back to PATH instead of stdout.
    #[arg(long = "in-place", short = 'i', requires = "path")]
    pub in_place: bool,
    /// Optional configuration file path (overrides discovery of `argsplit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Whole-line selection covering `--line..=--to`, zero-based.
    fn selection(&self) -> Selections {
        let first = self.line.get() - 1;
        let last = self.to.map_or(first, |to| to.get() - 1);
        Selections::single(TextRange::lines(first.min(last), first.max(last)))
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let (nb_writer, guard) = tracing_appender::non_blocking(io::stderr());
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_input(args: &Args) -> Result<Buffer> {
    let content = match args.path.as_ref() {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
            content
        }
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("reading stdin")?;
            debug!(target: "io", size_bytes = content.len(), "stdin_read_ok");
            content
        }
    };
    let buffer = Buffer::from_text(&content);
    if buffer.has_mixed_line_endings() {
        warn!(
            target: "io",
            written_as = ?buffer.line_ending(),
            "mixed_line_endings_normalized"
        );
    }
    Ok(buffer)
}

/// Run one command against `buffer` the way an editor host would.
fn run_command(
    commands: &CommandSet,
    command: SourceCommand,
    buffer: &mut Buffer,
    selections: &mut Selections,
) {
    commands.perform(command, Invocation::new(buffer, selections), |res| {
        if let Err(e) = res {
            tracing::error!(target: "runtime", error = %e, "command_failed");
        }
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", command = %args.command, "startup");

    let config = load_from(args.config.clone())?;
    let commands = CommandSet::from_config(&config.file.split);
    let mut buffer = read_input(&args)?;
    let mut selections = args.selection();

    run_command(&commands, args.command, &mut buffer, &mut selections);

    let output = buffer.contents();
    match (&args.path, args.in_place) {
        (Some(path), true) => {
            std::fs::write(path, output).with_context(|| format!("writing {}", path.display()))?;
            debug!(target: "io", file = %path.display(), "file_write_ok");
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
