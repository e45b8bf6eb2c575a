//! Utility items shared between abigen crates.

use ansiterm::Colour;
use std::{env, io};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::MakeWriter,
};

const ACTION_COLUMN_WIDTH: usize = 12;

/// Prints an action message with a green-bold prefix like "   Generating contract Foo".
pub fn println_action_green(action: &str, txt: &str) {
    tracing::info!("{}", format_action(action, txt, Colour::Green));
}

/// Prints an action message with a red-bold prefix like "      Failed contract Foo".
pub fn println_action_red(action: &str, txt: &str) {
    tracing::info!("{}", format_action(action, txt, Colour::Red));
}

/// Prints a warning message to stderr with a yellow prefix.
pub fn println_warning(txt: &str) {
    tracing::warn!("{}: {}", Colour::Yellow.paint("warning"), txt);
}

/// Prints an error message to stderr with a red prefix.
pub fn println_error(txt: &str) {
    tracing::error!("{}: {}", Colour::Red.paint("error"), txt);
}

fn format_action(action: &str, txt: &str, colour: Colour) -> String {
    let action = format!("{action:>ACTION_COLUMN_WIDTH$}");
    format!("{} {txt}", colour.bold().paint(action))
}

const LOG_FILTER: &str = "RUST_LOG";

// Writes ERROR and WARN level logs to stderr and everything else to stdout.
struct StdioTracingWriter {
    writer_mode: TracingWriterMode,
}

impl<'a> MakeWriter<'a> for StdioTracingWriter {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        if self.writer_mode == TracingWriterMode::Stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if self.writer_mode == TracingWriterMode::Stderr
            || (self.writer_mode == TracingWriterMode::Stdio && meta.level() <= &Level::WARN)
        {
            return Box::new(io::stderr());
        }

        Box::new(io::stdout())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingWriterMode {
    /// Write ERROR and WARN to stderr and everything else to stdout.
    Stdio,
    /// Write everything to stdout.
    Stdout,
    /// Write everything to stderr.
    Stderr,
}

#[derive(Debug, Default)]
pub struct TracingSubscriberOptions {
    pub verbosity: Option<u8>,
    pub silent: Option<bool>,
    pub log_level: Option<LevelFilter>,
    pub writer_mode: Option<TracingWriterMode>,
}

impl TracingSubscriberOptions {
    /// Resolves the level filter that overrides `RUST_LOG`, if any.
    ///
    /// An explicit log level wins over verbosity, which wins over silent mode.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.log_level
            .or_else(|| match self.verbosity {
                Some(1) => Some(LevelFilter::DEBUG),
                Some(2..) => Some(LevelFilter::TRACE),
                _ => None,
            })
            .or(match self.silent {
                Some(true) => Some(LevelFilter::OFF),
                _ => None,
            })
    }
}

/// A subscriber built from default `tracing_subscriber::fmt::SubscriberBuilder` such that it
/// would match directly using `println!` throughout the repo.
///
/// `RUST_LOG` environment variable can be used to set different minimum level for the
/// subscriber, default is `INFO`.
pub fn init_tracing_subscriber(options: TracingSubscriberOptions) {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::new("info"),
    };

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_level(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(StdioTracingWriter {
            writer_mode: options.writer_mode.unwrap_or(TracingWriterMode::Stdio),
        });

    // If log level, verbosity, or silent mode is set, it overrides the RUST_LOG setting.
    // `try_init` keeps repeated initialisation (e.g. from tests) from panicking.
    let _ = match options.level_filter() {
        Some(level_filter) => builder.with_max_level(level_filter).try_init(),
        None => builder.try_init(),
    };
}
