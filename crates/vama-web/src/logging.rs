//! `tracing` output routed to the browser console.
//!
//! A `fmt` subscriber formats each event into a [`ConsoleWriter`], which
//! buffers the line and hands it to a [`LineSink`] on drop together with the
//! event's level. The wasm host passes a sink that picks `console.error`,
//! `console.warn`, `console.log` or `console.debug`; tests pass one that
//! records lines.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted line, without its trailing newline.
pub type LineSink = fn(Level, &str);

/// Filter used when the configured directive does not parse.
pub const FALLBACK_FILTER: &str = "info";

/// Buffers one formatted event.
pub struct ConsoleWriter {
    level: Level,
    sink: LineSink,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end_matches('\n');
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

#[derive(Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: LineSink,
}

impl ConsoleMakeWriter {
    #[must_use]
    pub const fn new(sink: LineSink) -> Self {
        Self { sink }
    }

    fn writer(&self, level: Level) -> ConsoleWriter {
        ConsoleWriter {
            level,
            sink: self.sink,
            buf: Vec::with_capacity(128),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.writer(*meta.level())
    }
}

/// Parse `directive`, falling back to [`FALLBACK_FILTER`].
///
/// Returns the filter and, on fallback, the parse error text.
pub fn filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(FALLBACK_FILTER), Some(err.to_string())),
    }
}

/// Build the console subscriber without installing it.
pub fn subscriber(
    filter: EnvFilter,
    sink: LineSink,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter::new(sink))
        .finish()
}

/// Install the console subscriber globally. Returns `false` if a subscriber
/// was already installed.
pub fn init(directive: &str, sink: LineSink) -> bool {
    let (filter, rejected) = filter(directive);
    let installed = tracing::subscriber::set_global_default(subscriber(filter, sink)).is_ok();
    if let Some(err) = rejected {
        tracing::warn!(directive, error = %err, "invalid log filter, using {FALLBACK_FILTER}");
    }
    installed
}
