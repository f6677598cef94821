//! Process-wide logging setup
//!
//! Installed once per process from the pre-scanned global options; later
//! calls are no-ops. Events go to a shared sink so compressed log files can
//! be finished on shutdown.

use anyhow::{Context, Result};
use classifier_core::{Mode, Output, Target};
use once_cell::sync::{Lazy, OnceCell};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalOptions;

static INITIALIZED: OnceCell<()> = OnceCell::new();
static SINK: Lazy<Sink> = Lazy::new(Sink::default);

/// 0 → ERROR, 1 → WARN, 2 → INFO, 3 or more → DEBUG
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global subscriber unless one was installed already.
pub fn init(globals: &GlobalOptions) -> Result<()> {
    INITIALIZED.get_or_try_init(|| install(globals)).map(|_| ())
}

/// Whether a subscriber has been installed
pub fn is_active() -> bool {
    INITIALIZED.get().is_some()
}

fn install(globals: &GlobalOptions) -> Result<()> {
    SINK.open(&globals.log)
        .with_context(|| format!("Failed to open log file {}", globals.log))?;

    let level = level_for(globals.verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    subscriber(globals.verbosity, filter, Sink::clone(&SINK))
        .try_init()
        .context("Failed to install logger")
}

/// Subscriber writing formatted events into `sink`
fn subscriber(verbosity: u8, filter: EnvFilter, sink: Sink) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LogFormat::new(verbosity))
                .with_writer(move || sink.clone()),
        )
        .with(filter)
}

/// Flush and close the log sink.
pub fn shutdown() -> Result<()> {
    SINK.finish().context("Failed to close log file")
}

/// Shared log destination; events are dropped while it is closed
#[derive(Clone, Default)]
pub struct Sink(Arc<Mutex<Option<Output>>>);

impl Sink {
    /// Open `target` for append, finishing whatever was open before.
    pub fn open(&self, target: &Target) -> io::Result<()> {
        let output = Output::open(target, Mode::Append)?;
        match self.lock().replace(output) {
            Some(previous) => previous.finish(),
            None => Ok(()),
        }
    }

    /// Write trailers and close; later events are dropped.
    pub fn finish(&self) -> io::Result<()> {
        match self.lock().take() {
            Some(output) => output.finish(),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Output>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(output) => output.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(output) => output.flush(),
            None => Ok(()),
        }
    }
}

/// Python-style level names: `WARNING` rather than `WARN`
fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN { "WARNING" } else { level.as_str() }
}

/// `LEVEL classifier LINE message` above verbosity 1, else `classifier message`
pub struct LogFormat {
    detailed: bool,
}

impl LogFormat {
    pub fn new(verbosity: u8) -> Self {
        Self { detailed: verbosity > 1 }
    }
}

impl<S, N> FormatEvent<S, N> for LogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let metadata = event.metadata();
        if self.detailed {
            let line = metadata.line().unwrap_or_default();
            write!(writer, "{} classifier {line} ", level_name(metadata.level()))?;
        } else {
            write!(writer, "classifier ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
pub(crate) mod capture {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// In-memory log destination for tests
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
