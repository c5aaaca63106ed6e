//! Tracing subscriber for a run: coloured console lines plus a plain log file.
//!
//! Both outputs share one `LineFormat`; they differ only in whether ANSI
//! styling is kept and whether each line carries a timestamp.
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "login_profiles::stage";
/// Target used for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "login_profiles::dry_run";

/// Collects the `message` field of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// What kind of line an event becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    DryRun,
    Info,
    Debug,
    Warn,
    Error,
}

impl LineKind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => Self::Error,
            (tracing::Level::WARN, _) => Self::Warn,
            (tracing::Level::INFO, STAGE_TARGET) => Self::Stage,
            (tracing::Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (tracing::Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Console rendering: stage arrows, coloured severities, dimmed debug.
    fn styled(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        }
    }

    /// Log-file rendering: severity tags instead of colour.
    fn plain(self, msg: &str) -> String {
        let tag = match self {
            Self::Stage => return format!("==> {msg}"),
            Self::Info => return format!("    {msg}"),
            Self::DryRun => "dry run",
            Self::Debug => "debug",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        format!("    [{tag}] {msg}")
    }
}

/// Event format for the console or the log file.
#[derive(Debug, Clone, Copy)]
pub(super) enum LineFormat {
    Console,
    File,
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut message = Message::default();
        event.record(&mut message);
        let kind = LineKind::of(event.metadata());
        match self {
            Self::Console => writeln!(writer, "{}", kind.styled(&message.0)),
            Self::File => writeln!(
                writer,
                "[{}] {}",
                format_utc_time(),
                kind.plain(&strip_ansi(&message.0))
            ),
        }
    }
}

/// Start a fresh log file at `path` for `command` and return a layer
/// appending every event to it.
///
/// Returns `None` if the file cannot be written.
pub(super) fn file_layer<S>(
    path: &Path,
    command: &str,
) -> Option<fmt::Layer<S, DefaultFields, LineFormat, Mutex<fs::File>>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let header = format!(
        "# custom-login {command} ({}) started {} UTC\n",
        crate::commands::version(),
        format_utc_datetime()
    );
    fs::write(path, header).ok()?;
    let file = fs::OpenOptions::new().append(true).open(path).ok()?;
    Some(
        fmt::layer()
            .event_format(LineFormat::File)
            .with_ansi(false)
            .with_writer(Mutex::new(file)),
    )
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (info and below) and stderr (warnings and
/// errors); every event at `debug` and above is also appended to
/// `$XDG_CACHE_HOME/login-profiles/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console = fmt::layer()
        .event_format(LineFormat::Console)
        .with_writer(
            std::io::stderr
                .with_max_level(tracing::Level::WARN)
                .and(std::io::stdout.with_min_level(tracing::Level::INFO)),
        )
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(console)
        .with(
            log_file_path(command)
                .and_then(|path| file_layer(&path, command))
                .map(|layer| layer.with_filter(LevelFilter::DEBUG)),
        )
        .init();
}
