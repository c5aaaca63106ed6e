//! Console/file logger with indentation scopes and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, Status, SummaryEntry};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with indentation and summary collection.
///
/// Messages go through `tracing`, so the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where
/// they land.  Indentation is applied here, before the event is emitted, so
/// the console and the log file show the same structure.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<SummaryEntry>>,
    log_file: Option<PathBuf>,
    depth: AtomicUsize,
}

impl Logger {
    /// Create a logger for `command`, remembering the log file path for the summary.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
            depth: AtomicUsize::new(0),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    fn indented(&self, msg: &str) -> String {
        let depth = self.depth.load(Ordering::SeqCst);
        format!("{}{msg}", "  ".repeat(depth))
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{}", self.indented(msg));
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{}", self.indented(msg));
    }

    /// Log a stage header (major section). Stage headers are never indented.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{}", self.indented(msg));
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{}", self.indented(msg));
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{}", self.indented(msg));
    }

    /// Record an item result for the summary.
    pub fn record(&self, name: &str, status: Status, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(SummaryEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded summary entries.
    #[must_use]
    pub fn entries(&self) -> Vec<SummaryEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed items.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard.iter().filter(|t| t.status == Status::Failed).count()
        })
    }

    /// Print the summary of all recorded items.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for entry in &entries {
            let (icon, color) = match entry.status {
                Status::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                Status::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                Status::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.name));
        }

        let total = ok + dry_run + failed;
        self.info(&format!(
            "{total} profiles: \x1b[32m{ok} ok\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record(&self, name: &str, status: Status, message: Option<&str>) {
        self.record(name, status, message);
    }

    fn indent(&self) {
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn unindent(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
    }
}
