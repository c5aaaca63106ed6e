//! In-memory [`Log`] sink.
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::{Log, Status, SummaryEntry};

/// Severity tag of a captured line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// [`Log::stage`]
    Stage,
    /// [`Log::info`]
    Info,
    /// [`Log::debug`]
    Debug,
    /// [`Log::warn`]
    Warn,
    /// [`Log::error`]
    Error,
    /// [`Log::dry_run`]
    DryRun,
}

/// A [`Log`] that keeps every message in memory, indentation included.
///
/// Used by tests and by callers that want to inspect what a run reported
/// without going through `tracing`.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<(Level, String)>>,
    summary: Mutex<Vec<SummaryEntry>>,
    depth: AtomicUsize,
}

impl MemoryLog {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, msg: &str) {
        let depth = self.depth.load(Ordering::SeqCst);
        let line = format!("{}{msg}", "  ".repeat(depth));
        if let Ok(mut guard) = self.lines.lock() {
            guard.push((level, line));
        }
    }

    /// All captured lines, in order, without level tags.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map_or_else(|_| vec![], |g| g.iter().map(|(_, l)| l.clone()).collect())
    }

    /// Captured lines at `level`, in order.
    #[must_use]
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines.lock().map_or_else(
            |_| vec![],
            |g| {
                g.iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, line)| line.clone())
                    .collect()
            },
        )
    }

    /// Whether any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    /// Summary entries recorded so far.
    #[must_use]
    pub fn summary(&self) -> Vec<SummaryEntry> {
        self.summary.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }

    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn dry_run(&self, msg: &str) {
        self.push(Level::DryRun, msg);
    }

    fn record(&self, name: &str, status: Status, message: Option<&str>) {
        if let Ok(mut guard) = self.summary.lock() {
            guard.push(SummaryEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    fn indent(&self) {
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn unindent(&self) {
        // Saturate so an unbalanced unindent cannot wrap around.
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
    }
}
