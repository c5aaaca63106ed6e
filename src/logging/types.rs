//! Core logging types: summary entries, status, the [`Log`] trait and scopes.

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct SummaryEntry {
    /// Human-readable item name (usually a profile name).
    pub name: String,
    /// Final status of the item.
    pub status: Status,
    /// Optional detail message (e.g. the steps that failed).
    pub message: Option<String>,
}

/// Final status of a summarised item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every step completed.
    Ok,
    /// Ran in dry-run mode; nothing was changed.
    DryRun,
    /// At least one step failed.
    Failed,
}

/// Abstraction over logging sinks.
///
/// [`Logger`](super::logger::Logger) writes through `tracing` to the console
/// and the log file; [`MemoryLog`](super::memory::MemoryLog) keeps lines in
/// memory for tests.  Engine code only ever sees this trait.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an item result for the summary.
    fn record(&self, name: &str, status: Status, message: Option<&str>);
    /// Increase the indentation of subsequent messages by one level.
    fn indent(&self);
    /// Decrease the indentation of subsequent messages by one level.
    fn unindent(&self);
}

/// RAII guard for an indented log section.
///
/// Logs the heading at `info` level, indents, and unindents on drop so a
/// scope is closed even when the enclosing step returns early.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct LogScope<'a> {
    log: &'a dyn Log,
}

impl<'a> LogScope<'a> {
    /// Open a scope headed by `heading`.
    pub fn enter(log: &'a dyn Log, heading: &str) -> Self {
        log.info(heading);
        log.indent();
        Self { log }
    }
}

impl Drop for LogScope<'_> {
    fn drop(&mut self) {
        self.log.unindent();
    }
}

impl std::fmt::Debug for LogScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogScope").finish_non_exhaustive()
    }
}
