//! Merge-copy of a profile's `dotfiles/` tree into the home directory.
//!
//! Every immediate child `f` of the source directory lands at `~/.f`.
//! Directories are merged entry by entry, missing ones are created first,
//! and regular files overwrite.  Symlinks are followed.  A path that cannot
//! be copied is reported and its siblings are still copied; nothing at the
//! destination is ever deleted.
use std::path::Path;

use super::error::SyncError;
use crate::logging::Log;

/// Outcome of one sync.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Regular files written.
    pub files_copied: usize,
    /// Directory trees copied because the destination was missing.
    pub trees_copied: usize,
    /// Per-path failures, in the order they happened.
    pub errors: Vec<SyncError>,
}

impl SyncReport {
    /// `true` if no path failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Copies a profile's dotfiles into a home directory.
pub trait DotfileSync: Send + Sync {
    /// Sync `source` into `home`.
    ///
    /// Never fails as a whole: per-path problems are logged and collected
    /// in the returned report.
    fn sync(&self, source: &Path, home: &Path, dry_run: bool, log: &dyn Log) -> SyncReport;
}

/// Recursive merge-copy that follows symlinks when classifying sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeCopySync;

impl DotfileSync for MergeCopySync {
    fn sync(&self, source: &Path, home: &Path, dry_run: bool, log: &dyn Log) -> SyncReport {
        let mut report = SyncReport::default();
        let children = match sorted_children(source) {
            Ok(children) => children,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
            Err(e) => {
                record(&mut report, log, io_error(source, home, e.to_string()));
                return report;
            }
        };

        log.debug(&format!("Syncing dotfiles from {}", source.display()));
        for name in children {
            let mut dotted = std::ffi::OsString::from(".");
            dotted.push(&name);
            merge_copy(
                &source.join(&name),
                &home.join(dotted),
                false,
                dry_run,
                log,
                &mut report,
            );
        }
        report
    }
}

fn sorted_children(dir: &Path) -> std::io::Result<Vec<std::ffi::OsString>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

fn record(report: &mut SyncReport, log: &dyn Log, error: SyncError) {
    log.error(&error.to_string());
    report.errors.push(error);
}

fn io_error(src: &Path, dest: &Path, message: String) -> SyncError {
    SyncError::Io {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        message,
    }
}

/// Copy `src` onto `dest`, recording failures per path and carrying on.
///
/// `inside_new_tree` is set once a missing destination directory has been
/// created above this point, so only the topmost new directory counts as a
/// copied tree.
fn merge_copy(
    src: &Path,
    dest: &Path,
    inside_new_tree: bool,
    dry_run: bool,
    log: &dyn Log,
    report: &mut SyncReport,
) {
    if src.is_dir() {
        let created = !dest.exists();
        if created {
            if dry_run {
                log.dry_run(&format!("would copy {} -> {}", src.display(), dest.display()));
                report.trees_copied += 1;
                return;
            }
            if let Err(e) = std::fs::create_dir_all(dest) {
                record(report, log, io_error(src, dest, e.to_string()));
                return;
            }
            if !inside_new_tree {
                log.debug(&format!("copying {} -> {}", src.display(), dest.display()));
                report.trees_copied += 1;
            }
        }
        match sorted_children(src) {
            Ok(children) => {
                for name in children {
                    merge_copy(
                        &src.join(&name),
                        &dest.join(&name),
                        inside_new_tree || created,
                        dry_run,
                        log,
                        report,
                    );
                }
            }
            Err(e) => record(report, log, io_error(src, dest, e.to_string())),
        }
    } else if src.is_file() {
        if dry_run {
            log.dry_run(&format!("would copy {} -> {}", src.display(), dest.display()));
            report.files_copied += 1;
            return;
        }
        match std::fs::copy(src, dest) {
            Ok(_) => {
                log.debug(&format!("copied {} -> {}", src.display(), dest.display()));
                report.files_copied += 1;
            }
            Err(e) => record(report, log, io_error(src, dest, e.to_string())),
        }
    } else {
        record(
            report,
            log,
            SyncError::Unclassified {
                src: src.to_path_buf(),
                dest: dest.to_path_buf(),
            },
        );
    }
}
