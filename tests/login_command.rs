#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `login` command.
//!
//! These tests run the full login sequence over a temporary profiles root
//! with the real registry, dotfile merge-copy, scripts and state store, and
//! in-memory settings backends.

mod common;

use std::sync::Arc;

use common::{LoginFixture, memory_log};
use login_profiles::commands::login::execute;
use login_profiles::config::settings_file::SettingValue;
use login_profiles::error::LoginError;
use login_profiles::logging::Status;
use login_profiles::resources::settings::MemoryBackend;

fn gsettings() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::hierarchical(["org.example"]))
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn applies_profiles_in_sorted_order() {
    let fixture = LoginFixture::new()
        .install("workstation")
        .install("base")
        .file("base", "dconf", r#"{"org.example.setting": true}"#)
        .file("workstation", "dotfiles/bashrc", "export X=1");
    let dconf = gsettings();
    let (log, sink) = memory_log();

    let report = execute(
        &fixture.config(),
        fixture.collaborators(&dconf, &sink),
        false,
        &sink,
    )
    .unwrap();

    let names: Vec<&str> = report.profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["base", "workstation"]);
    assert!(report.is_success());
    assert_eq!(
        dconf.get("org.example.setting"),
        Some(SettingValue::Bool(true))
    );
    assert_eq!(fixture.read_home(".bashrc"), "export X=1");

    let headings: Vec<String> = log
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("Running login scripts in"))
        .collect();
    assert_eq!(headings.len(), 2);
    assert!(headings[0].contains("base"));
    assert!(headings[1].contains("workstation"));

    let summary = log.summary();
    assert!(summary.iter().all(|e| e.status == Status::Ok));
}

#[test]
fn dotfiles_merge_into_existing_home_directories() {
    let fixture = LoginFixture::new()
        .install("base")
        .file("base", "dotfiles/config/a", "from profile")
        .file("base", "dotfiles/config/b", "new b")
        .home_file(".config/b", "old b")
        .home_file(".config/c", "user c");
    let (_log, sink) = memory_log();

    execute(
        &fixture.config(),
        fixture.collaborators(&gsettings(), &sink),
        false,
        &sink,
    )
    .unwrap();

    assert_eq!(fixture.read_home(".config/a"), "from profile");
    assert_eq!(fixture.read_home(".config/b"), "new b");
    assert_eq!(fixture.read_home(".config/c"), "user c");
}

#[test]
fn unknown_schema_only_skips_its_entry() {
    let fixture = LoginFixture::new().install("base").file(
        "base",
        "dconf",
        r#"{"org.example.kept": "yes", "org.absent.dropped": 1}"#,
    );
    let dconf = gsettings();
    let (log, sink) = memory_log();

    let report = execute(
        &fixture.config(),
        fixture.collaborators(&dconf, &sink),
        false,
        &sink,
    )
    .unwrap();

    assert!(report.is_success());
    assert!(dconf.get("org.example.kept").is_some());
    assert!(dconf.get("org.absent.dropped").is_none());
    assert!(log.contains("GSettings schema not found: org.absent (trying to set: dropped)"));
}

// ---------------------------------------------------------------------------
// Profile-change trigger across runs
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn profile_change_fires_once_per_installed_set_change() {
    let fixture = LoginFixture::new()
        .install("base")
        .install("workstation")
        .script("base", "profile-change", "echo base >> changes.log")
        .script("workstation", "profile-change", "echo workstation >> changes.log");
    let dconf = gsettings();

    let run = |fixture: &LoginFixture| {
        let (_log, sink) = memory_log();
        execute(
            &fixture.config(),
            fixture.collaborators(&dconf, &sink),
            false,
            &sink,
        )
        .unwrap()
    };

    let first = run(&fixture);
    assert_eq!(first.triggered_by(), Some("base"));
    assert_eq!(fixture.read_home("changes.log"), "base\n");
    assert_eq!(fixture.state().last_logged_in_os_hash, "base|workstation");

    let second = run(&fixture);
    assert_eq!(second.triggered_by(), None);
    assert_eq!(fixture.read_home("changes.log"), "base\n");

    let fixture = fixture.install("laptop");
    let third = run(&fixture);
    assert_eq!(third.triggered_by(), Some("base"));
    assert_eq!(fixture.read_home("changes.log"), "base\nbase\n");
    assert_eq!(
        fixture.state().last_logged_in_os_hash,
        "base|laptop|workstation"
    );
}

// ---------------------------------------------------------------------------
// Dry run and fatal errors
// ---------------------------------------------------------------------------

#[test]
fn dry_run_changes_nothing() {
    let fixture = LoginFixture::new()
        .install("base")
        .file("base", "dconf", r#"{"org.example.setting": 3}"#)
        .file("base", "dotfiles/bashrc", "export X=1");
    let dconf = gsettings();
    let (log, sink) = memory_log();

    execute(
        &fixture.config(),
        fixture.collaborators(&dconf, &sink),
        true,
        &sink,
    )
    .unwrap();

    assert_eq!(dconf.write_count(), 0);
    assert!(!fixture.home().join(".bashrc").exists());
    assert!(!fixture.state_file().exists());
    assert!(log.contains("would record profile-set hash 'base'"));
}

#[test]
fn missing_profiles_root_aborts_the_run() {
    let fixture = LoginFixture::new().install("base");
    std::fs::remove_dir_all(fixture.profiles_root()).unwrap();
    let (_log, sink) = memory_log();

    let err = execute(
        &fixture.config(),
        fixture.collaborators(&gsettings(), &sink),
        false,
        &sink,
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LoginError>(),
        Some(LoginError::ProfileRoot { .. })
    ));
    assert!(!fixture.state_file().exists());
}

#[test]
fn failing_step_is_reported_but_later_profiles_run() {
    let fixture = LoginFixture::new()
        .install("base")
        .install("workstation")
        .file("base", "gconf", r#"{"/apps/x": null}"#)
        .file("workstation", "dotfiles/profile", "export Y=2");
    let (log, sink) = memory_log();

    let report = execute(
        &fixture.config(),
        fixture.collaborators(&gsettings(), &sink),
        false,
        &sink,
    )
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed().next().map(|p| p.name.as_str()), Some("base"));
    assert_eq!(fixture.read_home(".profile"), "export Y=2");
    assert_eq!(log.summary()[0].status, Status::Failed);
}
