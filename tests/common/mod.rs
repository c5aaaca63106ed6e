// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed login environment (profiles root,
// installed-profiles directory, home directory and state file) and a fluent
// builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use login_profiles::config::Config;
use login_profiles::config::state::{LoginState, StateStore};
use login_profiles::exec::SystemExecutor;
use login_profiles::logging::{Log, MemoryLog};
use login_profiles::login::Collaborators;
use login_profiles::profiles::DirectoryRegistry;
use login_profiles::resources::dotfiles::MergeCopySync;
use login_profiles::resources::script::SystemScriptRunner;
use login_profiles::resources::settings::MemoryBackend;

/// An isolated login environment backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `profiles/<name>/...`  profile artifacts
/// - `installed/<name>`     one empty file per installed profile
/// - `home/`                target of dotfiles and script working directory
/// - `state.json`           login state
pub struct LoginFixture {
    pub root: tempfile::TempDir,
}

impl LoginFixture {
    /// Create the empty directory layout.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        for dir in ["profiles", "installed", "home"] {
            std::fs::create_dir_all(root.path().join(dir)).expect("create fixture dir");
        }
        Self { root }
    }

    pub fn profiles_root(&self) -> PathBuf {
        self.root.path().join("profiles")
    }

    pub fn installed_dir(&self) -> PathBuf {
        self.root.path().join("installed")
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.path().join("state.json")
    }

    /// Mark `name` as installed.
    pub fn install(self, name: &str) -> Self {
        std::fs::write(self.installed_dir().join(name), "").expect("write installed marker");
        self
    }

    /// Write `content` to `profiles/<profile>/<rel>`, creating parents.
    pub fn file(self, profile: &str, rel: &str, content: &str) -> Self {
        let path = self.profiles_root().join(profile).join(rel);
        write_with_parents(&path, content);
        self
    }

    /// Write `content` to `home/<rel>`, creating parents.
    pub fn home_file(self, rel: &str, content: &str) -> Self {
        write_with_parents(&self.home().join(rel), content);
        self
    }

    /// Write an executable shell script `profiles/<profile>/<name>`.
    #[cfg(unix)]
    pub fn script(self, profile: &str, name: &str, body: &str) -> Self {
        use std::os::unix::fs::PermissionsExt as _;
        let path = self.profiles_root().join(profile).join(name);
        write_with_parents(&path, &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        self
    }

    /// Configuration pointing at this fixture.
    pub fn config(&self) -> Config {
        Config {
            login_script_folder: self.profiles_root(),
            installed_profiles_folder: self.installed_dir(),
            state_file: self.state_file(),
            home: self.home(),
        }
    }

    /// Real registry, dotfile sync and scripts; in-memory settings backends.
    pub fn collaborators(&self, dconf: &Arc<MemoryBackend>, log: &Arc<dyn Log>) -> Collaborators {
        let dconf = Arc::clone(dconf);
        Collaborators {
            registry: Arc::new(DirectoryRegistry::new(self.installed_dir())),
            dconf,
            gconf: Arc::new(MemoryBackend::legacy()),
            dotfiles: Arc::new(MergeCopySync),
            scripts: Arc::new(SystemScriptRunner::new(
                Arc::new(SystemExecutor),
                Arc::clone(log),
            )),
        }
    }

    /// Persisted login state.
    pub fn state(&self) -> LoginState {
        StateStore::new(self.state_file())
            .load()
            .expect("load login state")
    }

    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home().join(rel)).expect("read home file")
    }
}

/// A fresh in-memory log, as the trait object the engine expects.
pub fn memory_log() -> (Arc<MemoryLog>, Arc<dyn Log>) {
    let log = Arc::new(MemoryLog::new());
    let dynamic = Arc::clone(&log) as Arc<dyn Log>;
    (log, dynamic)
}

fn write_with_parents(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write fixture file");
}
