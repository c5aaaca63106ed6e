//! Tool configuration, profile settings files, and persisted login state.
pub mod settings_file;
pub mod state;
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Installed-profiles directory used when none is configured.
pub const DEFAULT_INSTALLED_PROFILES: &str = "/usr/local/share/installed-profiles";

const APP_DIR: &str = "login-profiles";

/// Raw `config.toml` contents; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    login_script_folder: Option<String>,
    installed_profiles_folder: Option<String>,
    state_file: Option<String>,
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Config file to read instead of the XDG default.
    pub config: Option<PathBuf>,
    /// Profiles root.
    pub profiles_dir: Option<PathBuf>,
    /// Installed-profiles directory.
    pub installed_dir: Option<PathBuf>,
    /// Login state file.
    pub state_file: Option<PathBuf>,
    /// Home directory.
    pub home: Option<PathBuf>,
}

/// Environment lookups used to resolve default paths.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    /// `HOME`.
    pub home: Option<PathBuf>,
    /// `XDG_CONFIG_HOME`.
    pub xdg_config_home: Option<PathBuf>,
    /// `XDG_STATE_HOME`.
    pub xdg_state_home: Option<PathBuf>,
}

impl Environment {
    /// Read `HOME`, `XDG_CONFIG_HOME` and `XDG_STATE_HOME`.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            home: var("HOME"),
            xdg_config_home: var("XDG_CONFIG_HOME"),
            xdg_state_home: var("XDG_STATE_HOME"),
        }
    }
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root holding one directory per profile.
    pub login_script_folder: PathBuf,
    /// Directory whose entries name the installed profiles.
    pub installed_profiles_folder: PathBuf,
    /// Login state JSON file.
    pub state_file: PathBuf,
    /// Home directory dotfiles and scripts operate in.
    pub home: PathBuf,
}

impl Config {
    /// Resolve configuration from the config file, command-line overrides
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined, the config
    /// file cannot be read or parsed, or no profiles root is configured.
    pub fn load(overrides: &Overrides, env: &Environment) -> Result<Self, ConfigError> {
        let home = overrides
            .home
            .clone()
            .or_else(|| env.home.clone())
            .ok_or(ConfigError::NoHome)?;

        let config_path = overrides
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&home, env));
        let file: ConfigFile = toml_loader::load_config(&config_path)?;

        let login_script_folder = overrides
            .profiles_dir
            .clone()
            .or_else(|| file.login_script_folder.as_deref().map(|p| expand_tilde(p, &home)))
            .ok_or_else(|| ConfigError::MissingSetting("login_script_folder".to_string()))?;
        // Scripts run with the home directory as their working directory.
        let login_script_folder = std::path::absolute(&login_script_folder).map_err(|source| {
            ConfigError::Unresolvable {
                path: login_script_folder.clone(),
                source,
            }
        })?;

        let installed_profiles_folder = overrides
            .installed_dir
            .clone()
            .or_else(|| {
                file.installed_profiles_folder
                    .as_deref()
                    .map(|p| expand_tilde(p, &home))
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALLED_PROFILES));

        let state_file = overrides
            .state_file
            .clone()
            .or_else(|| file.state_file.as_deref().map(|p| expand_tilde(p, &home)))
            .unwrap_or_else(|| default_state_path(&home, env));

        Ok(Self {
            login_script_folder,
            installed_profiles_folder,
            state_file,
            home,
        })
    }
}

/// `$XDG_CONFIG_HOME/login-profiles/config.toml`, falling back to `~/.config`.
#[must_use]
pub fn default_config_path(home: &Path, env: &Environment) -> PathBuf {
    env.xdg_config_home
        .clone()
        .unwrap_or_else(|| home.join(".config"))
        .join(APP_DIR)
        .join("config.toml")
}

/// `$XDG_STATE_HOME/login-profiles/state.json`, falling back to `~/.local/state`.
#[must_use]
pub fn default_state_path(home: &Path, env: &Environment) -> PathBuf {
    env.xdg_state_home
        .clone()
        .unwrap_or_else(|| home.join(".local").join("state"))
        .join(APP_DIR)
        .join("state.json")
}

/// Expand a leading `~` to `home`.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
