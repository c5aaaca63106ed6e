//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

/// Top-level CLI entry point for the login profile engine.
#[derive(Parser, Debug)]
#[command(
    name = "custom-login",
    about = "Apply login profiles: desktop settings, dotfiles and scripts",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Config file (default: $XDG_CONFIG_HOME/login-profiles/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the profiles root directory
    #[arg(long, global = true)]
    pub profiles_dir: Option<PathBuf>,

    /// Override the installed-profiles directory
    #[arg(long, global = true)]
    pub installed_dir: Option<PathBuf>,

    /// Override the login state file
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Override the home directory
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

impl GlobalOpts {
    /// Command-line values that take precedence over the config file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            profiles_dir: self.profiles_dir.clone(),
            installed_dir: self.installed_dir.clone(),
            state_file: self.state_file.clone(),
            home: self.home.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply every installed profile
    Login,
    /// Show installed profiles and whether the profile-change trigger is pending
    Status,
    /// Print version information
    Version,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_login() {
        let cli = Cli::parse_from(["custom-login", "login"]);
        assert!(matches!(cli.command, Command::Login));
        assert!(!cli.global.dry_run);
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["custom-login", "-d", "login"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_dry_run_after_subcommand() {
        let cli = Cli::parse_from(["custom-login", "login", "--dry-run"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_status() {
        let cli = Cli::parse_from(["custom-login", "status"]);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["custom-login", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["custom-login", "-v", "login"]);
        assert!(cli.verbose);
    }

    #[test]
    fn path_overrides_reach_config_overrides() {
        let cli = Cli::parse_from([
            "custom-login",
            "--profiles-dir",
            "/p",
            "--installed-dir",
            "/i",
            "--state-file",
            "/s.json",
            "--home",
            "/h",
            "--config",
            "/c.toml",
            "status",
        ]);
        let overrides = cli.global.overrides();
        assert_eq!(overrides.profiles_dir, Some(PathBuf::from("/p")));
        assert_eq!(overrides.installed_dir, Some(PathBuf::from("/i")));
        assert_eq!(overrides.state_file, Some(PathBuf::from("/s.json")));
        assert_eq!(overrides.home, Some(PathBuf::from("/h")));
        assert_eq!(overrides.config, Some(PathBuf::from("/c.toml")));
    }
}
