//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the dotfiles merge-and-link tool.
#[derive(Parser, Debug)]
#[command(
    name = "dtm",
    about = "Overlay shared and profile dotfile trees into a target directory",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the rules file location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link the shared and profile trees into the target directory
    Install(InstallOpts),
    /// Remove everything the last install created
    Clean,
    /// Print version information
    Version,
    /// Generate a shell completion script
    Completions(CompletionsOpts),
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Profile to overlay on the shared tree
    pub profile: String,

    /// Directory holding the profile trees (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Directory to install into (defaults to the home directory)
    #[arg(short, long, value_name = "DIR")]
    pub target: Option<PathBuf>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Clean => "clean",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
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
    fn parse_install_with_profile() {
        let cli = Cli::parse_from(["dtm", "install", "work"]);
        assert!(
            matches!(&cli.command, Command::Install(_)),
            "Expected Install command"
        );
        if let Command::Install(opts) = cli.command {
            assert_eq!(opts.profile, "work");
            assert_eq!(opts.source, None);
            assert_eq!(opts.target, None);
        }
    }

    #[test]
    fn parse_install_requires_profile() {
        assert!(Cli::try_parse_from(["dtm", "install"]).is_err());
    }

    #[test]
    fn parse_install_source_and_target() {
        let cli = Cli::parse_from([
            "dtm", "install", "work", "-s", "/dots", "--target", "/tmp/home",
        ]);
        assert!(
            matches!(&cli.command, Command::Install(_)),
            "Expected Install command"
        );
        if let Command::Install(opts) = cli.command {
            assert_eq!(opts.source, Some(PathBuf::from("/dots")));
            assert_eq!(opts.target, Some(PathBuf::from("/tmp/home")));
        }
    }

    #[test]
    fn parse_dry_run() {
        let cli = Cli::parse_from(["dtm", "--dry-run", "clean"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_dry_run_short_after_subcommand() {
        let cli = Cli::parse_from(["dtm", "install", "work", "-d"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_clean() {
        let cli = Cli::parse_from(["dtm", "clean"]);
        assert!(matches!(cli.command, Command::Clean));
        assert!(!cli.global.dry_run);
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dtm", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dtm", "-v", "clean"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_override() {
        let cli = Cli::parse_from(["dtm", "--config", "/tmp/dtm.toml", "clean"]);
        assert_eq!(cli.global.config, Some(PathBuf::from("/tmp/dtm.toml")));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["dtm", "completions", "bash"]);
        assert!(
            matches!(
                cli.command,
                Command::Completions(CompletionsOpts {
                    shell: clap_complete::Shell::Bash
                })
            ),
            "Expected bash completions"
        );
    }

    #[test]
    fn log_names_follow_subcommands() {
        assert_eq!(Cli::parse_from(["dtm", "clean"]).command.log_name(), "clean");
        assert_eq!(
            Cli::parse_from(["dtm", "install", "work"]).command.log_name(),
            "install"
        );
    }
}
