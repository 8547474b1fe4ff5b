use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;
use crate::package::Manager;

/// Parse a manager name into a Manager.
fn parse_manager(s: &str) -> Result<Manager, String> {
    match s.to_lowercase().as_str() {
        "apt" => Ok(Manager::Apt),
        "pacman" => Ok(Manager::Pacman),
        "flatpak" => Ok(Manager::Flatpak),
        "snap" => Ok(Manager::Snap),
        "appimage" => Ok(Manager::AppImage),
        "rpm" => Ok(Manager::Rpm),
        _ => Err(format!(
            "invalid manager '{}': expected apt, pacman, flatpak, snap, appimage, or rpm",
            s
        )),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "uninn",
    version,
    about = "Find installed packages across Linux package managers and uninstall them"
)]
pub struct Cli {
    /// Only use these package managers (repeatable)
    #[arg(short, long = "manager", value_parser = parse_manager, global = true)]
    pub managers: Vec<Manager>,

    /// Extra directory to scan for AppImages (repeatable)
    #[arg(long = "appimage-dir", value_name = "DIR", global = true)]
    pub appimage_dirs: Vec<PathBuf>,

    /// Command that elevates privileges for removals
    #[arg(long, env = "UNINN_ELEVATE", default_value = "pkexec", global = true)]
    pub elevate: String,

    /// Timeout for listing commands, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 60, global = true)]
    pub timeout: u64,

    /// Timeout for removal commands, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600, global = true)]
    pub remove_timeout: u64,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append logs to this file (the interactive view logs nowhere else)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse installed packages and uninstall one (default)
    Tui,

    /// Print every installed package
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show which package managers are available and what they report
    Doctor,

    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::Tsv,
            OutputFormat::Names,
        ]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            OutputFormat::Table => Some(clap::builder::PossibleValue::new("table")),
            OutputFormat::Json => Some(clap::builder::PossibleValue::new("json")),
            OutputFormat::Tsv => Some(clap::builder::PossibleValue::new("tsv")),
            OutputFormat::Names => Some(clap::builder::PossibleValue::new("names")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_manager() {
        assert_eq!(parse_manager("APT"), Ok(Manager::Apt));
        assert_eq!(parse_manager("appimage"), Ok(Manager::AppImage));
        assert!(parse_manager("brew").is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["uninn"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.managers.is_empty());
        assert_eq!(cli.timeout, 60);
        assert_eq!(cli.remove_timeout, 600);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uninn", "list", "--format", "json", "-m", "snap", "--manager", "rpm",
        ])
        .unwrap();
        assert_eq!(cli.managers, vec![Manager::Snap, Manager::Rpm]);
        assert!(matches!(
            cli.command,
            Some(Command::List {
                format: OutputFormat::Json
            })
        ));
    }
}
