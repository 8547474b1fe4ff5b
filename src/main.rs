mod cli;
mod detector;
mod engine;
mod error;
mod logging;
mod output;
mod package;
mod settings;
mod tui;

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Command};
use engine::{DetectorStatus, InventoryEngine};
use logging::LogTarget;
use output::Formatter;
use settings::Settings;
use tui::theme::Theme;

const ROOT_WARNING: &str =
    "Warning: Running as root is not recommended. The app will request permissions when needed.";

fn print_doctor(engine: &InventoryEngine) {
    println!("uninn doctor\n");
    println!("Managers:");

    let mut total = 0;
    for (manager, status) in engine.status() {
        match status {
            DetectorStatus::Listed(packages) => {
                let count = packages.len();
                total += count;
                let preview: Vec<&str> = packages
                    .iter()
                    .take(3)
                    .map(|p| p.name.as_str())
                    .collect();
                let preview_str = if preview.is_empty() {
                    String::new()
                } else {
                    format!("   {}", preview.join(", "))
                };
                println!(
                    "  \u{2713} {:<10} {:>5} packages{}",
                    manager, count, preview_str
                );
            }
            DetectorStatus::Failed(e) => {
                println!("  \u{2717} {:<10} error: {}", manager, e);
            }
            DetectorStatus::Unavailable => {
                println!("  \u{2717} {:<10} unavailable", manager);
            }
        }
    }

    println!("\nTotal: {} packages", total);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);

    let interactive = matches!(cli.command, None | Some(Command::Tui));
    logging::init(LogTarget::choose(settings.log_file.as_deref(), interactive))?;

    match cli.command {
        None | Some(Command::Tui) => {
            if matches!(sudo::check(), sudo::RunningAs::Root) {
                println!("{}", ROOT_WARNING);
            }
            let engine = Arc::new(InventoryEngine::from_settings(&settings));
            tui::run(engine, Theme::new(settings.color))?;
        }
        Some(Command::List { format }) => {
            let engine = InventoryEngine::from_settings(&settings);
            let mut packages = engine.load_all();
            packages.sort();
            Formatter::new(format, !settings.color).format_list(&packages, &mut std::io::stdout())?;
        }
        Some(Command::Doctor) => {
            let engine = InventoryEngine::from_settings(&settings);
            print_doctor(&engine);
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "uninn", &mut std::io::stdout());
        }
    }

    Ok(())
}
