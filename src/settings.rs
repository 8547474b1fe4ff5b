use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::detector::appimage::AppImageDetector;
use crate::package::Manager;

/// Runtime configuration, resolved once from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Managers to enable; empty means all of them.
    pub managers: Vec<Manager>,
    pub extra_appimage_dirs: Vec<PathBuf>,
    pub elevate: String,
    pub list_timeout: Duration,
    pub remove_timeout: Duration,
    pub color: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            managers: Vec::new(),
            extra_appimage_dirs: Vec::new(),
            elevate: "pkexec".to_string(),
            list_timeout: Duration::from_secs(60),
            remove_timeout: Duration::from_secs(600),
            color: true,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut managers = Vec::new();
        for m in &cli.managers {
            if !managers.contains(m) {
                managers.push(*m);
            }
        }

        Self {
            managers,
            extra_appimage_dirs: cli.appimage_dirs.clone(),
            elevate: cli.elevate.trim().to_string(),
            list_timeout: Duration::from_secs(cli.timeout.max(1)),
            remove_timeout: Duration::from_secs(cli.remove_timeout.max(1)),
            color: !cli.no_color,
            log_file: cli.log_file.clone(),
        }
    }

    /// Conventional AppImage locations followed by user-supplied ones.
    pub fn appimage_roots(&self) -> Vec<PathBuf> {
        let mut roots = AppImageDetector::default_roots();
        for dir in &self.extra_appimage_dirs {
            if !roots.contains(dir) {
                roots.push(dir.clone());
            }
        }
        roots
    }
}
