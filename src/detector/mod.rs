pub mod appimage;
pub mod apt;
pub mod flatpak;
pub mod host;
pub mod pacman;
pub mod rpm;
pub mod snap;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::package::{Manager, Package};
use appimage::AppImageDetector;
use apt::AptDetector;
use flatpak::FlatpakDetector;
use host::{CommandOutput, Host};
use pacman::PacmanDetector;
use rpm::RpmDetector;
use snap::SnapDetector;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("{0} is not available on this system")]
    Unavailable(Manager),
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` failed with {status}{detail}")]
    CommandFailed {
        program: String,
        status: String,
        detail: String,
    },
    #[error("`{program}` timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
    #[error("AppImage '{0}' has no recorded path")]
    MissingPath(String),
    #[error("a {found} package cannot be removed by the {expected} detector")]
    ManagerMismatch { expected: Manager, found: Manager },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectorError {
    pub(crate) fn failed(program: &str, output: &CommandOutput) -> Self {
        let status = match output.code {
            Some(code) => format!("exit status {}", code),
            None => "a signal".to_string(),
        };
        let combined = output.combined();
        let detail = if combined.is_empty() {
            String::new()
        } else {
            format!("\nOutput: {}", combined)
        };
        DetectorError::CommandFailed {
            program: program.to_string(),
            status,
            detail,
        }
    }
}

/// One backend per supported manager, dispatched by variant.
pub enum Detector {
    Apt(AptDetector),
    Pacman(PacmanDetector),
    Flatpak(FlatpakDetector),
    Snap(SnapDetector),
    AppImage(AppImageDetector),
    Rpm(RpmDetector),
}

impl Detector {
    pub fn for_manager(manager: Manager, host: &Host, appimage_roots: &[PathBuf]) -> Self {
        match manager {
            Manager::Apt => Detector::Apt(AptDetector::new(host.clone())),
            Manager::Pacman => Detector::Pacman(PacmanDetector::new(host.clone())),
            Manager::Flatpak => Detector::Flatpak(FlatpakDetector::new(host.clone())),
            Manager::Snap => Detector::Snap(SnapDetector::new(host.clone())),
            Manager::AppImage => {
                Detector::AppImage(AppImageDetector::new(host.clone(), appimage_roots.to_vec()))
            }
            Manager::Rpm => Detector::Rpm(RpmDetector::new(host.clone())),
        }
    }

    pub fn manager(&self) -> Manager {
        match self {
            Detector::Apt(_) => Manager::Apt,
            Detector::Pacman(_) => Manager::Pacman,
            Detector::Flatpak(_) => Manager::Flatpak,
            Detector::Snap(_) => Manager::Snap,
            Detector::AppImage(_) => Manager::AppImage,
            Detector::Rpm(_) => Manager::Rpm,
        }
    }

    /// Cheap probe for the backing tool. Never fails.
    pub fn is_available(&self) -> bool {
        match self {
            Detector::Apt(d) => d.is_available(),
            Detector::Pacman(d) => d.is_available(),
            Detector::Flatpak(d) => d.is_available(),
            Detector::Snap(d) => d.is_available(),
            Detector::AppImage(d) => d.is_available(),
            Detector::Rpm(d) => d.is_available(),
        }
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        match self {
            Detector::Apt(d) => d.list_packages(),
            Detector::Pacman(d) => d.list_packages(),
            Detector::Flatpak(d) => d.list_packages(),
            Detector::Snap(d) => d.list_packages(),
            Detector::AppImage(d) => d.list_packages(),
            Detector::Rpm(d) => d.list_packages(),
        }
    }

    /// Remove `package`. Records owned by another manager are rejected.
    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        if package.manager != self.manager() {
            return Err(DetectorError::ManagerMismatch {
                expected: self.manager(),
                found: package.manager,
            });
        }
        match self {
            Detector::Apt(d) => d.uninstall(package),
            Detector::Pacman(d) => d.uninstall(package),
            Detector::Flatpak(d) => d.uninstall(package),
            Detector::Snap(d) => d.uninstall(package),
            Detector::AppImage(d) => d.uninstall(package),
            Detector::Rpm(d) => d.uninstall(package),
        }
    }
}

/// Dispatch table from manager to detector, fixed once built.
pub struct Registry {
    detectors: BTreeMap<Manager, Detector>,
}

impl Registry {
    /// Build detectors for `managers`, or for every manager when empty.
    pub fn new(host: &Host, appimage_roots: &[PathBuf], managers: &[Manager]) -> Self {
        let enabled: &[Manager] = if managers.is_empty() {
            &Manager::ALL
        } else {
            managers
        };
        let detectors = enabled
            .iter()
            .map(|&m| (m, Detector::for_manager(m, host, appimage_roots)))
            .collect();
        Self { detectors }
    }

    pub fn get(&self, manager: Manager) -> Option<&Detector> {
        self.detectors.get(&manager)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detector> {
        self.detectors.values()
    }
}
