use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    Apt,
    Pacman,
    Flatpak,
    Snap,
    AppImage,
    Rpm,
}

impl Manager {
    pub const ALL: [Manager; 6] = [
        Manager::Apt,
        Manager::Pacman,
        Manager::Flatpak,
        Manager::Snap,
        Manager::AppImage,
        Manager::Rpm,
    ];
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Manager::Apt => write!(f, "apt"),
            Manager::Pacman => write!(f, "pacman"),
            Manager::Flatpak => write!(f, "flatpak"),
            Manager::Snap => write!(f, "snap"),
            Manager::AppImage => write!(f, "appimage"),
            Manager::Rpm => write!(f, "rpm"),
        }
    }
}

/// One installed package as reported by its owning manager.
///
/// `manager` decides which detector may remove the package. `path` is only
/// set for AppImages, which are identified by their location on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub description: String,
    pub size: String,
    pub manager: Manager,
    pub path: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, manager: Manager) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            description: String::new(),
            size: String::new(),
            manager,
            path: None,
        }
    }

    /// Secondary line shown under the name in the interactive list.
    pub fn summary_line(&self) -> String {
        format!("[{}] {} - {}", self.manager, self.version, self.size)
    }
}

impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.manager.cmp(&other.manager))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
