use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

const SUFFIX: &str = ".appimage";
const MAX_DEPTH: usize = 4;
const UNKNOWN_VERSION: &str = "Unknown";

pub struct AppImageDetector {
    host: Host,
    roots: Vec<PathBuf>,
}

impl AppImageDetector {
    pub fn new(host: Host, roots: Vec<PathBuf>) -> Self {
        Self { host, roots }
    }

    /// Conventional places people keep AppImages.
    pub fn default_roots() -> Vec<PathBuf> {
        let mut roots = Vec::new();

        if let Some(home) = dirs::home_dir() {
            roots.push(home.join("Applications"));
            roots.push(home.join(".local/bin"));
            roots.push(home.join("Downloads"));
            roots.push(home.join("Desktop"));
        }

        roots.push(PathBuf::from("/opt"));
        roots.push(PathBuf::from("/usr/local/bin"));

        roots
    }

    pub fn is_available(&self) -> bool {
        true
    }

    /// Build a record for `path` if it is an executable AppImage.
    fn inspect(path: &Path) -> Option<Package> {
        let filename = path.file_name()?.to_str()?;
        let stem = strip_appimage_suffix(filename)?;

        // Follows symlinks so a link to an AppImage reports the target's size
        let metadata = fs::metadata(path).ok()?;
        if metadata.is_dir() || metadata.permissions().mode() & 0o111 == 0 {
            return None;
        }

        let (name, version) = split_name(stem);
        let dir = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Some(Package {
            name,
            version: version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            description: format!("AppImage at {}", dir),
            size: format!("{:.2} MB", metadata.len() as f64 / (1024.0 * 1024.0)),
            manager: Manager::AppImage,
            path: Some(path.to_string_lossy().into_owned()),
        })
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }

            let entries = WalkDir::new(root)
                .max_depth(MAX_DEPTH)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok);

            for entry in entries {
                if let Some(pkg) = Self::inspect(entry.path()) {
                    // Overlapping roots must not report a file twice
                    if seen.insert(pkg.path.clone()) {
                        packages.push(pkg);
                    }
                }
            }
        }

        Ok(packages)
    }

    /// Delete the AppImage file. Falls back to the elevation helper when the
    /// file sits somewhere the user cannot write, such as `/opt`.
    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        let path = package
            .path
            .as_deref()
            .ok_or_else(|| DetectorError::MissingPath(package.name.clone()))?;

        match fs::remove_file(path) {
            Ok(()) => {
                info!(path, "removed AppImage");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                warn!(path, "permission denied, retrying with elevation");
                self.host.remove(true, "rm", &["-f", "--", path])
            }
            Err(e) => Err(DetectorError::Io(e)),
        }
    }
}

/// `Foo.AppImage` / `foo.appimage` -> `Foo` / `foo`; None for other names.
fn strip_appimage_suffix(filename: &str) -> Option<&str> {
    let cut = filename.len().checked_sub(SUFFIX.len())?;
    let tail = filename.get(cut..)?;
    if tail.eq_ignore_ascii_case(SUFFIX) {
        Some(&filename[..cut])
    } else {
        None
    }
}

/// Split a file stem into a display name and the version embedded in it.
pub fn split_name(stem: &str) -> (String, Option<String>) {
    let without_arch = strip_arch_suffix(stem);
    let (name, version) = match version_cut(without_arch) {
        Some(pos) => {
            let raw = &without_arch[pos + 1..];
            let version = raw
                .strip_prefix('v')
                .or_else(|| raw.strip_prefix('V'))
                .unwrap_or(raw);
            (&without_arch[..pos], Some(version.to_string()))
        }
        None => (without_arch, None),
    };

    let name = name.trim_end_matches(|c: char| c == '-' || c == '_' || c == '.');
    if name.is_empty() {
        (stem.to_string(), None)
    } else {
        (name.to_string(), version)
    }
}

/// Strip architecture suffixes from a name.
fn strip_arch_suffix(name: &str) -> &str {
    let patterns = [
        "-linux-X64",
        "-linux-x64",
        "-linux-x86_64",
        "-linux_x86_64",
        "_linux.x86_64",
        "_linux-x86_64",
        "-linux-amd64",
        "-linux-arm64",
        "-x86_64",
        "-x64",
        "-amd64",
        "-arm64",
        "-aarch64",
        ".x86_64",
        "_x86_64",
    ];

    for pattern in &patterns {
        if let Some(stripped) = name.strip_suffix(pattern) {
            return stripped;
        }
    }

    name
}

/// Leftmost `-`/`_` followed by something version-like.
/// Matches: -1.2.3, _1.2.3, -v1.2.3, _v1.2.3, -v4.6-stable, etc.
fn version_cut(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    let mut cut_pos = None;

    for i in (0..bytes.len()).rev() {
        if (bytes[i] == b'-' || bytes[i] == b'_') && looks_like_version(&name[i + 1..]) {
            cut_pos = Some(i);
        }
        // Keep scanning left: in v4.6-stable the first separator wins
    }

    cut_pos
}

fn looks_like_version(s: &str) -> bool {
    let s = s.strip_prefix('v').or_else(|| s.strip_prefix('V')).unwrap_or(s);
    s.starts_with(|c: char| c.is_ascii_digit())
}
