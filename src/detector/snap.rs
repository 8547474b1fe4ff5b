use rayon::prelude::*;

use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SnapDetails {
    pub summary: String,
    pub size: String,
}

pub struct SnapDetector {
    host: Host,
}

impl SnapDetector {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    pub fn is_available(&self) -> bool {
        self.host.has("snap")
    }

    /// `(name, version)` rows from `snap list`.
    pub fn parse_snap_list(output: &str) -> Vec<(String, String)> {
        let mut snaps = Vec::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                continue;
            }
            // Skip header
            if parts[0] == "Name" && parts[1] == "Version" {
                continue;
            }
            snaps.push((parts[0].to_string(), parts[1].to_string()));
        }

        snaps
    }

    pub fn parse_snap_info(output: &str) -> SnapDetails {
        let mut details = SnapDetails::default();

        for line in output.lines() {
            if let Some(summary) = line.strip_prefix("summary:") {
                details.summary = summary.trim().to_string();
            } else if let Some(rest) = line.trim_start().strip_prefix("installed:") {
                if let Some(size) = installed_size(rest) {
                    details.size = size;
                }
            }
        }

        details
    }

    fn describe(&self, name: &str, version: &str) -> Package {
        let details = self
            .host
            .query_lenient("snap", &["info", name])
            .map(|out| Self::parse_snap_info(&out))
            .unwrap_or_default();

        Package {
            name: name.to_string(),
            version: version.to_string(),
            description: details.summary,
            size: details.size,
            manager: Manager::Snap,
            path: None,
        }
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let stdout = self.host.query("snap", &["list"])?;
        let snaps = Self::parse_snap_list(&stdout);
        Ok(snaps
            .par_iter()
            .map(|(name, version)| self.describe(name, version))
            .collect())
    }

    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        self.host
            .remove(true, "snap", &["remove", package.name.as_str()])
    }
}

/// Size from the tail of an `installed:` line, `<version> (<rev>) <size> <notes>`.
/// Falls back to the parenthesised value when no size token follows it.
fn installed_size(rest: &str) -> Option<String> {
    let open = rest.find('(')?;
    let close = open + rest[open..].find(')')?;
    let inner = rest[open + 1..close].trim();

    let after = rest[close + 1..].split_whitespace().next();
    match after {
        Some(token) if looks_like_size(token) => Some(token.to_string()),
        _ if !inner.is_empty() => Some(inner.to_string()),
        _ => None,
    }
}

fn looks_like_size(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit()) && token.ends_with('B')
}
