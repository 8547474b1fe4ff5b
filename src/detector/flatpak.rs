use rayon::prelude::*;

use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

const FALLBACK_DESCRIPTION: &str = "Flatpak application";

/// Fields recovered from `flatpak info <id>`. Any of them may be missing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FlatpakDetails {
    pub version: String,
    pub size: String,
    pub summary: Option<String>,
}

pub struct FlatpakDetector {
    host: Host,
}

impl FlatpakDetector {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    pub fn is_available(&self) -> bool {
        self.host.has("flatpak")
    }

    /// Application IDs from `flatpak list --app --columns=application`.
    pub fn parse_flatpak_list(output: &str) -> Vec<String> {
        output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            // Header row, printed when stdout is a terminal
            .filter(|id| *id != "Application")
            .map(str::to_string)
            .collect()
    }

    pub fn parse_flatpak_info(output: &str) -> FlatpakDetails {
        let mut details = FlatpakDetails::default();

        // Newer flatpak prints "<Name> - <summary>" above the labelled fields
        if let Some(title) = output.lines().map(str::trim).find(|l| !l.is_empty()) {
            if title.contains(" - ") || !title.contains(':') {
                let summary = title
                    .split_once(" - ")
                    .map(|(_, s)| s.trim())
                    .unwrap_or(title);
                if !summary.is_empty() {
                    details.summary = Some(summary.to_string());
                }
            }
        }

        for line in output.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            match label.trim() {
                "Version" => details.version = value.trim().to_string(),
                "Installed" | "Installed size" => details.size = value.trim().to_string(),
                _ => {}
            }
        }

        details
    }

    fn describe(&self, app_id: &str) -> Package {
        let details = self
            .host
            .query_lenient("flatpak", &["info", app_id])
            .map(|out| Self::parse_flatpak_info(&out))
            .unwrap_or_default();

        Package {
            name: app_id.to_string(),
            version: details.version,
            description: details
                .summary
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            size: details.size,
            manager: Manager::Flatpak,
            path: None,
        }
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let stdout = self
            .host
            .query("flatpak", &["list", "--app", "--columns=application"])?;
        let ids = Self::parse_flatpak_list(&stdout);
        Ok(ids.par_iter().map(|id| self.describe(id)).collect())
    }

    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        // flatpak asks polkit itself for system installations
        self.host
            .remove(false, "flatpak", &["uninstall", "-y", package.name.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::host::fake::FakeRunner;

    const INFO_FIXTURE: &str = include_str!("../../tests/fixtures/flatpak_info.txt");

    #[test]
    fn test_parse_flatpak_list() {
        let output = "org.mozilla.firefox\norg.gimp.GIMP\n\n";
        assert_eq!(
            FlatpakDetector::parse_flatpak_list(output),
            vec!["org.mozilla.firefox", "org.gimp.GIMP"]
        );
    }

    #[test]
    fn test_parse_flatpak_list_skips_header() {
        let output = "Application ID\norg.videolan.VLC\n";
        assert_eq!(
            FlatpakDetector::parse_flatpak_list(output),
            vec!["org.videolan.VLC"]
        );
    }

    #[test]
    fn test_parse_flatpak_info_fixture() {
        let details = FlatpakDetector::parse_flatpak_info(INFO_FIXTURE);
        assert_eq!(details.version, "131.0.3");
        assert_eq!(details.size, "251.3 MB");
        assert_eq!(
            details.summary.as_deref(),
            Some("Fast, Private & Safe Web Browser")
        );
    }

    #[test]
    fn test_parse_flatpak_info_legacy_labels() {
        let output = "Ref: app/com.example.App/x86_64/stable\nID: com.example.App\nVersion: 2.1\nInstalled size: 12.0 MB\n";
        let details = FlatpakDetector::parse_flatpak_info(output);
        assert_eq!(details.version, "2.1");
        assert_eq!(details.size, "12.0 MB");
        assert!(details.summary.is_none());
    }

    #[test]
    fn test_parse_flatpak_info_missing_fields() {
        let details = FlatpakDetector::parse_flatpak_info("");
        assert_eq!(details, FlatpakDetails::default());
    }

    #[test]
    fn test_list_packages_tolerates_failed_detail_lookup() {
        let (runner, host) = FakeRunner::new()
            .with_program("flatpak")
            .respond("flatpak list", "org.mozilla.firefox\ncom.broken.App\n")
            .respond("flatpak info org.mozilla.firefox", INFO_FIXTURE)
            .fail("flatpak info com.broken.App", "error: not installed")
            .into_host();
        let detector = FlatpakDetector::new(host);
        let packages = detector.list_packages().unwrap();

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "org.mozilla.firefox");
        assert_eq!(packages[0].version, "131.0.3");
        assert_eq!(packages[1].name, "com.broken.App");
        assert_eq!(packages[1].version, "");
        assert_eq!(packages[1].size, "");
        assert_eq!(packages[1].description, FALLBACK_DESCRIPTION);
        assert_eq!(runner.calls_starting_with("flatpak info"), 2);
    }

    #[test]
    fn test_uninstall_without_elevation() {
        let (runner, host) = FakeRunner::new()
            .respond("flatpak uninstall", "")
            .into_host();
        FlatpakDetector::new(host)
            .uninstall(&Package::new("org.gimp.GIMP", Manager::Flatpak))
            .unwrap();
        assert_eq!(runner.calls(), vec!["flatpak uninstall -y org.gimp.GIMP"]);
    }
}
