use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

const QUERY_FORMAT: &str = "%{NAME}|%{VERSION}-%{RELEASE}|%{SIZE}|%{SUMMARY}\\n";

pub struct RpmDetector {
    host: Host,
}

impl RpmDetector {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    pub fn is_available(&self) -> bool {
        self.host.has("rpm")
    }

    /// Parse `name|version-release|size|summary` lines. The summary may itself
    /// contain `|`.
    pub fn parse_rpm_output(output: &str) -> Vec<Package> {
        let mut packages = Vec::new();
        for line in output.lines() {
            let parts: Vec<&str> = line.splitn(4, '|').collect();
            if parts.len() < 4 {
                continue;
            }
            let name = parts[0].trim();
            if name.is_empty() {
                continue;
            }
            packages.push(Package {
                name: name.to_string(),
                version: parts[1].trim().to_string(),
                description: parts[3].trim().to_string(),
                size: format_size(parts[2].trim().parse().unwrap_or(0)),
                manager: Manager::Rpm,
                path: None,
            });
        }
        packages
    }

    /// Front end to use for removal: dnf, then yum, then plain rpm.
    fn removal_command(&self) -> (&'static str, Vec<&'static str>) {
        if self.host.has("dnf") {
            ("dnf", vec!["remove", "-y"])
        } else if self.host.has("yum") {
            ("yum", vec!["remove", "-y"])
        } else {
            ("rpm", vec!["-e"])
        }
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let stdout = self
            .host
            .query("rpm", &["-qa", "--queryformat", QUERY_FORMAT])?;
        Ok(Self::parse_rpm_output(&stdout))
    }

    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        let (program, base) = self.removal_command();
        let mut args: Vec<&str> = base;
        args.push(package.name.as_str());
        self.host.remove(true, program, &args)
    }
}

/// Render a byte count with binary scaling: `512 B`, `1.0 KB`, `3.4 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT && exp < UNITS.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}", bytes as f64 / div as f64, UNITS[exp])
}
