use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

const QUERY_FORMAT: &str = "-f=${Package}\\t${Version}\\t${binary:Summary}\\t${Installed-Size}\\n";

pub struct AptDetector {
    host: Host,
}

impl AptDetector {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    pub fn is_available(&self) -> bool {
        self.host.has("dpkg-query")
    }

    /// Parse `dpkg-query` output: name, version, summary and installed size (KiB)
    /// separated by tabs, one package per line.
    pub fn parse_dpkg_output(output: &str) -> Vec<Package> {
        let mut packages = Vec::new();
        for line in output.lines() {
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 4 {
                continue;
            }
            let name = parts[0].trim();
            if name.is_empty() {
                continue;
            }
            let size = parts[3].trim();
            packages.push(Package {
                name: name.to_string(),
                version: parts[1].trim().to_string(),
                description: parts[2].trim().to_string(),
                size: if size.is_empty() {
                    String::new()
                } else {
                    format!("{} KB", size)
                },
                manager: Manager::Apt,
                path: None,
            });
        }
        packages
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let stdout = self.host.query("dpkg-query", &["-W", QUERY_FORMAT])?;
        Ok(Self::parse_dpkg_output(&stdout))
    }

    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        self.host
            .remove(true, "apt-get", &["remove", "-y", package.name.as_str()])
    }
}
