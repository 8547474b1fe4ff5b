use crate::detector::host::Host;
use crate::detector::DetectorError;
use crate::package::{Manager, Package};

pub struct PacmanDetector {
    host: Host,
}

impl PacmanDetector {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    pub fn is_available(&self) -> bool {
        self.host.has("pacman")
    }

    /// Parse `pacman -Qi` blocks. Labels are padded to a fixed width before
    /// the colon; indented lines continue the previous field and are ignored.
    pub fn parse_pacman_info(output: &str) -> Vec<Package> {
        let mut packages = Vec::new();
        let mut current: Option<Package> = None;

        for line in output.lines() {
            if line.starts_with(char::is_whitespace) {
                continue;
            }
            let Some((label, value)) = line.split_once(" : ") else {
                continue;
            };
            let value = value.trim().to_string();

            match label.trim_end() {
                "Name" => {
                    // A new block starts: flush the previous one
                    if let Some(pkg) = current.take() {
                        packages.push(pkg);
                    }
                    if !value.is_empty() {
                        current = Some(Package::new(value, Manager::Pacman));
                    }
                }
                "Version" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.version = value;
                    }
                }
                "Description" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.description = value;
                    }
                }
                "Installed Size" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.size = value;
                    }
                }
                _ => {}
            }
        }

        if let Some(pkg) = current {
            packages.push(pkg);
        }

        packages
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, DetectorError> {
        let stdout = self.host.query("pacman", &["-Qi"])?;
        Ok(Self::parse_pacman_info(&stdout))
    }

    pub fn uninstall(&self, package: &Package) -> Result<(), DetectorError> {
        self.host
            .remove(true, "pacman", &["-R", "--noconfirm", package.name.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::host::fake::FakeRunner;

    const FIXTURE: &str = include_str!("../../tests/fixtures/pacman_qi.txt");

    #[test]
    fn test_parse_pacman_info_fixture() {
        let packages = PacmanDetector::parse_pacman_info(FIXTURE);
        assert_eq!(packages.len(), 3);

        assert_eq!(packages[0].name, "bash");
        assert_eq!(packages[0].version, "5.2.026-2");
        assert_eq!(packages[0].description, "The GNU Bourne Again shell");
        assert_eq!(packages[0].size, "9.41 MiB");
        assert_eq!(packages[0].manager, Manager::Pacman);

        assert_eq!(packages[1].name, "vim");
        assert_eq!(packages[1].size, "4.76 MiB");

        assert_eq!(packages[2].name, "orphan-meta");
        assert_eq!(packages[2].description, "");
        assert_eq!(packages[2].size, "");
    }

    #[test]
    fn test_parse_pacman_info_empty() {
        assert!(PacmanDetector::parse_pacman_info("").is_empty());
    }

    #[test]
    fn test_parse_pacman_info_fields_before_name_ignored() {
        let output = "Version         : 1.0\nName            : vim\nDescription     : Vi Improved\n";
        let packages = PacmanDetector::parse_pacman_info(output);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "vim");
        assert_eq!(packages[0].version, "");
        assert_eq!(packages[0].description, "Vi Improved");
    }

    #[test]
    fn test_parse_pacman_info_value_with_colon() {
        let output = "Name            : qt6-base\nDescription     : A cross-platform toolkit : core\n";
        let packages = PacmanDetector::parse_pacman_info(output);
        assert_eq!(packages[0].description, "A cross-platform toolkit : core");
    }

    #[test]
    fn test_list_and_uninstall() {
        let (runner, host) = FakeRunner::new()
            .with_program("pacman")
            .respond("pacman -Qi", FIXTURE)
            .respond("pkexec pacman -R", "")
            .into_host();
        let detector = PacmanDetector::new(host);
        let packages = detector.list_packages().unwrap();
        detector.uninstall(&packages[1]).unwrap();
        assert_eq!(
            runner.calls(),
            vec!["pacman -Qi", "pkexec pacman -R --noconfirm vim"]
        );
    }
}
