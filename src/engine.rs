use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::{debug, warn};

use crate::detector::host::{Host, SystemRunner};
use crate::detector::{DetectorError, Registry};
use crate::error::AppError;
use crate::package::{Manager, Package};
use crate::settings::Settings;

/// How one detector fared during a scan, for `doctor`.
pub enum DetectorStatus {
    Unavailable,
    Listed(Vec<Package>),
    Failed(DetectorError),
}

pub struct InventoryEngine {
    registry: Registry,
}

impl InventoryEngine {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Engine backed by real processes and the filesystem.
    pub fn from_settings(settings: &Settings) -> Self {
        let host = Host::new(
            Arc::new(SystemRunner),
            &settings.elevate,
            settings.list_timeout,
            settings.remove_timeout,
        );
        let registry = Registry::new(&host, &settings.appimage_roots(), &settings.managers);
        Self::new(registry)
    }

    /// Concatenate the packages of every available detector.
    ///
    /// A detector that fails to list is logged and skipped; the scan as a
    /// whole never fails. No deduplication or ordering across managers.
    pub fn load_all(&self) -> Vec<Package> {
        let mut all = Vec::new();

        for detector in self.registry.iter() {
            let manager = detector.manager();
            if !detector.is_available() {
                debug!(%manager, "detector unavailable, skipping");
                continue;
            }
            match detector.list_packages() {
                Ok(packages) => {
                    debug!(%manager, count = packages.len(), "listed packages");
                    all.extend(packages);
                }
                Err(e) => {
                    warn!(%manager, error = %e, "listing failed");
                }
            }
        }

        all
    }

    /// Per-detector outcome of a scan.
    pub fn status(&self) -> Vec<(Manager, DetectorStatus)> {
        self.registry
            .iter()
            .map(|detector| {
                let status = if !detector.is_available() {
                    DetectorStatus::Unavailable
                } else {
                    match detector.list_packages() {
                        Ok(packages) => DetectorStatus::Listed(packages),
                        Err(e) => DetectorStatus::Failed(e),
                    }
                };
                (detector.manager(), status)
            })
            .collect()
    }

    /// Remove `package` through the detector registered for its manager.
    pub fn uninstall(&self, package: &Package) -> Result<(), AppError> {
        let detector = self
            .registry
            .get(package.manager)
            .ok_or(AppError::ManagerDisabled(package.manager))?;

        let wrap = |source| AppError::Uninstall {
            name: package.name.clone(),
            source,
        };

        if !detector.is_available() {
            return Err(wrap(DetectorError::Unavailable(package.manager)));
        }
        detector.uninstall(package).map_err(wrap)
    }
}

/// Indices of `packages` whose name fuzzily matches `query`, best first.
/// An empty query keeps every package in its current order.
pub fn search(query: &str, packages: &[Package]) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..packages.len()).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, usize)> = packages
        .iter()
        .enumerate()
        .filter_map(|(i, pkg)| matcher.fuzzy_match(&pkg.name, query).map(|score| (score, i)))
        .collect();

    // Stable: equal scores keep list order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;
    use crate::detector::host::fake::FakeRunner;

    const DPKG_OUT: &str = "foo\t1.0\tFoo tool\t10\nbar\t2.0\tBar tool\t20\n";

    fn make_pkg(name: &str, manager: Manager) -> Package {
        Package::new(name, manager)
    }

    #[test]
    fn test_load_all_apt_only() {
        let (_, host) = FakeRunner::new()
            .with_program("dpkg-query")
            .respond("dpkg-query", DPKG_OUT)
            .into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[]));

        let packages = engine.load_all();
        assert_eq!(packages.len(), 2);
        assert!(packages.iter().all(|p| p.manager == Manager::Apt));
        assert_eq!(packages[0].name, "foo");
        assert_eq!(packages[0].version, "1.0");
        assert_eq!(packages[1].name, "bar");
        assert_eq!(packages[1].version, "2.0");
    }

    #[test]
    fn test_unavailable_detectors_never_invoked() {
        let (runner, host) = FakeRunner::new()
            .with_program("pacman")
            .respond("pacman -Qi", "Name            : vim\n")
            .into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[]));
        engine.load_all();

        let calls = runner.calls();
        assert_eq!(calls, vec!["pacman -Qi"]);

        let err = engine
            .uninstall(&make_pkg("foo", Manager::Apt))
            .unwrap_err();
        assert!(err.to_string().contains("apt is not available"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_load_all_survives_failing_detectors() {
        let (_, host) = FakeRunner::new()
            .with_program("dpkg-query")
            .with_program("pacman")
            .with_program("snap")
            .with_program("rpm")
            .fail("dpkg-query", "database locked")
            .respond("pacman -Qi", "Name            : vim\nVersion         : 9.1\n")
            .fail("snap list", "cannot communicate with server")
            .respond("rpm -qa", "htop|3.3.0-1|400000|Interactive process viewer\n")
            .into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[]));

        let packages = engine.load_all();
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["vim", "htop"]);
    }

    #[test]
    fn test_load_all_keeps_cross_manager_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("org.gimp.GIMP.AppImage");
        std::fs::write(&file, b"x").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (_, host) = FakeRunner::new()
            .with_program("flatpak")
            .respond("flatpak list", "org.gimp.GIMP\n")
            .respond("flatpak info", "")
            .into_host();
        let roots = vec![dir.path().to_path_buf()];
        let engine = InventoryEngine::new(Registry::new(&host, &roots, &[]));

        let packages = engine.load_all();
        assert_eq!(packages.len(), 2);
        assert!(packages.iter().all(|p| p.name == "org.gimp.GIMP"));
    }

    #[test]
    fn test_uninstall_routes_by_manager() {
        let (runner, host) = FakeRunner::new()
            .with_program("snap")
            .with_program("dpkg-query")
            .respond("pkexec snap remove", "")
            .into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[]));

        engine.uninstall(&make_pkg("spotify", Manager::Snap)).unwrap();
        assert_eq!(runner.calls(), vec!["pkexec snap remove spotify"]);
    }

    #[test]
    fn test_uninstall_failure_is_wrapped() {
        let (_, host) = FakeRunner::new()
            .with_program("dpkg-query")
            .fail("pkexec apt-get", "E: Unable to locate package foo")
            .into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[]));

        let err = engine.uninstall(&make_pkg("foo", Manager::Apt)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("failed to uninstall foo: "));
        assert!(msg.contains("Unable to locate package"));
    }

    #[test]
    fn test_uninstall_disabled_manager() {
        let (_, host) = FakeRunner::new().into_host();
        let engine = InventoryEngine::new(Registry::new(&host, &[], &[Manager::Apt]));
        let err = engine
            .uninstall(&make_pkg("spotify", Manager::Snap))
            .unwrap_err();
        assert!(matches!(err, AppError::ManagerDisabled(Manager::Snap)));
    }

    #[test]
    fn test_status_reports_each_detector() {
        let (_, host) = FakeRunner::new()
            .with_program("dpkg-query")
            .with_program("rpm")
            .respond("dpkg-query", DPKG_OUT)
            .fail("rpm", "rpmdb open failed")
            .into_host();
        let engine = InventoryEngine::new(Registry::new(
            &host,
            &[],
            &[Manager::Apt, Manager::Snap, Manager::Rpm],
        ));

        let status = engine.status();
        assert_eq!(status.len(), 3);
        assert!(matches!(&status[0], (Manager::Apt, DetectorStatus::Listed(p)) if p.len() == 2));
        assert!(matches!(&status[1], (Manager::Snap, DetectorStatus::Unavailable)));
        assert!(matches!(&status[2], (Manager::Rpm, DetectorStatus::Failed(_))));
    }

    #[test]
    fn test_search_empty_query_keeps_order() {
        let packages = vec![make_pkg("b", Manager::Apt), make_pkg("a", Manager::Apt)];
        assert_eq!(search("", &packages), vec![0, 1]);
        assert_eq!(search("   ", &packages), vec![0, 1]);
    }

    #[test]
    fn test_search_fuzzy() {
        let packages = vec![
            make_pkg("gimp", Manager::Apt),
            make_pkg("firefox", Manager::Snap),
            make_pkg("thunderbird", Manager::Apt),
        ];
        let results = search("fire", &packages);
        assert_eq!(results.first(), Some(&1));
        assert!(!results.contains(&0));
    }

    #[test]
    fn test_search_no_match() {
        let packages = vec![make_pkg("gimp", Manager::Apt)];
        assert!(search("zzzz", &packages).is_empty());
    }
}
