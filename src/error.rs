use thiserror::Error;

use crate::detector::DetectorError;
use crate::package::Manager;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to uninstall {name}: {source}")]
    Uninstall {
        name: String,
        #[source]
        source: DetectorError,
    },

    #[error("no package selected")]
    NoSelection,

    #[error("{0} support is disabled for this session")]
    ManagerDisabled(Manager),
}
