//! Read-only view of an open datasource, for diagnostic tooling.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::name::DatasourceName;
use crate::time::Timestamp;

/// One currently open datasource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDatasource {
    pub name: DatasourceName,
    /// Absolute path of the backing storage file.
    pub location: PathBuf,
    pub opened_at: Timestamp,
}
