use std::fs;
use std::path::PathBuf;

use solver_game::{CatalogError, CatalogLoader, ScenarioCatalog};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogSourceError {
    #[error("failed to read catalog {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {path} is invalid")]
    Invalid {
        path: String,
        #[source]
        source: CatalogError,
    },
    #[error("bundled catalog is invalid")]
    Bundled(#[from] CatalogError),
}

/// Where the harness reads scenarios from: the asset compiled into
/// `solver-game`, or a JSON file in the same layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl CatalogSource {
    #[must_use]
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Bundled, Self::File)
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled catalog".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl CatalogLoader for CatalogSource {
    type Error = CatalogSourceError;

    fn load_catalog(&self) -> Result<ScenarioCatalog, Self::Error> {
        match self {
            Self::Bundled => Ok(ScenarioCatalog::load_from_static()?),
            Self::File(path) => {
                let json = fs::read_to_string(path).map_err(|source| CatalogSourceError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                log::debug!("read {} bytes of catalog from {}", json.len(), path.display());
                ScenarioCatalog::from_json(&json).map_err(|source| CatalogSourceError::Invalid {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}
