use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use super::domain::JobListing;
use crate::config::ListingsConfig;
use crate::envelope::GatewayError;

const READ_FAILED: &str = "Failed to retrieve jobs data";

/// Source of the current listing snapshot.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn all(&self) -> Result<Arc<Vec<JobListing>>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing dataset missing at {}", path.display())]
    Missing { path: PathBuf },
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("listing dataset read timed out")]
    Timeout,
}

impl From<RepositoryError> for GatewayError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Missing { .. } => GatewayError::DataNotFound,
            other => GatewayError::server(READ_FAILED, other),
        }
    }
}

/// Reads the scraper's JSON array from disk, optionally keeping the first good read.
#[derive(Debug)]
pub struct FileListingRepository {
    path: PathBuf,
    cache: Option<OnceCell<Arc<Vec<JobListing>>>>,
    read_timeout: std::time::Duration,
}

impl FileListingRepository {
    pub fn new(config: &ListingsConfig) -> Self {
        Self {
            path: config.data_path.clone(),
            cache: config.cache.then(OnceCell::new),
            read_timeout: config.read_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Arc<Vec<JobListing>>, RepositoryError> {
        let read = tokio::fs::read(&self.path);
        let bytes = match tokio::time::timeout(self.read_timeout, read).await {
            Err(_) => return Err(RepositoryError::Timeout),
            Ok(Err(source)) if source.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::Missing {
                    path: self.path.clone(),
                })
            }
            Ok(Err(source)) => {
                return Err(RepositoryError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
            Ok(Ok(bytes)) => bytes,
        };

        let listings: Vec<JobListing> =
            serde_json::from_slice(&bytes).map_err(|source| RepositoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), count = listings.len(), "listing dataset loaded");
        Ok(Arc::new(listings))
    }
}

#[async_trait]
impl ListingRepository for FileListingRepository {
    async fn all(&self) -> Result<Arc<Vec<JobListing>>, RepositoryError> {
        match &self.cache {
            Some(cell) => cell.get_or_try_init(|| self.load()).await.cloned(),
            None => self.load().await,
        }
    }
}

/// Fixed collection, for fixtures and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingRepository {
    listings: Arc<Vec<JobListing>>,
}

impl InMemoryListingRepository {
    pub fn new(listings: Vec<JobListing>) -> Self {
        Self {
            listings: Arc::new(listings),
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn all(&self) -> Result<Arc<Vec<JobListing>>, RepositoryError> {
        Ok(self.listings.clone())
    }
}
