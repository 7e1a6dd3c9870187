use std::sync::{Arc, OnceLock};

use tracing::error;

use crate::error::Result;
use crate::loader::{ArtifactLoader, ModelArtifacts};

/// Process-lifetime cache around an [`ArtifactLoader`].
///
/// The first [`get`](Self::get) reads from disk; every later call returns the
/// same outcome, success or failure. There is no reload.
pub struct ArtifactStore {
    loader: ArtifactLoader,
    cell: OnceLock<Result<Arc<ModelArtifacts>>>,
}

impl ArtifactStore {
    pub fn new(loader: ArtifactLoader) -> Self {
        Self {
            loader,
            cell: OnceLock::new(),
        }
    }

    /// Store that is already initialised, bypassing the disk
    pub fn preloaded(loader: ArtifactLoader, outcome: Result<ModelArtifacts>) -> Self {
        Self {
            loader,
            cell: OnceLock::from(outcome.map(Arc::new)),
        }
    }

    pub fn get(&self) -> Result<Arc<ModelArtifacts>> {
        self.cell
            .get_or_init(|| {
                let outcome = self.loader.load().map(Arc::new);
                if let Err(e) = &outcome {
                    error!(kind = e.kind(), "Model artifacts unavailable: {}", e);
                }
                outcome
            })
            .clone()
    }

    /// Whether the one-time load has happened yet
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Whether artifacts loaded successfully; triggers the load if needed
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.get().is_ok()
    }

    #[inline]
    #[must_use]
    pub fn loader(&self) -> &ArtifactLoader {
        &self.loader
    }
}
