//! # PropAI Storage
//!
//! Read-only loading of the three model artifacts:
//!
//! - `trained_model` - the fitted regressor ([`propai_core::Model`])
//! - `label_encoder` - the location classes ([`propai_core::LocationEncoder`])
//! - `columns` - feature labels in vector order ([`propai_core::FeatureColumns`])
//!
//! Each artifact is `<name>.json` or `<name>.bin` (bincode) inside the model
//! directory. [`ArtifactStore`] caches the outcome for the life of the process.

pub mod error;
pub mod loader;
pub mod store;

pub use error::{LoadError, Result};
pub use loader::{
    ArtifactFormat, ArtifactLoader, ModelArtifacts, COLUMNS_ARTIFACT, ENCODER_ARTIFACT,
    MODEL_ARTIFACT,
};
pub use store::ArtifactStore;
