use std::path::{Path, PathBuf};

use propai_core::{
    FeatureColumns, LocationEncoder, Model, Predictor, QueryBounds, Regressor,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{LoadError, Result};

pub const MODEL_ARTIFACT: &str = "trained_model";
pub const ENCODER_ARTIFACT: &str = "label_encoder";
pub const COLUMNS_ARTIFACT: &str = "columns";

/// Encoding of an artifact file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    /// Lookup order when several encodings of one artifact exist
    pub const ALL: [ArtifactFormat; 2] = [ArtifactFormat::Json, ArtifactFormat::Bincode];

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Bincode => "bin",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ArtifactFormat::Json),
            "bin" => Some(ArtifactFormat::Bincode),
            _ => None,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> std::result::Result<T, String> {
        match self {
            ArtifactFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            ArtifactFormat::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        }
    }
}

/// The three artifacts, checked against each other
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    regressor: Model,
    encoder: LocationEncoder,
    columns: FeatureColumns,
}

impl ModelArtifacts {
    pub fn new(regressor: Model, encoder: LocationEncoder, columns: FeatureColumns) -> Result<Self> {
        regressor.validate()?;
        if columns.len() != regressor.n_features() {
            return Err(LoadError::Inconsistent(format!(
                "{} feature columns for a regressor with {} features",
                columns.len(),
                regressor.n_features()
            )));
        }
        if encoder.is_empty() {
            return Err(LoadError::Inconsistent("location encoder has no classes".to_string()));
        }

        Ok(Self {
            regressor,
            encoder,
            columns,
        })
    }

    #[inline]
    #[must_use]
    pub fn regressor(&self) -> &Model {
        &self.regressor
    }

    #[inline]
    #[must_use]
    pub fn encoder(&self) -> &LocationEncoder {
        &self.encoder
    }

    #[inline]
    #[must_use]
    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }

    pub fn predictor(&self, bounds: QueryBounds) -> Predictor<'_, Model> {
        Predictor::new(&self.regressor, &self.encoder, &self.columns, bounds)
    }
}

/// Reads model artifacts from a directory
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    model_dir: PathBuf,
}

impl ArtifactLoader {
    pub fn new<P: AsRef<Path>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Find the file for an artifact; JSON wins over bincode
    pub fn locate(&self, name: &'static str) -> Result<(PathBuf, ArtifactFormat)> {
        ArtifactFormat::ALL
            .iter()
            .map(|format| {
                (
                    self.model_dir.join(format!("{}.{}", name, format.extension())),
                    *format,
                )
            })
            .find(|(path, _)| path.is_file())
            .ok_or_else(|| LoadError::Missing {
                name,
                dir: self.model_dir.clone(),
            })
    }

    pub fn read<T: DeserializeOwned>(&self, name: &'static str) -> Result<T> {
        let (path, format) = self.locate(name)?;
        debug!("Reading artifact {:?} as {:?}", path, format);

        let bytes = std::fs::read(&path).map_err(|e| LoadError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        format
            .decode(&bytes)
            .map_err(|message| LoadError::Corrupt { path, message })
    }

    /// Load and cross-check all three artifacts
    pub fn load(&self) -> Result<ModelArtifacts> {
        let regressor: Model = self.read(MODEL_ARTIFACT)?;
        let encoder: LocationEncoder = self.read(ENCODER_ARTIFACT)?;
        let columns: Vec<String> = self.read(COLUMNS_ARTIFACT)?;
        let columns = FeatureColumns::new(columns)?;

        let artifacts = ModelArtifacts::new(regressor, encoder, columns)?;
        info!(
            "Loaded {} model from {:?}: {} locations, {} features",
            artifacts.regressor().kind(),
            self.model_dir,
            artifacts.encoder().len(),
            artifacts.columns().len()
        );
        Ok(artifacts)
    }
}
