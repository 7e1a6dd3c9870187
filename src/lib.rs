//! # PropAI
//!
//! A property valuation dashboard over a pre-trained regression model.
//!
//! PropAI loads three artifacts once at startup (a fitted regressor, a
//! location encoder and the feature column names) and serves price
//! estimates for `{location, total_sqft, bhk, bath}` queries.
//!
//! Each valuation includes:
//! - **Point estimate** in Lakhs, with a fixed ±10% market range
//! - **Price per sqft** in rupees
//! - **Sensitivity grid**: re-predictions with bhk/bath moved by one step
//! - **Feature importance** ranking, when the model provides it
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install propai
//! propai --model-dir ./models --http-port 8501
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use propai::prelude::*;
//!
//! let artifacts = ArtifactLoader::new("./models").load().unwrap();
//! let predictor = artifacts.predictor(QueryBounds::default());
//!
//! let result = predictor
//!     .predict(&PropertyQuery::new("Whitefield", 1000.0, 2, 2))
//!     .unwrap();
//! println!("{:.2} Lakhs ({:.0} / sqft)", result.point_estimate, result.price_per_sqft);
//! ```
//!
//! ## Crate Structure
//!
//! - [`propai-core`](https://docs.rs/propai-core) - Queries, location encoding, regressors, prediction
//! - [`propai-storage`](https://docs.rs/propai-storage) - Artifact loading and process-lifetime cache
//! - [`propai-api`](https://docs.rs/propai-api) - Dashboard, chart adapter and JSON API

// Re-export core types
pub use propai_core::{
    FeatureColumns, FeatureImportance, FeatureVector, LocationEncoder, LocationResolution,
    Model, PredictionResult, Predictor, PropertyQuery, QueryBounds, Regressor,
    SensitivityPoint, Error, Result,
};

// Re-export storage
pub use propai_storage::{ArtifactLoader, ArtifactStore, LoadError, ModelArtifacts};

// Re-export API
pub use propai_api::{AppContext, DashboardConfig, RestApi, Valuation};

use std::sync::Arc;
use tracing::{info, Level};

/// Map a `--log-level` value to a tracing level; unknown names fall back to `INFO`
pub fn parse_log_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Serve the dashboard until Ctrl-C or until the HTTP server stops.
///
/// A server that cannot start, e.g. because the port is taken, is an error.
pub async fn serve(ctx: Arc<AppContext>, bind: &str, port: u16) -> anyhow::Result<()> {
    let http_handle = RestApi::spawn(ctx, bind.to_string(), port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined? {
                Ok(Ok(())) => {
                    info!("HTTP server stopped");
                    Ok(())
                }
                Ok(Err(e)) => Err(anyhow::Error::new(e)
                    .context(format!("HTTP server failed on {}:{}", bind, port))),
                Err(_) => Err(anyhow::anyhow!("HTTP server thread panicked")),
            }
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FeatureColumns, LocationEncoder, Model, PredictionResult, Predictor, PropertyQuery,
        QueryBounds, Regressor, Error, Result,
        ArtifactLoader, ArtifactStore, LoadError, ModelArtifacts,
        AppContext, DashboardConfig, RestApi, Valuation,
        serve,
    };
}
