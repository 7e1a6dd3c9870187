//! # PropAI Core
//!
//! Core library for the PropAI valuation dashboard.
//!
//! This crate provides the data model and the prediction service:
//!
//! - [`PropertyQuery`] - A valuation request with its input bounds
//! - [`LocationEncoder`] - Location name to model code, with an `"other"` fallback
//! - [`FeatureVector`] / [`FeatureColumns`] - Fixed-order model input and its labels
//! - [`Regressor`] / [`Model`] - Fitted price models (random forest, linear)
//! - [`Predictor`] - Point estimate, ±10% band, price per sqft, sensitivity grid
//!   and feature-importance ranking
//!
//! ## Example
//!
//! ```rust
//! use propai_core::{
//!     FeatureColumns, LinearRegressor, LocationEncoder, Predictor, PropertyQuery, QueryBounds,
//! };
//!
//! let model = LinearRegressor {
//!     n_features: 4,
//!     intercept: 10.0,
//!     weights: vec![0.0, 0.05, 2.0, 4.0],
//! };
//! let encoder = LocationEncoder::new(vec!["Whitefield".into(), "other".into()]).unwrap();
//! let columns = FeatureColumns::default();
//!
//! let predictor = Predictor::new(&model, &encoder, &columns, QueryBounds::default());
//! let result = predictor
//!     .predict(&PropertyQuery::new("Whitefield", 1000.0, 2, 2))
//!     .unwrap();
//! assert_eq!(result.sensitivity_grid.len(), 9);
//! ```

pub mod encoder;
pub mod error;
pub mod features;
pub mod forest;
pub mod model;
pub mod predictor;
pub mod query;

pub use encoder::{
    EncoderData, LocationEncoder, LocationResolution, DEFAULT_LOCATION_CODE, FALLBACK_LOCATION,
};
pub use error::{Error, Result};
pub use features::{
    FeatureColumns, FeatureVector, BATH_INDEX, BHK_INDEX, FEATURE_COUNT, LOCATION_INDEX,
    TOTAL_SQFT_INDEX,
};
pub use forest::{DecisionTree, ForestRegressor};
pub use model::{LinearRegressor, Model, Regressor};
pub use predictor::{
    FeatureImportance, PredictionResult, Predictor, SensitivityPoint, BAND_HIGH_FACTOR,
    BAND_LOW_FACTOR, GRID_MAX_ROOMS, GRID_MIN_ROOMS, RUPEES_PER_LAKH,
};
pub use query::{PropertyQuery, QueryBounds};
