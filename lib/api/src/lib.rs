//! # PropAI API
//!
//! HTTP surface for PropAI: a server-rendered dashboard plus a JSON API.
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /` | Dashboard (`?page=valuation` or `?page=insights`) |
//! | `POST /predict` | Form submission from the dashboard |
//! | `GET /api/health` | Liveness and artifact status |
//! | `GET /api/locations` | Known locations, sorted |
//! | `POST /api/predict` | JSON valuation |
//! | `GET /api/insights` | Model card and feature importance |
//!
//! When the model artifacts failed to load, the dashboard shows a blocking
//! error instead of the input form and every API route answers `503`.

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod rest;
pub mod state;
pub mod valuation;

pub use chart::{ImportanceRow, SensitivityChart, SensitivitySeries, ValuationDisplay};
pub use config::{ConfigError, DashboardConfig, FormDefaults, ModelCard};
pub use rest::{AppContext, RestApi};
pub use state::{DashboardState, Page, ViewState};
pub use valuation::Valuation;
