use chrono::{DateTime, Utc};
use propai_core::{LocationResolution, PredictionResult, PropertyQuery, FALLBACK_LOCATION};
use propai_storage::ModelArtifacts;
use serde::Serialize;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::chart::{importance_rows, ImportanceRow, SensitivityChart, ValuationDisplay};
use crate::config::DashboardConfig;

/// A prediction together with everything needed to display it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Valuation {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub result: PredictionResult,
    pub display: ValuationDisplay,
    pub sensitivity: SensitivityChart,
    pub importance: Option<Vec<ImportanceRow>>,
    /// Non-blocking notice, set when the location was not recognised
    pub warning: Option<String>,
}

impl Valuation {
    pub fn compute(
        artifacts: &ModelArtifacts,
        config: &DashboardConfig,
        query: &PropertyQuery,
    ) -> propai_core::Result<Self> {
        let id = Uuid::new_v4();
        let span = info_span!("valuation", %id);
        let _guard = span.enter();

        let result = artifacts.predictor(config.bounds).predict(query)?;
        info!(
            location = %query.location,
            code = result.location.code(),
            estimate = result.point_estimate,
            "Valuation generated"
        );

        Ok(Self {
            id,
            generated_at: Utc::now(),
            display: ValuationDisplay::from_result(&result),
            sensitivity: SensitivityChart::from_grid(&result.sensitivity_grid, &config.palette),
            importance: result.importance_ranking.as_deref().map(importance_rows),
            warning: location_warning(&result.location),
            result,
        })
    }
}

pub fn location_warning(location: &LocationResolution) -> Option<String> {
    match location {
        LocationResolution::Known(_) => None,
        LocationResolution::Fallback(_) => Some(format!(
            "Location not found in training data. Using '{}'.",
            FALLBACK_LOCATION
        )),
        LocationResolution::Unmapped => Some(format!(
            "Location not found in training data and no '{}' class exists. Using location code {}.",
            FALLBACK_LOCATION,
            location.code()
        )),
    }
}
