//! Prediction service
//!
//! Turns a [`PropertyQuery`] into a [`PredictionResult`]: one inference for
//! the point estimate, up to nine more for the bhk/bath sensitivity grid,
//! plus the importance ranking when the regressor exposes one.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    FeatureColumns, FeatureVector, LocationEncoder, LocationResolution, PropertyQuery,
    QueryBounds, Regressor, Result,
};

/// Lower edge of the display band around the point estimate
pub const BAND_LOW_FACTOR: f64 = 0.9;

/// Upper edge of the display band around the point estimate
pub const BAND_HIGH_FACTOR: f64 = 1.1;

/// Rupees per Lakh; estimates are in Lakhs, per-sqft prices in rupees
pub const RUPEES_PER_LAKH: f64 = 100_000.0;

/// Room counts the sensitivity grid never leaves, whatever the input bounds
pub const GRID_MIN_ROOMS: u32 = 1;
pub const GRID_MAX_ROOMS: u32 = 10;

/// One cell of the sensitivity grid
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SensitivityPoint {
    pub bhk: u32,
    pub bath: u32,
    pub price: f64,
}

/// A feature label with its importance, in percent
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionResult {
    pub query: PropertyQuery,
    pub location: LocationResolution,
    pub point_estimate: f64,
    pub low_estimate: f64,
    pub high_estimate: f64,
    pub price_per_sqft: f64,
    pub sensitivity_grid: Vec<SensitivityPoint>,
    pub importance_ranking: Option<Vec<FeatureImportance>>,
}

impl PredictionResult {
    /// Whether the location was unknown and a fallback code was used
    #[inline]
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.location.is_fallback()
    }
}

pub struct Predictor<'a, R: Regressor + ?Sized> {
    regressor: &'a R,
    encoder: &'a LocationEncoder,
    columns: &'a FeatureColumns,
    bounds: QueryBounds,
}

impl<'a, R: Regressor + ?Sized> Predictor<'a, R> {
    pub fn new(
        regressor: &'a R,
        encoder: &'a LocationEncoder,
        columns: &'a FeatureColumns,
        bounds: QueryBounds,
    ) -> Self {
        Self {
            regressor,
            encoder,
            columns,
            bounds,
        }
    }

    #[inline]
    #[must_use]
    pub fn bounds(&self) -> &QueryBounds {
        &self.bounds
    }

    pub fn predict(&self, query: &PropertyQuery) -> Result<PredictionResult> {
        query.validate(&self.bounds)?;

        let location = self.encoder.resolve(&query.location);
        if location.is_fallback() {
            warn!(
                location = %query.location,
                code = location.code(),
                "Location not found in training data, using fallback code"
            );
        }

        let features = FeatureVector::new(location.code(), query.total_sqft, query.bath, query.bhk);
        let point_estimate = self.regressor.infer(&features)?;
        let sensitivity_grid = self.sensitivity_grid(&features, query.bhk, query.bath)?;

        debug!(
            model = self.regressor.kind(),
            estimate = point_estimate,
            grid_cells = sensitivity_grid.len(),
            "Prediction complete"
        );

        Ok(PredictionResult {
            query: query.clone(),
            location,
            point_estimate,
            low_estimate: point_estimate * BAND_LOW_FACTOR,
            high_estimate: point_estimate * BAND_HIGH_FACTOR,
            price_per_sqft: point_estimate * RUPEES_PER_LAKH / query.total_sqft,
            sensitivity_grid,
            importance_ranking: self.importance_ranking(),
        })
    }

    /// Re-predict with bhk and bath each moved by at most one step.
    ///
    /// Cells are ordered bhk-major. Any failed inference fails the whole grid.
    pub fn sensitivity_grid(
        &self,
        base: &FeatureVector,
        bhk: u32,
        bath: u32,
    ) -> Result<Vec<SensitivityPoint>> {
        let bhk_axis = self.neighbourhood(bhk);
        let bath_axis = self.neighbourhood(bath);

        let cells: Vec<(u32, u32)> = bhk_axis
            .iter()
            .flat_map(|&b| bath_axis.iter().map(move |&ba| (b, ba)))
            .collect();

        cells
            .into_par_iter()
            .map(|(b, ba)| {
                let price = self.regressor.infer(&base.with_rooms(b, ba))?;
                Ok(SensitivityPoint { bhk: b, bath: ba, price })
            })
            .collect()
    }

    /// Feature labels paired with importance percentages, highest first
    pub fn importance_ranking(&self) -> Option<Vec<FeatureImportance>> {
        let importances = self.regressor.importances()?;
        let mut ranking: Vec<FeatureImportance> = self
            .columns
            .iter()
            .zip(importances)
            .map(|(feature, weight)| FeatureImportance {
                feature: feature.to_string(),
                weight: weight * 100.0,
            })
            .collect();
        ranking.sort_by_key(|f| Reverse(OrderedFloat(f.weight)));
        Some(ranking)
    }

    /// `value ± 1`, kept inside both the fixed grid range and the query bounds
    fn neighbourhood(&self, value: u32) -> SmallVec<[u32; 3]> {
        let lo = value
            .saturating_sub(1)
            .max(GRID_MIN_ROOMS)
            .max(self.bounds.min_rooms);
        let hi = value
            .saturating_add(1)
            .min(GRID_MAX_ROOMS)
            .min(self.bounds.max_rooms);
        (lo..=hi).collect()
    }
}
