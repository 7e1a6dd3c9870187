//! Chart-ready reshaping of prediction results
//!
//! Pure reshaping: numbers pass through unrounded, only the `display`
//! strings are formatted.

use propai_core::{FeatureImportance, PredictionResult, SensitivityPoint};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Sensitivity grid pivoted for a multi-series line chart.
///
/// `bhk` is the x axis; each series holds one bath count, with one price
/// per `bhk` entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensitivityChart {
    pub bhk: Vec<u32>,
    pub series: Vec<SensitivitySeries>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensitivitySeries {
    pub bath: u32,
    pub color: String,
    pub prices: Vec<Option<f64>>,
}

impl SensitivityChart {
    pub fn from_grid(grid: &[SensitivityPoint], palette: &[String]) -> Self {
        let bhk: Vec<u32> = grid
            .iter()
            .map(|p| p.bhk)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let baths: BTreeSet<u32> = grid.iter().map(|p| p.bath).collect();
        let cells: BTreeMap<(u32, u32), f64> =
            grid.iter().map(|p| ((p.bhk, p.bath), p.price)).collect();

        let mut colors = palette.iter().cycle();
        let series = baths
            .into_iter()
            .map(|bath| SensitivitySeries {
                bath,
                color: colors.next().cloned().unwrap_or_default(),
                prices: bhk.iter().map(|b| cells.get(&(*b, bath)).copied()).collect(),
            })
            .collect();

        Self { bhk, series }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bhk.is_empty()
    }

    pub fn price_at(&self, bhk: u32, bath: u32) -> Option<f64> {
        let row = self.bhk.iter().position(|b| *b == bhk)?;
        self.series
            .iter()
            .find(|s| s.bath == bath)
            .and_then(|s| s.prices.get(row).copied().flatten())
    }
}

/// One bar of the feature-importance chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportanceRow {
    pub feature: String,
    pub label: String,
    pub weight: f64,
    pub display: String,
}

/// Ranking rows in the order given (already sorted by the predictor)
pub fn importance_rows(ranking: &[FeatureImportance]) -> Vec<ImportanceRow> {
    ranking
        .iter()
        .map(|f| ImportanceRow {
            feature: f.feature.clone(),
            label: pretty_label(&f.feature),
            weight: f.weight,
            display: format_percent(f.weight),
        })
        .collect()
}

/// Formatted headline values for the result card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuationDisplay {
    pub estimate: String,
    pub band: String,
    pub price_per_sqft: String,
}

impl ValuationDisplay {
    pub fn from_result(result: &PredictionResult) -> Self {
        Self {
            estimate: format_lakhs(result.point_estimate),
            band: format_band(result.low_estimate, result.high_estimate),
            price_per_sqft: format_per_sqft(result.price_per_sqft),
        }
    }
}

/// `52.3391` -> `₹ 52.34 Lakhs`
pub fn format_lakhs(value: f64) -> String {
    format!("₹ {:.2} Lakhs", value)
}

/// `(47.1, 57.57)` -> `₹ 47.10L – ₹ 57.57L`
pub fn format_band(low: f64, high: f64) -> String {
    format!("₹ {:.2}L – ₹ {:.2}L", low, high)
}

/// `5234.4` -> `₹ 5,234 / sqft`
pub fn format_per_sqft(rupees: f64) -> String {
    format!("₹ {} / sqft", group_thousands(rupees))
}

/// `41.27` -> `41.3%`
pub fn format_percent(weight: f64) -> String {
    format!("{:.1}%", weight)
}

/// `total_sqft` -> `Total Sqft`
pub fn pretty_label(feature: &str) -> String {
    feature
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Round to whole units and insert `,` every three digits
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        // inf / NaN
        return rounded;
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{}{}", sign, out)
}
