//! Explicit dashboard state
//!
//! The server keeps one [`DashboardState`] and hands it to the renderer.
//! A predict action always lands in [`ViewState::ResultDisplayed`]; nothing
//! moves the view back to [`ViewState::Idle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::valuation::Valuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Valuation,
    Insights,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Valuation, Page::Insights];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Valuation => "valuation",
            Page::Insights => "insights",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Valuation => "💰 Valuation",
            Page::Insights => "📊 Insights",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "valuation" => Ok(Page::Valuation),
            "insights" => Ok(Page::Insights),
            other => Err(format!("unknown page '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    /// Awaiting input
    #[default]
    Idle,
    ResultDisplayed(Box<Valuation>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    page: Page,
    view: ViewState,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn valuation(&self) -> Option<&Valuation> {
        match &self.view {
            ViewState::ResultDisplayed(v) => Some(v),
            ViewState::Idle => None,
        }
    }

    /// Navigation action
    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    /// Predict action: show the new result on the valuation page
    pub fn show_result(&mut self, valuation: Valuation) {
        self.page = Page::Valuation;
        self.view = ViewState::ResultDisplayed(Box::new(valuation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{SensitivityChart, ValuationDisplay};
    use propai_core::{LocationResolution, PredictionResult, PropertyQuery};

    fn valuation(estimate: f64) -> Valuation {
        let result = PredictionResult {
            query: PropertyQuery::new("Hebbal", 1000.0, 2, 2),
            location: LocationResolution::Known(0),
            point_estimate: estimate,
            low_estimate: estimate * 0.9,
            high_estimate: estimate * 1.1,
            price_per_sqft: estimate * 100.0,
            sensitivity_grid: vec![],
            importance_ranking: None,
        };
        Valuation {
            id: uuid::Uuid::new_v4(),
            generated_at: chrono::Utc::now(),
            display: ValuationDisplay::from_result(&result),
            sensitivity: SensitivityChart::from_grid(&[], &[]),
            importance: None,
            warning: None,
            result,
        }
    }

    #[test]
    fn test_starts_idle_on_valuation() {
        let state = DashboardState::new();
        assert_eq!(state.page(), Page::Valuation);
        assert_eq!(state.view(), &ViewState::Idle);
        assert!(state.valuation().is_none());
    }

    #[test]
    fn test_predict_replaces_result() {
        let mut state = DashboardState::new();
        state.show_result(valuation(40.0));
        state.show_result(valuation(55.0));
        assert_eq!(state.valuation().unwrap().result.point_estimate, 55.0);
    }

    #[test]
    fn test_navigation_keeps_result() {
        let mut state = DashboardState::new();
        state.show_result(valuation(40.0));
        state.navigate(Page::Insights);
        assert_eq!(state.page(), Page::Insights);
        assert!(state.valuation().is_some());

        // predicting from another page returns to the valuation tab
        state.show_result(valuation(41.0));
        assert_eq!(state.page(), Page::Valuation);
    }

    #[test]
    fn test_page_parse() {
        assert_eq!("insights".parse::<Page>().unwrap(), Page::Insights);
        assert_eq!("Valuation".parse::<Page>().unwrap(), Page::Valuation);
        assert!("settings".parse::<Page>().is_err());
        assert_eq!(Page::Insights.to_string(), "insights");
    }
}
