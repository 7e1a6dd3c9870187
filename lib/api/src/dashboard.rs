//! Server-rendered HTML for the dashboard
//!
//! The page is a thin shell over [`crate::chart`]: every number shown comes
//! from a [`Valuation`] or the importance ranking.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use propai_storage::{LoadError, ModelArtifacts};
use std::fmt::Write;

use crate::chart::{format_lakhs, importance_rows, ImportanceRow, SensitivityChart};
use crate::config::DashboardConfig;
use crate::state::{DashboardState, Page};
use crate::valuation::Valuation;

/// Banner shown above the result panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

const STYLE: &str = r#"
body { font-family: 'Inter', sans-serif; color: #e0e0e0; background: linear-gradient(135deg, #0a0a0a, #1a1a1a); min-height: 100vh; margin: 0; padding: 24px 40px; }
h1, h2, h3, h4 { margin: 0.4em 0; }
.muted { color: #888; font-size: 0.9em; }
.tabs a { display: inline-block; padding: 8px 16px; margin-right: 6px; color: #aaa; text-decoration: none; border-bottom: 2px solid transparent; }
.tabs a.active { color: #18ffff; border-bottom-color: #18ffff; }
.layout { display: grid; grid-template-columns: 1.2fr 1.7fr; gap: 40px; }
form label { display: block; margin: 12px 0 4px; }
form select, form input { width: 100%; padding: 8px; background: #222; color: #e0e0e0; border: 1px solid #333; border-radius: 6px; }
.rooms { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
button { margin-top: 20px; width: 100%; padding: 12px; background: #00bfa5; color: #0a0a0a; border: 0; border-radius: 8px; font-weight: 600; cursor: pointer; transition: transform 0.2s ease, box-shadow 0.2s ease; }
button:hover { transform: translateY(-2px); box-shadow: 0 4px 12px rgba(0,255,255,0.2); }
.card { background: rgba(255,255,255,0.05); padding: 25px; border-radius: 12px; border: 1px solid rgba(0,255,255,0.2); text-align: center; }
.estimate { color: #00e676; font-size: 3em; margin: 10px 0; }
.placeholder { padding: 40px; text-align: center; color: #666; border: 2px dashed rgba(255,255,255,0.1); border-radius: 12px; margin-top: 20px; }
.notice { padding: 12px 16px; border-radius: 8px; margin: 12px 0; }
.notice.warning { background: rgba(255,235,59,0.1); border: 1px solid #ffeb3b; }
.notice.error { background: rgba(255,82,82,0.1); border: 1px solid #ff5252; }
table { border-collapse: collapse; width: 100%; margin-top: 8px; }
th, td { padding: 6px 10px; border-bottom: 1px solid #333; text-align: right; }
.metrics { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.metric { background: rgba(255,255,255,0.04); padding: 16px; border-radius: 10px; }
.metric .value { font-size: 1.6em; color: #18ffff; }
.bar { background: #18ffff; height: 14px; border-radius: 4px; }
"#;

fn page_shell(config: &DashboardConfig, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        text(&config.page_title),
        STYLE,
        body
    )
}

/// Blocking error page; no input form is rendered
pub fn render_unavailable(config: &DashboardConfig, error: &LoadError) -> String {
    let (headline, hint) = match error {
        LoadError::Missing { .. } | LoadError::Io { .. } => (
            "Model files not found.",
            "Please run the training notebook first.",
        ),
        LoadError::Corrupt { .. } => (
            "Model files could not be read.",
            "Re-export the artifacts from the training notebook.",
        ),
        LoadError::Inconsistent(_) => (
            "Model files do not match each other.",
            "Export the model, encoder and columns from the same training run.",
        ),
    };
    let body = format!(
        "<h1>🏢 {}</h1>\n\
         <div class=\"notice error\"><strong>{}</strong> \
         {}<br><span class=\"muted\">{} ({})</span></div>",
        text(&config.title),
        headline,
        hint,
        text(&error.to_string()),
        text(error.kind()),
    );
    page_shell(config, &body)
}

/// Full dashboard for the current state
pub fn render(
    config: &DashboardConfig,
    artifacts: &ModelArtifacts,
    state: &DashboardState,
    notice: Option<&Notice>,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>🏢 {}</h1>\n<h3 class=\"muted\">{}</h3>\n<nav class=\"tabs\">",
        text(&config.title),
        text(&config.subtitle)
    );
    for page in Page::ALL {
        let class = if page == state.page() { " class=\"active\"" } else { "" };
        let _ = write!(body, "<a href=\"/?page={}\"{}>{}</a>", page, class, page.label());
    }
    body.push_str("</nav>\n");

    match state.page() {
        Page::Valuation => {
            body.push_str("<div class=\"layout\">\n<section>");
            body.push_str(&render_form(config, artifacts, state.valuation()));
            body.push_str("</section>\n<section>");
            if let Some(notice) = notice {
                body.push_str(&render_notice(notice));
            }
            match state.valuation() {
                Some(valuation) => body.push_str(&render_result(valuation)),
                None => body.push_str(
                    "<div class=\"placeholder\"><h3>Ready for Valuation</h3>\
                     <p>Adjust the property parameters on the left and click <b>Predict Price</b>.</p></div>",
                ),
            }
            body.push_str("</section>\n</div>");
        }
        Page::Insights => {
            if let Some(notice) = notice {
                body.push_str(&render_notice(notice));
            }
            body.push_str(&render_insights(config, artifacts));
        }
    }

    page_shell(config, &body)
}

fn render_notice(notice: &Notice) -> String {
    let (class, message) = match notice {
        Notice::Warning(m) => ("warning", m),
        Notice::Error(m) => ("error", m),
    };
    format!("<div class=\"notice {}\">{}</div>", class, text(message))
}

fn render_form(
    config: &DashboardConfig,
    artifacts: &ModelArtifacts,
    last: Option<&Valuation>,
) -> String {
    let bounds = &config.bounds;
    let defaults = &config.form;
    let (location, sqft, bhk, bath) = match last {
        Some(v) => {
            let q = &v.result.query;
            (Some(q.location.as_str()), q.total_sqft, q.bhk, q.bath)
        }
        None => (None, defaults.total_sqft, defaults.bhk, defaults.bath),
    };

    let mut html = String::from(
        "<h4>🏡 Property Details</h4><p class=\"muted\">Adjust the parameters below:</p>\n\
         <form method=\"post\" action=\"/predict\">\n\
         <label for=\"location\">📍 Location</label><select id=\"location\" name=\"location\">",
    );
    for class in artifacts.encoder().sorted_classes() {
        let selected = if Some(class) == location { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{}\"{}>{}</option>", attr(class), selected, text(class));
    }
    let _ = write!(
        html,
        "</select>\n\
         <label for=\"total_sqft\">📏 Total Sqft</label>\
         <input id=\"total_sqft\" name=\"total_sqft\" type=\"number\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\">\n\
         <div class=\"rooms\"><div><label for=\"bhk\">🛏 BHK</label>\
         <input id=\"bhk\" name=\"bhk\" type=\"number\" min=\"{rmin}\" max=\"{rmax}\" value=\"{}\"></div>\
         <div><label for=\"bath\">🚿 Bath</label>\
         <input id=\"bath\" name=\"bath\" type=\"number\" min=\"{rmin}\" max=\"{rmax}\" value=\"{}\"></div></div>\n\
         <button type=\"submit\">Predict Price</button>\n</form>",
        bounds.min_sqft,
        bounds.max_sqft,
        defaults.sqft_step,
        sqft,
        bhk,
        bath,
        rmin = bounds.min_rooms,
        rmax = bounds.max_rooms,
    );
    html
}

fn render_result(valuation: &Valuation) -> String {
    let mut html = String::new();
    if let Some(warning) = &valuation.warning {
        html.push_str(&render_notice(&Notice::Warning(warning.clone())));
    }
    let display = &valuation.display;
    let _ = write!(
        html,
        "<div class=\"card\"><h4 class=\"muted\">Estimated Value</h4>\
         <div class=\"estimate\">{}</div>\
         <p><strong>Market Range:</strong> {}</p></div>\n\
         <h4>Analysis: Why this price?</h4>\
         <p><strong>Price per Sqft:</strong> {}</p>\n",
        text(&display.estimate),
        text(&display.band),
        text(&display.price_per_sqft),
    );

    if !valuation.sensitivity.is_empty() {
        html.push_str(
            "<h5>Price Sensitivity</h5>\
             <p class=\"muted\">How changing BHK/Bath affects the price for this Square Footage:</p>",
        );
        html.push_str(&render_sensitivity(&valuation.sensitivity));
        html.push_str(
            "<p class=\"muted\">Note: Square Footage and Location have the highest impact. \
             BHK/Bath shifts are more subtle.</p>",
        );
    }
    html
}

fn render_sensitivity(chart: &SensitivityChart) -> String {
    let mut html = String::from("<table><thead><tr><th>BHK</th>");
    for series in &chart.series {
        let _ = write!(
            html,
            "<th style=\"color: {}\">Bath {}</th>",
            attr(&series.color),
            series.bath
        );
    }
    html.push_str("</tr></thead><tbody>");
    for (row, bhk) in chart.bhk.iter().enumerate() {
        let _ = write!(html, "<tr><td>{}</td>", bhk);
        for series in &chart.series {
            match series.prices.get(row).copied().flatten() {
                Some(price) => {
                    let _ = write!(html, "<td>{}</td>", text(&format_lakhs(price)));
                }
                None => html.push_str("<td>–</td>"),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn render_insights(config: &DashboardConfig, artifacts: &ModelArtifacts) -> String {
    let card = &config.model_card;
    let mut html = format!(
        "<h4>Model Performance</h4><div class=\"metrics\">\
         <div class=\"metric\"><div class=\"muted\">Architecture</div><div class=\"value\">{}</div></div>\
         <div class=\"metric\"><div class=\"muted\">Accuracy (R²)</div><div class=\"value\">{}</div></div>\
         <div class=\"metric\"><div class=\"muted\">Avg Error</div><div class=\"value\">{}</div></div>\
         </div><hr>\n<h4>Factor Influence</h4>",
        text(&card.architecture),
        text(&card.accuracy),
        text(&card.avg_error),
    );

    let ranking = artifacts.predictor(config.bounds).importance_ranking();
    match ranking {
        Some(ranking) => {
            let rows = importance_rows(&ranking);
            html.push_str(&render_importance(&rows));
            html.push_str(
                "<div class=\"notice warning\">💡 <strong>Insight:</strong> Total Sqft is the most \
                 critical factor. This is why price doesn't change drastically when only BHK or \
                 Bathrooms are adjusted without changing the area.</div>",
            );
        }
        None => html.push_str("<p class=\"muted\">Feature importance not available.</p>"),
    }
    html
}

fn render_importance(rows: &[ImportanceRow]) -> String {
    let max = rows.iter().map(|r| r.weight).fold(0.0_f64, f64::max);
    let mut html = String::from("<table><thead><tr><th>Factor</th><th>Weight (%)</th><th></th></tr></thead><tbody>");
    for row in rows {
        let width = if max > 0.0 { row.weight / max * 100.0 } else { 0.0 };
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td style=\"width: 50%\"><div class=\"bar\" style=\"width: {:.1}%\"></div></td></tr>",
            text(&row.feature),
            text(&row.display),
            width
        );
    }
    html.push_str("</tbody></table>\n<h5>Impact Breakdown</h5><ul>");
    for row in rows {
        let _ = write!(
            html,
            "<li><strong>{}</strong>: {} impact</li>",
            text(&row.label),
            text(&row.display)
        );
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use propai_core::{
        DecisionTree, FeatureColumns, ForestRegressor, LinearRegressor, LocationEncoder, Model,
        PropertyQuery,
    };

    fn artifacts(model: Model) -> ModelArtifacts {
        ModelArtifacts::new(
            model,
            LocationEncoder::new(vec!["Whitefield".into(), "<Hebbal>".into(), "other".into()]).unwrap(),
            FeatureColumns::default(),
        )
        .unwrap()
    }

    fn forest() -> Model {
        Model::Forest(ForestRegressor {
            n_features: 4,
            feature_importances: vec![0.1, 0.7, 0.05, 0.15],
            trees: vec![DecisionTree::constant(52.5)],
        })
    }

    #[test]
    fn test_idle_page() {
        let html = render(
            &DashboardConfig::default(),
            &artifacts(forest()),
            &DashboardState::new(),
            None,
        );
        assert!(html.contains("Ready for Valuation"));
        assert!(html.contains("action=\"/predict\""));
        assert!(html.contains("value=\"1000\""));
        // class names are escaped
        assert!(html.contains("&lt;Hebbal&gt;"));
        assert!(!html.contains("<Hebbal>"));
    }

    #[test]
    fn test_result_page() {
        let config = DashboardConfig::default();
        let a = artifacts(forest());
        let v = Valuation::compute(&a, &config, &PropertyQuery::new("Nowhere", 1500.0, 3, 2)).unwrap();
        let mut state = DashboardState::new();
        state.show_result(v);

        let html = render(&config, &a, &state, None);
        assert!(html.contains("₹ 52.50 Lakhs"));
        assert!(html.contains("₹ 3,500 / sqft"));
        assert!(html.contains("Price Sensitivity"));
        assert!(html.contains("Using &#x27;other&#x27;") || html.contains("Using 'other'"));
        assert!(html.contains("value=\"1500\""));
        assert!(!html.contains("Ready for Valuation"));
    }

    #[test]
    fn test_insights_page() {
        let mut state = DashboardState::new();
        state.navigate(Page::Insights);
        let html = render(&DashboardConfig::default(), &artifacts(forest()), &state, None);
        assert!(html.contains("76.0%"));
        assert!(html.contains("Random Forest"));
        assert!(html.contains("Total Sqft"));
        assert!(html.contains("70.0%"));
        assert!(!html.contains("action=\"/predict\""));
    }

    #[test]
    fn test_insights_without_importances() {
        let model = Model::Linear(LinearRegressor {
            n_features: 4,
            intercept: 1.0,
            weights: vec![0.0; 4],
        });
        let mut state = DashboardState::new();
        state.navigate(Page::Insights);
        let html = render(&DashboardConfig::default(), &artifacts(model), &state, None);
        assert!(html.contains("Feature importance not available."));
    }

    #[test]
    fn test_error_notice() {
        let html = render(
            &DashboardConfig::default(),
            &artifacts(forest()),
            &DashboardState::new(),
            Some(&Notice::Error("Inference failed: boom".to_string())),
        );
        assert!(html.contains("notice error"));
        assert!(html.contains("Inference failed: boom"));
    }

    #[test]
    fn test_unavailable_page_has_no_form() {
        let err = LoadError::Missing {
            name: "trained_model",
            dir: "models".into(),
        };
        let html = render_unavailable(&DashboardConfig::default(), &err);
        assert!(html.contains("Model files not found"));
        assert!(html.contains("artifacts-missing"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_unavailable_headline_follows_failure_kind() {
        let config = DashboardConfig::default();

        let corrupt = LoadError::Corrupt {
            path: "models/label_encoder.json".into(),
            message: "expected value at line 1".to_string(),
        };
        let html = render_unavailable(&config, &corrupt);
        assert!(html.contains("Model files could not be read."));
        assert!(html.contains("artifact-corrupt"));
        assert!(!html.contains("Model files not found"));

        let mismatch = LoadError::Inconsistent("2 feature columns for a regressor with 4 features".to_string());
        let html = render_unavailable(&config, &mismatch);
        assert!(html.contains("Model files do not match each other."));
        assert!(html.contains("artifact-inconsistent"));
        assert!(!html.contains("<form"));
    }
}
