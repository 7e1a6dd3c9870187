use serde::{Deserialize, Serialize};
use crate::forest::ForestRegressor;
use crate::{Error, FeatureVector, Result, FEATURE_COUNT};

/// A fitted price model
pub trait Regressor: Send + Sync {
    /// Number of inputs the model was fitted on
    fn n_features(&self) -> usize;

    /// Price estimate in Lakhs
    fn infer(&self, features: &FeatureVector) -> Result<f64>;

    /// Per-feature importance weights, when the model type provides them
    fn importances(&self) -> Option<&[f64]> {
        None
    }

    /// Short model family name for logs and the API
    fn kind(&self) -> &'static str;
}

/// Regressor artifact as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    Linear(LinearRegressor),
    Forest(ForestRegressor),
}

impl Model {
    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<()> {
        if self.n_features() != FEATURE_COUNT {
            return Err(Error::FeatureCount {
                expected: FEATURE_COUNT,
                actual: self.n_features(),
            });
        }
        match self {
            Model::Linear(m) => m.validate(),
            Model::Forest(m) => m.validate(),
        }
    }
}

impl Regressor for Model {
    fn n_features(&self) -> usize {
        match self {
            Model::Linear(m) => m.n_features(),
            Model::Forest(m) => m.n_features(),
        }
    }

    fn infer(&self, features: &FeatureVector) -> Result<f64> {
        match self {
            Model::Linear(m) => m.infer(features),
            Model::Forest(m) => m.infer(features),
        }
    }

    fn importances(&self) -> Option<&[f64]> {
        match self {
            Model::Linear(m) => m.importances(),
            Model::Forest(m) => m.importances(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Model::Linear(m) => m.kind(),
            Model::Forest(m) => m.kind(),
        }
    }
}

/// Ordinary linear model: `intercept + weights · x`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearRegressor {
    pub n_features: usize,
    pub intercept: f64,
    pub weights: Vec<f64>,
}

impl LinearRegressor {
    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != self.n_features {
            return Err(Error::InvalidModel(format!(
                "linear model has {} weights for {} features",
                self.weights.len(),
                self.n_features
            )));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::InvalidModel("linear model has non-finite coefficients".to_string()));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn infer(&self, features: &FeatureVector) -> Result<f64> {
        let x = checked_input(features, self.weights.len())?;
        let y = self.intercept
            + x.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>();
        checked_output(y)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Reject inputs the model cannot score
pub(crate) fn checked_input(features: &FeatureVector, n_features: usize) -> Result<&[f64]> {
    let x = features.as_slice();
    if x.len() != n_features {
        return Err(Error::Inference(format!(
            "model expects {} features, got {}",
            n_features,
            x.len()
        )));
    }
    if let Some(pos) = x.iter().position(|v| !v.is_finite()) {
        return Err(Error::Inference(format!("feature {} is not finite", pos)));
    }
    Ok(x)
}

pub(crate) fn checked_output(y: f64) -> Result<f64> {
    if y.is_finite() {
        Ok(y)
    } else {
        Err(Error::Inference(format!("model produced a non-finite estimate: {}", y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> LinearRegressor {
        LinearRegressor {
            n_features: 4,
            intercept: 5.0,
            weights: vec![0.5, 0.04, 2.0, 3.0],
        }
    }

    #[test]
    fn test_linear_infer() {
        let m = linear();
        let y = m.infer(&FeatureVector::new(2, 1000.0, 2, 3)).unwrap();
        assert!((y - (5.0 + 1.0 + 40.0 + 4.0 + 9.0)).abs() < 1e-9);
        assert!(m.importances().is_none());
    }

    #[test]
    fn test_linear_validate() {
        assert!(linear().validate().is_ok());
        let mut bad = linear();
        bad.weights.pop();
        assert!(matches!(bad.validate(), Err(Error::InvalidModel(_))));
        let mut bad = linear();
        bad.intercept = f64::INFINITY;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_non_finite_input_fails() {
        let m = linear();
        let err = m.infer(&FeatureVector::new(0, f64::NAN, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_overflowing_output_fails() {
        let m = LinearRegressor {
            n_features: 4,
            intercept: 0.0,
            weights: vec![0.0, f64::MAX, 0.0, 0.0],
        };
        assert!(matches!(
            m.infer(&FeatureVector::new(0, 10.0, 1, 1)),
            Err(Error::Inference(_))
        ));
    }

    #[test]
    fn test_model_feature_count_checked() {
        let model = Model::Linear(LinearRegressor {
            n_features: 3,
            intercept: 0.0,
            weights: vec![1.0; 3],
        });
        assert_eq!(
            model.validate(),
            Err(Error::FeatureCount { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_model_is_externally_tagged() {
        let json = r#"{"linear": {"n_features": 4, "intercept": 1.0, "weights": [0, 0, 0, 0]}}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "linear");
        assert!(model.validate().is_ok());
    }
}
