//! Random forest regressor
//!
//! Trees use the flat array layout common to tree-ensemble exports: node `i`
//! is described by `children_left[i]`, `children_right[i]`, `feature[i]`,
//! `threshold[i]` and `value[i]`. A left child of [`LEAF`] marks a leaf.
//! Samples go left when `x[feature] <= threshold`.

use serde::{Deserialize, Serialize};
use crate::model::{checked_input, checked_output, Regressor};
use crate::{Error, FeatureVector, Result};

/// Child index marking a leaf node
pub const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// A tree that always predicts `value`
    pub fn constant(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    pub fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(Error::InvalidModel("tree has no nodes".to_string()));
        }
        if self.children_left.len() != n
            || self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
        {
            return Err(Error::InvalidModel(format!(
                "tree arrays differ in length: left={}, right={}, feature={}, threshold={}, value={}",
                self.children_left.len(),
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                n
            )));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(Error::InvalidModel(format!(
                        "node {} has only a right child",
                        node
                    )));
                }
                if !self.value[node].is_finite() {
                    return Err(Error::InvalidModel(format!(
                        "leaf {} has a non-finite value",
                        node
                    )));
                }
                continue;
            }

            // children always come after their parent, so every walk terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(Error::InvalidModel(format!(
                        "node {} points to invalid child {}",
                        node, child
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(Error::InvalidModel(format!(
                    "node {} splits on unknown feature {}",
                    node, feature
                )));
            }
            if !self.threshold[node].is_finite() {
                return Err(Error::InvalidModel(format!(
                    "node {} has a non-finite threshold",
                    node
                )));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let mut node = 0usize;
        // a valid tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.node_count() {
            let left = *self.children_left.get(node).ok_or_else(|| bad_node(node))?;
            if left == LEAF {
                return self.value.get(node).copied().ok_or_else(|| bad_node(node));
            }
            let right = *self.children_right.get(node).ok_or_else(|| bad_node(node))?;
            let feature = *self.feature.get(node).ok_or_else(|| bad_node(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| bad_node(node))?;
            let value = usize::try_from(feature)
                .ok()
                .and_then(|f| x.get(f))
                .ok_or_else(|| Error::Inference(format!("node {} reads missing feature {}", node, feature)))?;

            let next = if *value <= threshold { left } else { right };
            node = usize::try_from(next).map_err(|_| bad_node(node))?;
        }
        Err(Error::Inference("tree walk did not reach a leaf".to_string()))
    }
}

fn bad_node(node: usize) -> Error {
    Error::Inference(format!("tree walk reached malformed node {}", node))
}

/// Averaging ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestRegressor {
    pub n_features: usize,
    pub feature_importances: Vec<f64>,
    pub trees: Vec<DecisionTree>,
}

impl ForestRegressor {
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::InvalidModel("forest has no trees".to_string()));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(Error::InvalidModel(format!(
                "forest has {} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        if self
            .feature_importances
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(Error::InvalidModel(
                "feature importances must be finite and non-negative".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| Error::InvalidModel(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Regressor for ForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn infer(&self, features: &FeatureVector) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(Error::Inference("forest has no trees".to_string()));
        }
        let x = checked_input(features, self.n_features)?;
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(x)?;
        }
        checked_output(sum / self.trees.len() as f64)
    }

    fn importances(&self) -> Option<&[f64]> {
        Some(&self.feature_importances)
    }

    fn kind(&self) -> &'static str {
        "forest"
    }
}
