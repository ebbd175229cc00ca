use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{DetectError, DetectorModel, FeatureVector, FEATURE_DIM};

/// A trained random-forest classifier loaded from a JSON artifact.
///
/// The artifact is exported offline from the training pipeline as flat
/// per-tree arrays (children, split feature, threshold, per-class leaf
/// weights). Split features index the 32-position feature vector
/// directly; there are no feature names anywhere in the artifact.
///
/// Prediction averages the leaf class-1 fraction over all trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    num_features: usize,
    trees: Vec<DecisionTree>,
}

/// One decision tree in sklearn's flat-array layout. A node is a leaf
/// when its left child is negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    /// Weighted class counts `[human, synthetic]` per node.
    value: Vec<[f64; 2]>,
}

impl RandomForest {
    /// Loads and validates the artifact at `path`.
    ///
    /// A missing, unreadable or structurally invalid artifact is
    /// [`DetectError::ModelUnavailable`] — distinct from prediction-time
    /// failures.
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let data = std::fs::read(path).map_err(|e| {
            DetectError::ModelUnavailable(format!("{}: {e}", path.display()))
        })?;
        let forest: RandomForest = serde_json::from_slice(&data).map_err(|e| {
            DetectError::ModelUnavailable(format!("{}: {e}", path.display()))
        })?;
        forest.validate()?;
        info!(
            "loaded forest: {} trees, {} features",
            forest.trees.len(),
            forest.num_features
        );
        Ok(forest)
    }

    /// Builds a forest from parts, validating the structure. Primarily
    /// for tests and artifact tooling.
    pub fn from_json(data: &[u8]) -> Result<Self, DetectError> {
        let forest: RandomForest = serde_json::from_slice(data)
            .map_err(|e| DetectError::ModelUnavailable(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    fn validate(&self) -> Result<(), DetectError> {
        if self.trees.is_empty() {
            return Err(DetectError::ModelUnavailable("forest has no trees".into()));
        }
        if self.num_features != FEATURE_DIM {
            return Err(DetectError::ModelUnavailable(format!(
                "artifact expects {} features, engine produces {FEATURE_DIM}",
                self.num_features
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            let n = tree.children_left.len();
            if n == 0
                || tree.children_right.len() != n
                || tree.feature.len() != n
                || tree.threshold.len() != n
                || tree.value.len() != n
            {
                return Err(DetectError::ModelUnavailable(format!(
                    "tree {i} has inconsistent node arrays"
                )));
            }
            for node in 0..n {
                let (l, r) = (tree.children_left[node], tree.children_right[node]);
                if l >= 0 {
                    if l as usize >= n || r < 0 || r as usize >= n {
                        return Err(DetectError::ModelUnavailable(format!(
                            "tree {i} node {node} has out-of-range children"
                        )));
                    }
                    let f = tree.feature[node];
                    if f < 0 || f as usize >= self.num_features {
                        return Err(DetectError::ModelUnavailable(format!(
                            "tree {i} node {node} splits on feature {f}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl DecisionTree {
    fn predict(&self, x: &[f64]) -> Result<f64, DetectError> {
        let mut node = 0usize;
        // Bounded by node count; validate() guarantees children stay in
        // range and leaves terminate.
        for _ in 0..self.children_left.len() {
            let left = self.children_left[node];
            if left < 0 {
                let [neg, pos] = self.value[node];
                let total = neg + pos;
                if total <= 0.0 {
                    return Err(DetectError::Model("empty leaf".into()));
                }
                return Ok(pos / total);
            }
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(DetectError::Model("tree walk did not terminate".into()))
    }
}

impl DetectorModel for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Result<f64, DetectError> {
        let x = features.as_slice();
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A stump splitting on the pitch-variance feature (index 30):
    /// low variance -> synthetic-leaning leaf, high -> human-leaning.
    fn stump(threshold: f64, low_p1: f64, high_p1: f64) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![30, -2, -2],
            threshold: vec![threshold, 0.0, 0.0],
            value: vec![
                [1.0, 1.0],
                [100.0 * (1.0 - low_p1), 100.0 * low_p1],
                [100.0 * (1.0 - high_p1), 100.0 * high_p1],
            ],
        }
    }

    fn features_with_pitch_var(pv: f64) -> FeatureVector {
        let mut v = [0.0f64; FEATURE_DIM];
        v[30] = pv;
        FeatureVector::from_array(v)
    }

    #[test]
    fn forest_predicts_leaf_fractions() {
        let forest = RandomForest {
            num_features: FEATURE_DIM,
            trees: vec![stump(10.0, 0.9, 0.2)],
        };
        let p = forest.predict(&features_with_pitch_var(1.0)).unwrap();
        assert!((p - 0.9).abs() < 1e-9);
        let p = forest.predict(&features_with_pitch_var(100.0)).unwrap();
        assert!((p - 0.2).abs() < 1e-9);
    }

    #[test]
    fn forest_averages_trees() {
        let forest = RandomForest {
            num_features: FEATURE_DIM,
            trees: vec![stump(10.0, 1.0, 0.0), stump(10.0, 0.5, 0.5)],
        };
        let p = forest.predict(&features_with_pitch_var(1.0)).unwrap();
        assert!((p - 0.75).abs() < 1e-9);
    }

    #[test]
    fn split_is_inclusive_on_threshold() {
        let forest = RandomForest {
            num_features: FEATURE_DIM,
            trees: vec![stump(10.0, 0.9, 0.2)],
        };
        // x <= threshold goes left (sklearn convention).
        let p = forest.predict(&features_with_pitch_var(10.0)).unwrap();
        assert!((p - 0.9).abs() < 1e-9);
    }

    #[test]
    fn load_missing_artifact_is_model_unavailable() {
        let err = RandomForest::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, DetectError::ModelUnavailable(_)));
    }

    #[test]
    fn invalid_json_is_model_unavailable() {
        let err = RandomForest::from_json(b"not json").unwrap_err();
        assert!(matches!(err, DetectError::ModelUnavailable(_)));
    }

    #[test]
    fn wrong_feature_count_rejected() {
        let forest = RandomForest {
            num_features: 16,
            trees: vec![stump(10.0, 0.9, 0.2)],
        };
        let data = serde_json::to_vec(&forest).unwrap();
        let err = RandomForest::from_json(&data).unwrap_err();
        assert!(matches!(err, DetectError::ModelUnavailable(_)));
    }

    #[test]
    fn out_of_range_split_feature_rejected() {
        let mut tree = stump(10.0, 0.9, 0.2);
        tree.feature[0] = 99;
        let forest = RandomForest {
            num_features: FEATURE_DIM,
            trees: vec![tree],
        };
        let data = serde_json::to_vec(&forest).unwrap();
        let err = RandomForest::from_json(&data).unwrap_err();
        assert!(matches!(err, DetectError::ModelUnavailable(_)));
    }

    #[test]
    fn json_roundtrip() {
        let forest = RandomForest {
            num_features: FEATURE_DIM,
            trees: vec![stump(42.0, 0.8, 0.1)],
        };
        let data = serde_json::to_vec(&forest).unwrap();
        let loaded = RandomForest::from_json(&data).unwrap();
        let p = loaded.predict(&features_with_pitch_var(1.0)).unwrap();
        assert!((p - 0.8).abs() < 1e-9);
    }
}
