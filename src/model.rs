use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Internal split node. Samples with `x[feature_idx] <= threshold` go left,
/// the rest go right. Thresholds live in scaled feature space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitNode {
    pub feature_idx: usize,
    pub threshold: f32,
    pub left: Box<TreeNode>,
    pub right: Box<TreeNode>,
}

/// Leaf node carrying the class this path votes for and how many training
/// samples ended up here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode {
    pub class_idx: usize,
    pub n_samples: usize,
}

/// A node in a decision tree, either a split or a leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Split(SplitNode),
    Leaf(LeafNode),
}

impl TreeNode {
    /// Walk the tree for one sample and return the voted class index.
    fn decide(&self, x: &[f32]) -> usize {
        match self {
            TreeNode::Leaf(leaf) => leaf.class_idx,
            TreeNode::Split(split) => {
                if x[split.feature_idx] <= split.threshold {
                    split.left.decide(x)
                } else {
                    split.right.decide(x)
                }
            }
        }
    }

    /// Depth of the tree rooted here. Leaves have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Split(split) => 1 + split.left.depth().max(split.right.depth()),
        }
    }

    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        match self {
            TreeNode::Leaf(leaf) => {
                if leaf.class_idx >= n_classes {
                    return Err(format!(
                        "leaf votes for class {} but only {} classes exist",
                        leaf.class_idx, n_classes
                    ));
                }
                Ok(())
            }
            TreeNode::Split(split) => {
                if split.feature_idx >= n_features {
                    return Err(format!(
                        "split on feature {} but only {} features exist",
                        split.feature_idx, n_features
                    ));
                }
                split.left.check(n_features, n_classes)?;
                split.right.check(n_features, n_classes)
            }
        }
    }
}

/// Pre-trained random-forest classifier over a fixed crop label set.
///
/// Inference is a read-only walk over every tree; the class probability is
/// the share of trees voting for it, so the distribution always sums to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    /// Crop labels in encoder order; leaf `class_idx` values index into this.
    pub classes: Vec<String>,
    /// Number of columns each tree expects, after scaling.
    pub n_features: usize,
    pub trees: Vec<TreeNode>,
}

impl Forest {
    /// Probability per class for one scaled feature vector.
    pub fn predict_proba(&self, x: &[f32]) -> Result<Vec<f64>, PredictError> {
        if x.len() != self.n_features {
            return Err(PredictError::SchemaMismatch(format!(
                "model expects {} features, got {}",
                self.n_features,
                x.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(PredictError::SchemaMismatch(
                "model has no trees".to_string(),
            ));
        }

        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            let class_idx = tree.decide(x);
            match votes.get_mut(class_idx) {
                Some(slot) => *slot += 1,
                None => {
                    return Err(PredictError::SchemaMismatch(format!(
                        "leaf voted for class {} but only {} classes exist",
                        class_idx,
                        self.classes.len()
                    )))
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v as f64 / n_trees).collect())
    }

    /// Walk every tree checking split and leaf indices against the declared
    /// schema. Run once at startup so `decide` can index unchecked.
    pub fn check(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("model declares no classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("model has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(TreeNode::depth).max().unwrap_or(0)
    }
}
