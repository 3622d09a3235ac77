use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::features::DistrictEncoder;
use crate::model::Forest;
use crate::scaler::ScalingParameters;

pub const SCALER_FILE: &str = "scaler.json";
pub const FOREST_FILE: &str = "forest.json";
pub const DISTRICTS_FILE: &str = "districts.json";

/// Number of numeric soil/weather columns before the optional district code.
pub const NUMERIC_FEATURES: usize = 7;

/// The read-only blobs every request borrows: scaler parameters, the
/// trained forest and, in with-district deployments, the district encoder.
///
/// Loaded once at startup, never mutated or reloaded while serving.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub scaler: ScalingParameters,
    pub forest: Forest,
    pub districts: Option<DistrictEncoder>,
}

impl ArtifactSet {
    /// Load all artifacts from one directory.
    ///
    /// Presence of districts.json selects the with-district (8-column)
    /// schema; without it the model runs on the 7 numeric columns alone.
    /// This only reads and parses; call [`ArtifactSet::check_schema`]
    /// afterwards so inconsistent deployments die at startup instead of
    /// per request.
    pub fn load(dir: &Path) -> Result<Self> {
        let scaler: ScalingParameters = read_json(&dir.join(SCALER_FILE))?;
        let forest: Forest = read_json(&dir.join(FOREST_FILE))?;

        let districts_path = dir.join(DISTRICTS_FILE);
        let districts = if districts_path.exists() {
            Some(read_json::<DistrictEncoder>(&districts_path)?)
        } else {
            None
        };

        Ok(Self {
            scaler,
            forest,
            districts,
        })
    }

    /// Feature column count implied by the deployment mode.
    pub fn n_features(&self) -> usize {
        NUMERIC_FEATURES + usize::from(self.districts.is_some())
    }

    /// Cross-check that scaler, forest and deployment mode agree on one
    /// column schema and that the forest indexes nothing out of bounds.
    pub fn check_schema(&self) -> Result<()> {
        let expected = self.n_features();
        if self.scaler.mean.len() != self.scaler.std.len() {
            bail!(
                "scaler mean/std tables disagree: {} vs {}",
                self.scaler.mean.len(),
                self.scaler.std.len()
            );
        }
        if self.scaler.n_features() != expected {
            bail!(
                "scaler was fitted on {} columns but this deployment expects {}",
                self.scaler.n_features(),
                expected
            );
        }
        if self.forest.n_features != expected {
            bail!(
                "model was trained on {} columns but this deployment expects {}",
                self.forest.n_features,
                expected
            );
        }
        if let Some(districts) = &self.districts {
            if districts.is_empty() {
                bail!("district encoder is present but empty");
            }
        }
        self.forest.check().map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact at {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::{LeafNode, TreeNode};

    fn forest(n_features: usize) -> Forest {
        Forest {
            classes: vec!["maize".to_string(), "rice".to_string()],
            n_features,
            trees: vec![TreeNode::Leaf(LeafNode {
                class_idx: 1,
                n_samples: 10,
            })],
        }
    }

    fn scaler(n: usize) -> ScalingParameters {
        ScalingParameters {
            mean: vec![0.0; n],
            std: vec![1.0; n],
        }
    }

    #[test]
    fn consistent_seven_column_set_passes() {
        let set = ArtifactSet {
            scaler: scaler(7),
            forest: forest(7),
            districts: None,
        };
        assert_eq!(set.n_features(), 7);
        assert!(set.check_schema().is_ok());
    }

    #[test]
    fn district_mode_expects_eight_columns() {
        let districts = DistrictEncoder::new(HashMap::from([("lahore".to_string(), 3)]));
        let set = ArtifactSet {
            scaler: scaler(8),
            forest: forest(8),
            districts: Some(districts),
        };
        assert_eq!(set.n_features(), 8);
        assert!(set.check_schema().is_ok());
    }

    #[test]
    fn disagreeing_artifacts_fail_the_check() {
        // Scaler fitted with a district column, forest without one.
        let set = ArtifactSet {
            scaler: scaler(8),
            forest: forest(7),
            districts: None,
        };
        assert!(set.check_schema().is_err());

        let set = ArtifactSet {
            scaler: scaler(7),
            forest: forest(8),
            districts: None,
        };
        assert!(set.check_schema().is_err());
    }

    #[test]
    fn uneven_scaler_tables_fail_the_check() {
        let set = ArtifactSet {
            scaler: ScalingParameters {
                mean: vec![0.0; 7],
                std: vec![1.0; 6],
            },
            forest: forest(7),
            districts: None,
        };
        assert!(set.check_schema().is_err());
    }
}
