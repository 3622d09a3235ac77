use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Standardization parameters fitted offline: population mean and standard
/// deviation per feature column, in the same order the model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl ScalingParameters {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Center and scale one feature vector: `(x[i] - mean[i]) / std[i]`.
    ///
    /// A length mismatch means the assembler, scaler and model were not
    /// built from the same schema and is reported as such, never truncated
    /// or padded over.
    pub fn transform(&self, x: &[f32]) -> Result<Vec<f32>, PredictError> {
        if x.len() != self.mean.len() || self.std.len() != self.mean.len() {
            return Err(PredictError::SchemaMismatch(format!(
                "scaler expects {} features, got {} (std table has {})",
                self.mean.len(),
                x.len(),
                self.std.len()
            )));
        }
        Ok(x.iter()
            .enumerate()
            .map(|(j, v)| {
                let centered = v - self.mean[j];
                // Constant training columns keep the centered value rather
                // than dividing by ~0.
                if self.std[j] > 1e-10 {
                    centered / self.std[j]
                } else {
                    centered
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_each_column() {
        let scaler = ScalingParameters {
            mean: vec![10.0, 0.0, -4.0],
            std: vec![2.0, 1.0, 4.0],
        };
        let scaled = scaler.transform(&[12.0, -3.0, 0.0]).unwrap();
        assert_eq!(scaled, vec![1.0, -3.0, 1.0]);
    }

    #[test]
    fn wrong_length_is_schema_mismatch() {
        let scaler = ScalingParameters {
            mean: vec![0.0; 7],
            std: vec![1.0; 7],
        };
        for bad_len in [0, 6, 8] {
            let err = scaler.transform(&vec![1.0; bad_len]).unwrap_err();
            assert!(
                matches!(err, PredictError::SchemaMismatch(_)),
                "len {bad_len} must not be silently truncated or padded"
            );
        }
    }

    #[test]
    fn near_zero_std_passes_centered_value() {
        let scaler = ScalingParameters {
            mean: vec![5.0],
            std: vec![0.0],
        };
        let scaled = scaler.transform(&[7.0]).unwrap();
        assert_eq!(scaled, vec![2.0]);
    }
}
