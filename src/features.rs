use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::types::SoilReading;

/// Code assigned to district values the encoder was never fitted on.
pub const UNKNOWN_DISTRICT_CODE: u32 = 0;

/// Inclusive physical bounds for each numeric field, in column order.
const FIELD_RANGES: [(&str, f32, f32); 7] = [
    ("N", 0.0, 140.0),
    ("P", 0.0, 145.0),
    ("K", 0.0, 200.0),
    ("temperature", 0.0, 50.0),
    ("humidity", 0.0, 100.0),
    ("ph", 0.0, 14.0),
    ("rainfall", 0.0, 300.0),
];

/// Mapping from normalized district name to the integer code the model was
/// trained with. Fitted offline alongside the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictEncoder {
    codes: HashMap<String, u32>,
}

impl DistrictEncoder {
    pub fn new(codes: HashMap<String, u32>) -> Self {
        Self { codes }
    }

    /// Resolve a raw district string to its code.
    ///
    /// Lookup is case- and whitespace-insensitive. Unknown values resolve
    /// to [`UNKNOWN_DISTRICT_CODE`] instead of failing; the second tuple
    /// element reports whether the value was actually known.
    pub fn encode(&self, raw: &str) -> (u32, bool) {
        let key = raw.trim().to_lowercase();
        match self.codes.get(&key) {
            Some(code) => (*code, true),
            None => (UNKNOWN_DISTRICT_CODE, false),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Check every numeric field against its physical range.
pub fn validate(reading: &SoilReading) -> Result<(), PredictError> {
    let values = [
        reading.n,
        reading.p,
        reading.k,
        reading.temperature,
        reading.humidity,
        reading.ph,
        reading.rainfall,
    ];
    for ((name, lo, hi), value) in FIELD_RANGES.iter().zip(values) {
        if !value.is_finite() || value < *lo || value > *hi {
            return Err(PredictError::InvalidInput(format!(
                "{name} must be between {lo} and {hi}, got {value}"
            )));
        }
    }
    Ok(())
}

/// Build the model's feature vector from a reading.
///
/// Column order is fixed: N, P, K, temperature, humidity, ph, rainfall,
/// followed by the encoded district when an encoder is configured.
///
/// Returns the vector plus an optional warning when the district had to
/// fall back to the unknown code. The fallback never fails the request.
pub fn assemble(
    reading: &SoilReading,
    encoder: Option<&DistrictEncoder>,
) -> Result<(Vec<f32>, Option<String>), PredictError> {
    validate(reading)?;

    let mut features = vec![
        reading.n,
        reading.p,
        reading.k,
        reading.temperature,
        reading.humidity,
        reading.ph,
        reading.rainfall,
    ];

    let mut warning = None;
    if let Some(encoder) = encoder {
        let code = match reading.district.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let (code, known) = encoder.encode(raw);
                if !known {
                    warning = Some(format!(
                        "district {:?} not recognised, using fallback code {}",
                        raw.trim(),
                        UNKNOWN_DISTRICT_CODE
                    ));
                }
                code
            }
            _ => {
                warning = Some(format!(
                    "district missing, using fallback code {UNKNOWN_DISTRICT_CODE}"
                ));
                UNKNOWN_DISTRICT_CODE
            }
        };
        features.push(code as f32);
    } else if reading.district.is_some() {
        tracing::debug!("district supplied but this deployment has no encoder, ignoring");
    }

    Ok((features, warning))
}
