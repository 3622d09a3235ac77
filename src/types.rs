use serde::{Deserialize, Serialize};

/// One soil/weather reading as posted to `/predict`.
///
/// The numeric keys match the sensor sheet column names, hence the
/// uppercase N/P/K on the wire. `district` is only meaningful in
/// deployments that were trained with a district column.
#[derive(Debug, Clone, Deserialize)]
pub struct SoilReading {
    #[serde(rename = "N")]
    pub n: f32,
    #[serde(rename = "P")]
    pub p: f32,
    #[serde(rename = "K")]
    pub k: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub ph: f32,
    pub rainfall: f32,
    #[serde(default)]
    pub district: Option<String>,
}

/// One ranked crop suggestion. `confidence` is a percentage in [0, 100]
/// rounded to two decimals; `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub crop: String,
    pub confidence: f64,
    pub rank: usize,
}

/// Success body for `/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub recommendations: Vec<Recommendation>,
    pub soil_status: String,
    /// Flat single-pick surface, populated only when one crop is returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PredictResponse {
    pub fn new(
        recommendations: Vec<Recommendation>,
        soil_status: &str,
        warning: Option<String>,
    ) -> Self {
        let (recommended_crop, confidence_score) = match recommendations.as_slice() {
            [only] => (
                Some(only.crop.clone()),
                Some(format!("{:.2}%", only.confidence)),
            ),
            _ => (None, None),
        };
        Self {
            recommendations,
            soil_status: soil_status.to_string(),
            recommended_crop,
            confidence_score,
            warnings: warning.into_iter().collect(),
        }
    }
}
