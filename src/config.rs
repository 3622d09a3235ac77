use std::path::PathBuf;

/// Runtime settings, all environment-driven.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding scaler.json, forest.json and (optionally)
    /// districts.json.
    pub artifact_dir: PathBuf,
    pub port: u16,
    /// Number of crops to return. 1 switches to single-pick presentation.
    pub top_k: usize,
}

impl ServiceConfig {
    /// Reads ARTIFACT_DIR (default "artifacts"), PORT (default 8000) and
    /// TOP_K (default 5).
    pub fn from_env() -> Self {
        let artifact_dir = std::env::var("ARTIFACT_DIR")
            .unwrap_or_else(|_| "artifacts".to_string())
            .into();
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);
        let top_k = std::env::var("TOP_K")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        Self {
            artifact_dir,
            port,
            top_k,
        }
    }
}
