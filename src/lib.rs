//! Crop recommendation inference service.
//!
//! Scores a fixed set of candidate crops for a soil/weather reading using a
//! pre-trained random-forest classifier and returns a ranked shortlist with
//! confidence percentages. The pipeline per request is:
//! assemble features → apply fitted scaling → classifier forward → rank.
//!
//! All model artifacts (scaler parameters, forest, district encoder) are
//! loaded once at startup and shared read-only across requests.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod rank;
pub mod scaler;
pub mod server;
pub mod types;
