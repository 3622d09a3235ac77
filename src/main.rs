use crop_predictor::artifacts::ArtifactSet;
use crop_predictor::config::ServiceConfig;
use crop_predictor::server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = ServiceConfig::from_env();

    // A directory that fails to load leaves the service up but answering
    // 503; artifacts that load but disagree on schema abort startup.
    let artifacts = match ArtifactSet::load(&cfg.artifact_dir) {
        Ok(set) => {
            set.check_schema()?;
            if cfg.top_k == 0 || cfg.top_k > set.forest.classes.len() {
                anyhow::bail!(
                    "TOP_K={} out of range for {} crop classes",
                    cfg.top_k,
                    set.forest.classes.len()
                );
            }

            // Warmup forward pass; surfaces artifact faults before serving.
            let zeros = vec![0.0; set.n_features()];
            let scaled = set.scaler.transform(&zeros)?;
            set.forest.predict_proba(&scaled)?;
            tracing::info!("warmup forward ok");

            tracing::info!(
                "loaded artifacts: {} trees (max depth {}), {} classes, {} features, district encoder: {}",
                set.forest.trees.len(),
                set.forest.max_depth(),
                set.forest.classes.len(),
                set.n_features(),
                set.districts.is_some(),
            );
            Some(set)
        }
        Err(e) => {
            tracing::error!(
                "failed to load artifacts from {}: {e:#}; serving unavailable",
                cfg.artifact_dir.display()
            );
            None
        }
    };

    let state = AppState::new(artifacts, cfg.top_k);
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
