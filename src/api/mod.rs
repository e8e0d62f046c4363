pub mod error;
pub mod response;
pub mod v1;

use axum::{http::StatusCode, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::Config,
    engine::{PowerEngine, WaveformSettings},
};

use self::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub engine: PowerEngine,
}

impl AppState {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let engine = cfg.engine.build_engine()?;
        Ok(Self { cfg, engine })
    }

    /// Reject sampling requests above the configured cap
    pub fn check_sample_count(&self, settings: &WaveformSettings) -> Result<(), ApiError> {
        let max = self.cfg.engine.max_sample_count;
        if settings.sample_count > max {
            return Err(ApiError::ValidationError(format!(
                "sample_count: {} exceeds the maximum of {}",
                settings.sample_count, max
            )));
        }
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    let cfg = state.cfg.clone();
    let mut router = Router::new().nest("/api/v1", v1::router(state));

    if cfg.server.enable_cors {
        use tower_http::cors::Any;
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}

/// Router with default configuration, for embedding and tests
pub fn default_router() -> anyhow::Result<Router> {
    Ok(router(AppState::new(Config::default())?))
}
