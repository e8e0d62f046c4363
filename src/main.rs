use ac_power_analyzer::{api, config, telemetry};
use anyhow::Result;
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let state = api::AppState::new(cfg.clone())?;
    let app = api::router(state);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0 - service will be accessible from the network");
    }

    info!(
        %addr,
        line_frequency_hz = cfg.engine.line_frequency_hz,
        waveform_mode = %cfg.engine.waveform_mode,
        phase_sequence = %cfg.engine.phase_sequence,
        "starting AC power analyzer"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
