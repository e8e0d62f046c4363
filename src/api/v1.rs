use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use super::error::ApiError;
use super::response::{success, ApiResponse};
use super::AppState;
use crate::{
    domain::{PhaseMeasurement, QuadrantLabel},
    engine::{PhaseSequence, SinglePhaseReport, ThreePhaseAnalysis, WaveformMode, WaveformSettings},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/quadrant", post(classify))
        .route("/power", post(single_phase))
        .route("/three-phase", post(three_phase))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct MeasurementRequest {
    #[validate(range(min = 0.0))]
    pub voltage_rms: f64,
    #[validate(range(min = 0.0))]
    pub current_rms: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub angle_deg: f64,
}

impl From<MeasurementRequest> for PhaseMeasurement {
    fn from(req: MeasurementRequest) -> Self {
        PhaseMeasurement {
            voltage_rms: req.voltage_rms,
            current_rms: req.current_rms,
            angle_deg: req.angle_deg,
        }
    }
}

/// Partial sampling settings; unset fields fall back to the engine defaults
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct WaveformRequest {
    pub line_frequency_hz: Option<f64>,
    pub cycles: Option<f64>,
    #[validate(range(min = 1))]
    pub sample_count: Option<usize>,
    pub mode: Option<WaveformMode>,
}

impl WaveformRequest {
    fn resolve(&self, defaults: WaveformSettings) -> WaveformSettings {
        WaveformSettings {
            line_frequency_hz: self.line_frequency_hz.unwrap_or(defaults.line_frequency_hz),
            cycles: self.cycles.unwrap_or(defaults.cycles),
            sample_count: self.sample_count.unwrap_or(defaults.sample_count),
            mode: self.mode.unwrap_or(defaults.mode),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PowerRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub measurement: MeasurementRequest,
    #[validate(range(min = 0.0))]
    pub hours: f64,
    #[validate(nested)]
    pub waveform: Option<WaveformRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ThreePhaseRequest {
    /// Measurements in R, Y, B order
    #[validate(length(equal = 3), nested)]
    pub phases: Vec<MeasurementRequest>,
    #[validate(range(min = 0.0))]
    pub hours: f64,
    pub sequence: Option<PhaseSequence>,
    #[serde(default)]
    pub include_waveforms: bool,
    /// Sampling overrides; sending them also turns on waveforms
    #[validate(nested)]
    pub waveform: Option<WaveformRequest>,
}

impl ThreePhaseRequest {
    pub fn wants_waveforms(&self) -> bool {
        self.include_waveforms || self.waveform.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct QuadrantRequest {
    pub angle_deg: f64,
}

#[derive(Debug, Serialize)]
pub struct QuadrantResponse {
    pub angle_deg: f64,
    pub quadrant: QuadrantLabel,
    pub number: Option<u8>,
    pub description: &'static str,
}

/// POST /api/v1/quadrant
pub async fn classify(Json(req): Json<QuadrantRequest>) -> ApiResponse<QuadrantResponse> {
    let quadrant = QuadrantLabel::classify(req.angle_deg);
    success(QuadrantResponse {
        angle_deg: req.angle_deg,
        quadrant,
        number: quadrant.number(),
        description: quadrant.description(),
    })
}

/// POST /api/v1/power
pub async fn single_phase(
    State(st): State<AppState>,
    Json(req): Json<PowerRequest>,
) -> Result<ApiResponse<SinglePhaseReport>, ApiError> {
    let start = Instant::now();
    req.validate()?;

    let settings = req.waveform.unwrap_or_default().resolve(st.engine.waveform);
    st.check_sample_count(&settings)?;

    let measurement = PhaseMeasurement::from(req.measurement);
    let report = st
        .engine
        .analyze_single(&measurement, req.hours, Some(settings))?;

    tracing::debug!(
        %measurement,
        quadrant = %report.power.quadrant,
        active_w = report.power.active_w,
        "single-phase analysis"
    );

    Ok(success(report).with_duration(start.elapsed().as_millis() as u64))
}

/// POST /api/v1/three-phase
pub async fn three_phase(
    State(st): State<AppState>,
    Json(req): Json<ThreePhaseRequest>,
) -> Result<ApiResponse<ThreePhaseAnalysis>, ApiError> {
    let start = Instant::now();
    req.validate()?;

    let phases: [PhaseMeasurement; 3] = match req.phases.as_slice() {
        [r, y, b] => [(*r).into(), (*y).into(), (*b).into()],
        _ => {
            return Err(ApiError::ValidationError(
                "phases: exactly three measurements (R, Y, B) are required".to_string(),
            ))
        }
    };

    let mut system = st.engine.system(phases);
    if let Some(sequence) = req.sequence {
        system = system.with_sequence(sequence);
    }

    let waveform = if req.wants_waveforms() {
        let settings = req.waveform.unwrap_or_default().resolve(st.engine.waveform);
        st.check_sample_count(&settings)?;
        Some(settings)
    } else {
        None
    };

    let analysis = st.engine.analyze_three_phase(&system, req.hours, waveform)?;

    tracing::debug!(
        total_active_w = analysis.report.totals.active_w,
        sequence = %system.sequence,
        waveforms = waveform.is_some(),
        "three-phase analysis"
    );

    Ok(success(analysis).with_duration(start.elapsed().as_millis() as u64))
}
