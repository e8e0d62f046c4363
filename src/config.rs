use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::engine::{PhaseSequence, PowerEngine, WaveformMode, WaveformSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 10,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub line_frequency_hz: f64,
    pub cycles: f64,
    pub sample_count: usize,
    pub waveform_mode: WaveformMode,
    pub phase_sequence: PhaseSequence,
    /// Upper bound on `sample_count` accepted from API requests
    pub max_sample_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let waveform = WaveformSettings::default();
        Self {
            line_frequency_hz: waveform.line_frequency_hz,
            cycles: waveform.cycles,
            sample_count: waveform.sample_count,
            waveform_mode: waveform.mode,
            phase_sequence: PhaseSequence::default(),
            max_sample_count: 100_000,
        }
    }
}

impl EngineConfig {
    pub fn waveform_settings(&self) -> WaveformSettings {
        WaveformSettings {
            line_frequency_hz: self.line_frequency_hz,
            cycles: self.cycles,
            sample_count: self.sample_count,
            mode: self.waveform_mode,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.waveform_settings().validate()?;
        if self.sample_count > self.max_sample_count {
            anyhow::bail!(
                "engine.sample_count ({}) exceeds engine.max_sample_count ({})",
                self.sample_count,
                self.max_sample_count
            );
        }
        Ok(())
    }

    pub fn build_engine(&self) -> Result<PowerEngine> {
        self.validate()?;
        Ok(PowerEngine::new(self.waveform_settings(), self.phase_sequence)?)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("ACPA__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.engine.validate()?;
        Ok(cfg)
    }
}
