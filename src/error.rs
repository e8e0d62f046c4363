use thiserror::Error;

/// Errors returned by the power engine.
///
/// The engine is pure: the only failure mode is an input outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid argument `{name}` = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        tracing::debug!(argument = name, value, reason, "rejected engine input");
        Self::InvalidArgument {
            name,
            value,
            reason,
        }
    }

    /// Name of the offending argument
    pub fn argument(&self) -> &'static str {
        match self {
            Self::InvalidArgument { name, .. } => name,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject NaN/inf.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    Ok(value)
}

/// Reject NaN/inf and negative values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(name, value, "must not be negative"));
    }
    Ok(value)
}

/// Reject NaN/inf, zero and negative values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(name, value, "must be positive"));
    }
    Ok(value)
}
