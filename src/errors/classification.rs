//! Error classification: stable failure labels and the startup wrapper

use super::AnalysisError;

impl AnalysisError {
    /// Stable label used for failure counts and output markers.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidPrice { .. } => "invalid_price",
            AnalysisError::UnknownMarket { .. } => "unknown_market",
            AnalysisError::DivisionUndefined { .. } => "division_undefined",
            AnalysisError::NoViableRoute { .. } => "no_viable_route",
            AnalysisError::InsufficientHistory { .. } => "insufficient_history",
            AnalysisError::InvalidWeightConfiguration { .. } => "invalid_weight_configuration",
            AnalysisError::Input { .. } => "malformed_input",
        }
    }
}

/// Raised while building configuration, before any product is processed.
/// The same variant means a per-product failure when it comes from a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Configuration rejected: {0}")]
pub struct StartupError(pub AnalysisError);

impl StartupError {
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }
}

impl From<AnalysisError> for StartupError {
    fn from(error: AnalysisError) -> Self {
        StartupError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = AnalysisError::InvalidWeightConfiguration { reason: "sum 0.9".into() };
        assert_eq!(err.kind(), "invalid_weight_configuration");
        assert_eq!(AnalysisError::Input { context: "x".into() }.kind(), "malformed_input");
    }

    #[test]
    fn record_errors_render_their_cause() {
        let err = AnalysisError::DivisionUndefined { quantity: "roi" };
        assert_eq!(err.kind(), "division_undefined");
        assert_eq!(err.to_string(), "Division undefined: roi has a zero denominator");
    }

    #[test]
    fn startup_wrapper_keeps_the_cause() {
        let err = StartupError::from(AnalysisError::UnknownMarket { code: "XX".into() });
        assert_eq!(err.kind(), "unknown_market");
        assert_eq!(err.to_string(), "Configuration rejected: Unknown market: XX");
    }
}
