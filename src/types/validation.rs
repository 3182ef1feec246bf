//! Validation result types

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SustainabilityLevel {
    Excellent,
    Good,
    Moderate,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SustainabilityReport {
    pub is_sustainable: bool,
    pub level: SustainabilityLevel,
    /// 0-100, 15 points lost per warning.
    pub confidence: u32,
    pub checks_performed: u32,
    pub checks_passed: u32,
    pub warnings: Vec<String>,
}
