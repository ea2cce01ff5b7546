use serde::Serialize;

/// One simulated year of the lifetime earnings projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStep {
    /// 1-based year of the projection
    pub year: u32,
    pub step: String,
    pub annual_a: f64,
    pub annual_b: f64,
    /// `annual_a - annual_b`
    pub annual_delta: f64,
    pub cumulative_a: f64,
    pub cumulative_b: f64,
    /// `cumulative_a - cumulative_b`
    pub cumulative_delta: f64,
}
