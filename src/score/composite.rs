use crate::error::{FilmPulseError, Result};
use crate::types::scoring::{DiscoverabilityBreakdown, Weights};
use serde::Serialize;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
/// Points are snapped to this grid before rounding so that float noise
/// cannot move a value off an exact half point.
const POINT_GRID: f64 = 1e6;

/// Fails when the weights no longer sum to 1.0 or any weight leaves [0, 1].
pub fn check_weights(weights: &Weights) -> Result<()> {
    let values = [
        weights.audience_match,
        weights.buzz_score,
        weights.competition_index,
        weights.budget_efficiency,
        weights.release_timing,
    ];
    if values.iter().any(|weight| !(0.0..=1.0).contains(weight)) {
        return Err(FilmPulseError::InternalCompute(
            "discoverability weights must be between 0.0 and 1.0".to_string(),
        ));
    }
    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(FilmPulseError::InternalCompute(format!(
            "discoverability weights must sum to 1.0 (found {sum:.6})"
        )));
    }
    Ok(())
}

/// `round(100 * sum(weight * subscore))`, clamped to 0..=100. Half points
/// round to the even neighbour, so 76.5 gives 76 and 63.5 gives 64.
pub fn composite_score(breakdown: &DiscoverabilityBreakdown, weights: &Weights) -> u8 {
    let raw: f64 = breakdown
        .components(weights)
        .iter()
        .map(|(_, value, weight)| weight * value.clamp(0.0, 1.0))
        .sum();
    let points = (raw * 100.0 * POINT_GRID).round() / POINT_GRID;
    points.round_ties_even().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    pub name: &'static str,
    pub weight_pct: u8,
    pub raw: f64,
    /// Points contributed to the 0-100 composite.
    pub weighted: f64,
}

pub fn contributions(breakdown: &DiscoverabilityBreakdown, weights: &Weights) -> Vec<Contribution> {
    breakdown
        .components(weights)
        .into_iter()
        .map(|(name, value, weight)| Contribution {
            name,
            weight_pct: (weight * 100.0).round() as u8,
            raw: value,
            weighted: weight * value * 100.0,
        })
        .collect()
}
