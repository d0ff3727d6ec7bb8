use tracing::{debug, warn};

use crate::domain::{ConfigError, TickSchedule};

/// Converts per-hour coefficients (highest degree first) into per-tick ones.
///
/// The coefficient of degree `d` is divided by `ticks_per_hour^d`, so the
/// result can be evaluated directly at a tick index instead of at an hour.
pub fn scale_to_ticks(coefficients: &[f64], ticks_per_hour: usize) -> Vec<f64> {
    let degree = coefficients.len().saturating_sub(1);
    let base = ticks_per_hour as f64;
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c / base.powi((degree - i) as i32))
        .collect()
}

/// Horner evaluation, coefficients highest degree first.
pub fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Aggregate demand for every tick of the day.
///
/// Each value is rounded half-to-even. Negative values are kept as they are.
pub fn demand_curve(
    coefficients: &[f64],
    schedule: &TickSchedule,
) -> Result<Vec<f64>, ConfigError> {
    if coefficients.is_empty() {
        return Err(ConfigError::EmptyCoefficients);
    }

    let per_tick = scale_to_ticks(coefficients, schedule.ticks_per_hour);
    debug!("Per-tick coefficients: {:?}", per_tick);

    let curve: Vec<f64> = (0..schedule.ticks_per_day)
        .map(|tick| evaluate(&per_tick, tick as f64).round_ties_even())
        .collect();

    let negative = curve.iter().filter(|v| **v < 0.0).count();
    if negative > 0 {
        warn!(
            "Demand polynomial is negative at {} of {} ticks",
            negative,
            curve.len()
        );
    }

    debug!(
        "Demand curve: {} ticks, total {:.1}",
        curve.len(),
        curve.iter().sum::<f64>()
    );
    Ok(curve)
}
