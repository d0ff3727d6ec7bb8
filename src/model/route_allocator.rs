use tracing::{debug, info};

use crate::domain::{ConfigError, FlowConfig, Route, RouteMatrix};

/// Checks every off-diagonal target before anything is scaled.
pub fn validate_targets(config: &FlowConfig) -> Result<(), ConfigError> {
    for route in Route::all() {
        let volume = config.target_volume(route);
        if !(volume.is_finite() && volume > 0.0) {
            return Err(ConfigError::NonPositiveVolume {
                origin: route.origin,
                destination: route.destination,
                volume,
            });
        }
    }
    Ok(())
}

/// Spreads the demand curve over all 12 routes.
///
/// Every route keeps the curve's shape, rescaled so that its daily sum equals
/// the route's target volume.
pub fn allocate(curve: &[f64], config: &FlowConfig) -> Result<RouteMatrix<f64>, ConfigError> {
    validate_targets(config)?;

    let total: f64 = curve.iter().sum();
    if total == 0.0 {
        return Err(ConfigError::ZeroDemand);
    }

    let rates = RouteMatrix::try_from_routes(curve.len(), |route| {
        let divisor = total / config.target_volume(route);
        debug!("Route {} divisor {:.4}", route, divisor);
        Ok::<_, ConfigError>(curve.iter().map(|v| v / divisor).collect())
    })?;

    info!(
        "Allocated demand total {:.1} across {} routes",
        total,
        rates.routes().count()
    );
    Ok(rates)
}
