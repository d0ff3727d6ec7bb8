use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::domain::{ConfigError, Route, RouteMatrix};
use crate::utils::route_rng;

/// Rounding error carried from one tick to the next for a single route.
#[derive(Debug, Clone, Default)]
pub struct ResidualCarry {
    residual: f64,
}

impl ResidualCarry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Adds one tick of continuous flow and returns the whole vehicles released.
    ///
    /// A negative residual releases nothing and is carried as is. Otherwise the
    /// whole part is released and the fraction is settled by one coin flip
    /// that comes up with probability equal to the fraction.
    pub fn step<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) -> u64 {
        self.residual += rate;

        if self.residual < 0.0 {
            return 0;
        }

        let whole = self.residual.floor();
        self.residual -= whole;
        let mut count = whole as u64;

        if self.residual > 0.0 && rng.gen_bool(self.residual) {
            self.residual -= 1.0;
            count += 1;
        }

        count
    }
}

/// Discretizes one route. Ticks before `start_tick` release nothing.
pub fn discretize_route<R: Rng + ?Sized>(rates: &[f64], start_tick: usize, rng: &mut R) -> Vec<u64> {
    let mut carry = ResidualCarry::new();
    let mut counts = vec![0; rates.len()];

    for (tick, rate) in rates.iter().enumerate().skip(start_tick) {
        counts[tick] = carry.step(*rate, rng);
    }

    trace!("Final residual {:.4}", carry.residual());
    counts
}

fn check_start(rates: &RouteMatrix<f64>, start_tick: usize) -> Result<(), ConfigError> {
    if start_tick >= rates.ticks() {
        return Err(ConfigError::StartTickOutOfRange {
            start: start_tick,
            ticks_per_day: rates.ticks(),
        });
    }
    Ok(())
}

/// Discretizes every route with one shared random source, routes in
/// origin-major order.
pub fn discretize_routes<R: Rng + ?Sized>(
    rates: &RouteMatrix<f64>,
    start_tick: usize,
    rng: &mut R,
) -> Result<RouteMatrix<u64>, ConfigError> {
    check_start(rates, start_tick)?;

    let counts = RouteMatrix::try_from_routes(rates.ticks(), |route| {
        let seq = rates.route(route).unwrap_or_default();
        let counts = discretize_route(seq, start_tick, &mut *rng);
        debug!("Route {} released {} vehicles", route, counts.iter().sum::<u64>());
        Ok::<_, ConfigError>(counts)
    })?;

    info!("Discretized {} routes sequentially", counts.routes().count());
    Ok(counts)
}

/// Discretizes routes on the rayon pool.
///
/// Each route draws from its own ChaCha stream derived from `seed`, so the
/// result does not depend on scheduling.
pub fn discretize_routes_parallel(
    rates: &RouteMatrix<f64>,
    start_tick: usize,
    seed: u64,
) -> Result<RouteMatrix<u64>, ConfigError> {
    check_start(rates, start_tick)?;

    let routes: Vec<Route> = Route::all().collect();
    let pairs: Vec<(Route, Vec<u64>)> = routes
        .par_iter()
        .map(|route| {
            let mut rng: ChaCha8Rng = route_rng(seed, *route);
            let seq = rates.route(*route).unwrap_or_default();
            (*route, discretize_route(seq, start_tick, &mut rng))
        })
        .collect();

    info!("Discretized {} routes in parallel", pairs.len());
    Ok(RouteMatrix::from_pairs(rates.ticks(), pairs))
}
