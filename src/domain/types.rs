use std::fmt;

use itertools::iproduct;
use serde::Serialize;

use crate::config::constant::{HOURS_PER_DAY, SECONDS_PER_HOUR, ZONE_COUNT};
use crate::domain::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Zone(usize);

impl Zone {
    /// Returns `None` for indices outside the four-zone space.
    pub fn new(index: usize) -> Option<Zone> {
        (index < ZONE_COUNT).then_some(Zone(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Zone> + Clone {
        (0..ZONE_COUNT).map(Zone)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed pair of distinct zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Route {
    pub origin: Zone,
    pub destination: Zone,
}

impl Route {
    /// Self-pairs are not routes.
    pub fn new(origin: Zone, destination: Zone) -> Option<Route> {
        (origin != destination).then_some(Route {
            origin,
            destination,
        })
    }

    /// All 12 routes, origin-major.
    pub fn all() -> impl Iterator<Item = Route> {
        iproduct!(Zone::all(), Zone::all()).filter_map(|(o, d)| Route::new(o, d))
    }

    /// Position of this route in `Route::all()`.
    pub fn index(self) -> usize {
        let o = self.origin.index();
        let d = self.destination.index();
        o * (ZONE_COUNT - 1) + if d > o { d - 1 } else { d }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}

/// Per-tick sequences for every route of the 4x4 zone space.
///
/// Diagonal cells never hold data; `value_at` is the one place that turns
/// them into zeros for consumers that want a dense view.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatrix<T> {
    cells: [[Option<Vec<T>>; ZONE_COUNT]; ZONE_COUNT],
    ticks: usize,
}

impl<T> RouteMatrix<T> {
    pub fn try_from_routes<E>(
        ticks: usize,
        mut build: impl FnMut(Route) -> Result<Vec<T>, E>,
    ) -> Result<Self, E> {
        Ok(Self::from_pairs(
            ticks,
            Route::all()
                .map(|route| build(route).map(|seq| (route, seq)))
                .collect::<Result<Vec<_>, E>>()?,
        ))
    }

    pub fn from_pairs(ticks: usize, pairs: impl IntoIterator<Item = (Route, Vec<T>)>) -> Self {
        let mut cells: [[Option<Vec<T>>; ZONE_COUNT]; ZONE_COUNT] = Default::default();
        for (route, seq) in pairs {
            debug_assert_eq!(seq.len(), ticks, "route {} has wrong length", route);
            cells[route.origin.index()][route.destination.index()] = Some(seq);
        }
        RouteMatrix { cells, ticks }
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn route(&self, route: Route) -> Option<&[T]> {
        self.cells[route.origin.index()][route.destination.index()].as_deref()
    }

    pub fn routes(&self) -> impl Iterator<Item = (Route, &[T])> + '_ {
        Route::all().filter_map(move |route| self.route(route).map(|seq| (route, seq)))
    }
}

impl<T: Copy + Default> RouteMatrix<T> {
    pub fn value_at(&self, origin: Zone, destination: Zone, tick: usize) -> T {
        Route::new(origin, destination)
            .and_then(|route| self.route(route))
            .and_then(|seq| seq.get(tick).copied())
            .unwrap_or_default()
    }

    /// One tick flattened row-major, diagonal reported as zero.
    pub fn row(&self, tick: usize) -> Vec<T> {
        iproduct!(Zone::all(), Zone::all())
            .map(|(o, d)| self.value_at(o, d, tick))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub seconds_per_tick: u32,
    pub ticks_per_hour: usize,
    pub ticks_per_day: usize,
}

impl TickSchedule {
    pub fn from_seconds(seconds_per_tick: u32) -> Result<Self, ConfigError> {
        if seconds_per_tick == 0 {
            return Err(ConfigError::NonPositiveTickDuration(0));
        }
        if SECONDS_PER_HOUR % seconds_per_tick != 0 {
            return Err(ConfigError::TickDoesNotDivideHour(seconds_per_tick));
        }
        let ticks_per_hour = (SECONDS_PER_HOUR / seconds_per_tick) as usize;
        Ok(TickSchedule {
            seconds_per_tick,
            ticks_per_hour,
            ticks_per_day: ticks_per_hour * HOURS_PER_DAY,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub seconds_per_tick: u32,
    /// Per-hour polynomial coefficients, highest degree first.
    pub coefficients: Vec<f64>,
    /// Target daily volume per route; the diagonal is never read.
    pub target_volumes: [[f64; ZONE_COUNT]; ZONE_COUNT],
    pub output_file: String,
    pub seed: Option<u64>,
    pub start_tick: usize,
    pub parallel: bool,
}

impl FlowConfig {
    pub fn schedule(&self) -> Result<TickSchedule, ConfigError> {
        TickSchedule::from_seconds(self.seconds_per_tick)
    }

    pub fn target_volume(&self, route: Route) -> f64 {
        self.target_volumes[route.origin.index()][route.destination.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlySummary {
    pub route: Route,
    pub hours: Vec<usize>,
    pub counts: Vec<u64>,
    pub total: u64,
}
