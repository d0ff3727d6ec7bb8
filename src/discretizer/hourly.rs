use tracing::info;

use crate::config::constant::HOURS_PER_DAY;
use crate::domain::{HourlySummary, RouteMatrix};

/// Sums a day of tick counts into 24 hourly windows.
///
/// Windows are `ticks / 24` long; ticks past the 24th window boundary land in
/// the last hour.
pub fn hourly_totals(counts: &[u64]) -> Vec<u64> {
    let window = (counts.len() / HOURS_PER_DAY).max(1);
    let mut hours = vec![0; HOURS_PER_DAY];
    for (tick, count) in counts.iter().enumerate() {
        hours[(tick / window).min(HOURS_PER_DAY - 1)] += count;
    }
    hours
}

/// Hourly series of the route with the largest daily total.
///
/// On a tie the earliest route in origin-major order wins.
pub fn busiest_route(counts: &RouteMatrix<u64>) -> Option<HourlySummary> {
    let mut best: Option<HourlySummary> = None;

    for (route, seq) in counts.routes() {
        let hourly = hourly_totals(seq);
        let total: u64 = hourly.iter().sum();
        if best.as_ref().map_or(true, |b| total > b.total) {
            best = Some(HourlySummary {
                route,
                hours: (0..HOURS_PER_DAY).collect(),
                counts: hourly,
                total,
            });
        }
    }

    if let Some(summary) = &best {
        info!(
            "Busiest route {} carries {} vehicles",
            summary.route, summary.total
        );
    }
    best
}
