use colored::*;

use crate::domain::HourlySummary;

const BAR_WIDTH: usize = 40;

fn bar_length(count: u64, peak: u64) -> usize {
    if peak == 0 {
        return 0;
    }
    ((count as f64 / peak as f64) * BAR_WIDTH as f64).round() as usize
}

/// Text rendering of the busiest route's day, peak hour highlighted.
pub fn render_hourly_chart(summary: &HourlySummary) -> Vec<String> {
    let peak = summary.counts.iter().copied().max().unwrap_or(0);

    let mut lines = vec![format!(
        "Hour - vehicles on route {} ({} total)",
        summary.route, summary.total
    )];
    for (hour, count) in summary.hours.iter().zip(&summary.counts) {
        let bar = "#".repeat(bar_length(*count, peak));
        let bar = if *count == peak && peak > 0 {
            bar.red().to_string()
        } else {
            bar.green().to_string()
        };
        lines.push(format!("{:>2} | {:<6} {}", hour, count, bar));
    }
    lines
}

pub fn print_hourly_chart(summary: &HourlySummary) {
    for line in render_hourly_chart(summary) {
        println!("{}", line);
    }
}
