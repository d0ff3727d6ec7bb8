use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::constant::ZONE_COUNT;
use crate::domain::{ConfigError, FlowConfig, FlowError, TickSchedule};

const SECONDS_PER_TICK: &str = "SECONDS_PER_TICK";
const EQUATION: &str = "EQUATION";
const FLOW_DATA: &str = "FLOW_DATA";
const SEED: &str = "SEED";
const START_TICK: &str = "START_TICK";
const PARALLEL: &str = "PARALLEL";

/// Reads and parses a `KEY:VALUE` configuration file.
pub fn load_config(path: &Path) -> Result<FlowConfig, FlowError> {
    let text = fs::read_to_string(path).map_err(|source| FlowError::ReadConfig {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_config(&text)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<FlowConfig, ConfigError> {
    let mut entries: HashMap<String, String> = HashMap::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            })?;
        entries.insert(key.trim().to_string(), value.trim().to_string());
    }
    debug!("Configuration keys: {:?}", entries.keys().collect::<Vec<_>>());

    let seconds_per_tick = parse_tick_seconds(required(&entries, SECONDS_PER_TICK)?)?;
    TickSchedule::from_seconds(seconds_per_tick)?;

    let coefficients = parse_coefficients(required(&entries, EQUATION)?)?;

    let mut target_volumes = [[0.0; ZONE_COUNT]; ZONE_COUNT];
    for (origin, row) in target_volumes.iter_mut().enumerate() {
        let key = format!("FLOW_{}", origin);
        *row = parse_volume_row(&key, required(&entries, &key)?, origin)?;
    }

    let output_file = required(&entries, FLOW_DATA)?.to_string();
    let seed = optional(&entries, SEED)?;
    let start_tick = optional(&entries, START_TICK)?.unwrap_or(0);
    let parallel = optional(&entries, PARALLEL)?.unwrap_or(false);

    Ok(FlowConfig {
        seconds_per_tick,
        coefficients,
        target_volumes,
        output_file,
        seed,
        start_tick,
        parallel,
    })
}

fn required<'a>(entries: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ConfigError> {
    entries
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
}

fn optional<T: FromStr>(
    entries: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    entries
        .get(key)
        .map(|value| parse_value(key, value))
        .transpose()
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_finite(key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = parse_value(key, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn parse_tick_seconds(value: &str) -> Result<u32, ConfigError> {
    let seconds: i64 = parse_value(SECONDS_PER_TICK, value)?;
    if seconds <= 0 {
        return Err(ConfigError::NonPositiveTickDuration(seconds));
    }
    u32::try_from(seconds).map_err(|_| ConfigError::InvalidValue {
        key: SECONDS_PER_TICK.to_string(),
        value: value.to_string(),
    })
}

fn parse_coefficients(value: &str) -> Result<Vec<f64>, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyCoefficients);
    }
    value.split(',').map(|c| parse_finite(EQUATION, c)).collect()
}

/// The diagonal entry is never used and may hold anything.
fn parse_volume_row(key: &str, value: &str, origin: usize) -> Result<[f64; ZONE_COUNT], ConfigError> {
    let fields: Vec<&str> = value.split(',').collect();
    if fields.len() != ZONE_COUNT {
        return Err(ConfigError::WrongRowLength {
            key: key.to_string(),
            expected: ZONE_COUNT,
            found: fields.len(),
        });
    }

    let mut row = [0.0; ZONE_COUNT];
    for (destination, field) in fields.iter().enumerate() {
        if destination != origin {
            row[destination] = parse_finite(key, field)?;
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SECONDS_PER_TICK:300
EQUATION:0.1,-3.5,30,10
FLOW_0:0,1000,2000,3000
FLOW_1:1000,x,1000,1000
FLOW_2:500, 600 ,0,700
FLOW_3:1,2,3,-
FLOW_DATA:flow_data.csv
";

    #[test]
    fn test_parses_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.seconds_per_tick, 300);
        assert_eq!(config.coefficients, vec![0.1, -3.5, 30.0, 10.0]);
        assert_eq!(config.target_volumes[0], [0.0, 1000.0, 2000.0, 3000.0]);
        assert_eq!(config.target_volumes[1], [1000.0, 0.0, 1000.0, 1000.0]);
        assert_eq!(config.target_volumes[2], [500.0, 600.0, 0.0, 700.0]);
        assert_eq!(config.target_volumes[3], [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(config.output_file, "flow_data.csv");
        assert_eq!(config.seed, None);
        assert_eq!(config.start_tick, 0);
        assert!(!config.parallel);
    }

    #[test]
    fn test_optional_keys_and_comments() {
        let text = format!("# demo\n\n{}SEED:9\nSTART_TICK:12\nPARALLEL:true\n", SAMPLE);
        let config = parse_config(&text).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.start_tick, 12);
        assert!(config.parallel);
    }

    #[test]
    fn test_missing_key() {
        let text = SAMPLE.replace("FLOW_DATA:flow_data.csv\n", "");
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::MissingKey(key)) if key == "FLOW_DATA"
        ));
    }

    #[test]
    fn test_malformed_line() {
        let text = format!("{}oops\n", SAMPLE);
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::MalformedLine { line: 8, .. })
        ));
    }

    #[test]
    fn test_bad_tick_durations() {
        let zero = SAMPLE.replace("SECONDS_PER_TICK:300", "SECONDS_PER_TICK:0");
        assert!(matches!(
            parse_config(&zero),
            Err(ConfigError::NonPositiveTickDuration(0))
        ));
        let negative = SAMPLE.replace("SECONDS_PER_TICK:300", "SECONDS_PER_TICK:-60");
        assert!(matches!(
            parse_config(&negative),
            Err(ConfigError::NonPositiveTickDuration(-60))
        ));
        let uneven = SAMPLE.replace("SECONDS_PER_TICK:300", "SECONDS_PER_TICK:7");
        assert!(matches!(
            parse_config(&uneven),
            Err(ConfigError::TickDoesNotDivideHour(7))
        ));
    }

    #[test]
    fn test_empty_equation() {
        let text = SAMPLE.replace("EQUATION:0.1,-3.5,30,10", "EQUATION:");
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::EmptyCoefficients)
        ));
    }

    #[test]
    fn test_short_flow_row() {
        let text = SAMPLE.replace("FLOW_2:500, 600 ,0,700", "FLOW_2:500,600");
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::WrongRowLength { found: 2, .. })
        ));
    }

    #[test]
    fn test_non_numeric_volume() {
        let text = SAMPLE.replace("FLOW_0:0,1000,2000,3000", "FLOW_0:0,lots,2000,3000");
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::InvalidValue { key, .. }) if key == "FLOW_0"
        ));
    }
}
