use crate::domain::types::Zone;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration key {0}")]
    MissingKey(String),
    #[error("line {line} is not a KEY:VALUE pair: {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("{key} must list {expected} values, found {found}")]
    WrongRowLength {
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("tick duration must be positive, got {0}s")]
    NonPositiveTickDuration(i64),
    #[error("tick duration of {0}s does not divide one hour")]
    TickDoesNotDivideHour(u32),
    #[error("demand polynomial needs at least one coefficient")]
    EmptyCoefficients,
    #[error("target volume for route {origin}->{destination} must be positive, got {volume}")]
    NonPositiveVolume {
        origin: Zone,
        destination: Zone,
        volume: f64,
    },
    #[error("demand curve sums to zero, routes cannot be scaled")]
    ZeroDemand,
    #[error("start tick {start} is outside the day of {ticks_per_day} ticks")]
    StartTickOutOfRange { start: usize, ticks_per_day: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not read {path}: {source}")]
    ReadConfig {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
