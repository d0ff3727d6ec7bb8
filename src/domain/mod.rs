pub mod error;
pub mod types;

pub use error::{ConfigError, FlowError};
pub use types::{FlowConfig, HourlySummary, Route, RouteMatrix, TickSchedule, Zone};
