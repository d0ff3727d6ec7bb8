pub mod hourly;
pub mod residual;

pub use hourly::*;
pub use residual::*;
