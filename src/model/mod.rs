pub mod rate_model;
pub mod route_allocator;

pub use rate_model::demand_curve;
pub use route_allocator::allocate;
