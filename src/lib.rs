pub mod config;
pub mod discretizer;
pub mod domain;
pub mod generator;
pub mod model;
pub mod output;
pub mod setup;
pub mod utils;
