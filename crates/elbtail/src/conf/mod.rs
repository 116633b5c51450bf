//! Configuration for the elbtail binary.

mod load;
mod model;

pub use model::Config;
