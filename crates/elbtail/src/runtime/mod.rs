//! Runtime — boot (logging + config) and the main run loop.

pub mod boot;
pub mod run;
