//! Domain models for the Crop Stress Monitoring Platform

mod crop;
mod prediction;
mod stress;
mod weather;

pub use crop::*;
pub use prediction::*;
pub use stress::*;
pub use weather::*;
