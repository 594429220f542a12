//! Shared types and logic for the Crop Stress Monitoring Platform
//!
//! This crate contains the domain models and the pure scoring/validation
//! code shared between the backend, the prediction service and the
//! browser (via WASM).

pub mod dashboard;
pub mod models;
pub mod season;
pub mod stress;
pub mod types;
pub mod validation;

pub use dashboard::*;
pub use models::*;
pub use season::*;
pub use stress::*;
pub use types::*;
pub use validation::*;
