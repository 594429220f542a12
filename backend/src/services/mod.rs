//! Business logic services for the crop stress backend

pub mod crop_cycle;
pub mod dashboard;

pub use crop_cycle::{CropCycleService, CropCycleStore, NewCropCycle};
pub use dashboard::{DashboardController, SessionContext, SessionRegistry, SubmissionOutcome};
