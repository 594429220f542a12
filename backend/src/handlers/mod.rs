//! HTTP request handlers

pub mod crop_cycle;
pub mod health;
pub mod prediction;
pub mod season;
pub mod weather;

pub use crop_cycle::{
    acknowledge_dashboard, get_crop_cycle, get_dashboard_state, list_crop_cycles,
    submit_crop_cycle,
};
pub use health::health_check;
pub use prediction::predict_stress;
pub use season::{detect_season, list_seasons};
pub use weather::get_current_weather;
