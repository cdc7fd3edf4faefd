pub mod analysis_service;
pub mod evm;
pub mod forecast_slot;
pub mod histogram;
pub mod monte_carlo;
pub mod percentiles;
pub mod project_yaml;
pub mod s_curve;
pub mod schedule_health;
pub mod simulation_types;
