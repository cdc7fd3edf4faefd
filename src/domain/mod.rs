pub mod activity;
pub mod bottleneck;
pub mod budget;
pub mod project;
pub mod resources;
pub mod risk;
