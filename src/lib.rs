//! Earned value metrics and Monte Carlo cost forecasting for construction
//! and infrastructure projects.

pub mod domain;
pub mod services;

#[cfg(test)]
mod test_support;
