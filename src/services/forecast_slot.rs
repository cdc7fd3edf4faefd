//! Single-slot holder for the most recent forecast.
//!
//! Runs may overlap and finish in any order. Each run takes a token when it
//! is requested; a finished run only replaces the held result if its token
//! is newer, so a slow early request can never overwrite a later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::services::monte_carlo::{ForecastError, ForecastInputs, ForecastModel, run_monte_carlo};
use crate::services::simulation_types::{ForecastParams, ForecastReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug)]
struct Published<T> {
    token: RequestToken,
    value: T,
}

#[derive(Debug)]
pub struct ForecastSlot<T> {
    next_token: AtomicU64,
    latest: Mutex<Option<Published<T>>>,
}

impl<T> Default for ForecastSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ForecastSlot<T> {
    pub fn new() -> Self {
        Self {
            next_token: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.next_token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stores `value` unless a newer request already published. Returns
    /// whether the value was kept.
    pub fn publish(&self, token: RequestToken, value: T) -> bool {
        let mut latest = self.lock();
        if let Some(current) = latest.as_ref() {
            if current.token > token {
                warn!(stale = token.0, current = current.token.0, "discarding stale forecast");
                return false;
            }
        }
        debug!(token = token.0, "publishing forecast");
        *latest = Some(Published { token, value });
        true
    }

    pub fn latest_token(&self) -> Option<RequestToken> {
        self.lock().as_ref().map(|published| published.token)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Published<T>>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ForecastSlot<T> {
    pub fn latest(&self) -> Option<T> {
        self.lock().as_ref().map(|published| published.value.clone())
    }
}

/// Runs a forecast on a background thread and publishes its report to
/// `slot`. The handle yields whether the report was kept.
pub fn spawn_forecast(
    slot: Arc<ForecastSlot<ForecastReport>>,
    inputs: ForecastInputs,
    params: ForecastParams,
    model: ForecastModel,
) -> JoinHandle<Result<bool, ForecastError>> {
    let token = slot.begin();
    thread::spawn(move || {
        let output = run_monte_carlo(&inputs, &params, &model)?;
        Ok(slot.publish(token, output.report))
    })
}
