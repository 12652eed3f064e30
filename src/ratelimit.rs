//! Sliding-window admission control shared by every scan in the process

use crate::error::{Result, WebreconError};
use crate::models::LimiterConfig;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Admits at most `max_requests` units of work in any trailing `time_window`.
///
/// The limiter never waits: callers get an immediate yes or no. Rejected
/// attempts are not recorded, so they do not extend the lockout.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    time_window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `max_requests` per `time_window`
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        Self {
            max_requests,
            time_window,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Creates a limiter from configuration, rejecting an empty budget
    pub fn from_config(config: &LimiterConfig) -> Result<Self> {
        if config.max_requests == 0 || config.window_secs == 0 {
            return Err(WebreconError::ConfigError(
                "rate limiter needs a positive budget and window".to_string(),
            ));
        }
        Ok(Self::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
        ))
    }

    /// Checks the budget and records the request if it is admitted
    pub fn allow_request(&self) -> bool {
        self.allow_request_at(Instant::now())
    }

    pub(crate) fn allow_request_at(&self, now: Instant) -> bool {
        // Prune, check and record under one lock so two callers can never
        // both take the last slot.
        let mut timestamps = self.timestamps.lock();

        while let Some(&oldest) = timestamps.front() {
            if now.saturating_duration_since(oldest) >= self.time_window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() < self.max_requests {
            timestamps.push_back(now);
            true
        } else {
            debug!(
                "Admission rejected: {}/{} in the last {:?}",
                timestamps.len(),
                self.max_requests,
                self.time_window
            );
            false
        }
    }

    /// Number of admissions still inside the window
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        self.timestamps
            .lock()
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < self.time_window)
            .count()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn time_window(&self) -> Duration {
        self.time_window
    }
}
