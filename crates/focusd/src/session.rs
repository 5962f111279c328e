//! Session timing
//!
//! One bounded interval during which enforcement is active. Created when a
//! session starts, dropped when it ends; only the engine's atomic active
//! flag outlives it.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// One active focus session
#[derive(Debug, Clone)]
pub struct Session {
    /// When the session started
    pub started: DateTime<Utc>,
    /// When the session is due to end
    pub deadline: DateTime<Utc>,
}

impl Session {
    /// Start a session lasting `duration` from now
    pub fn begin(duration: Duration) -> Self {
        let started = Utc::now();
        let deadline = started + chrono::Duration::milliseconds(duration.as_millis() as i64);
        Self { started, deadline }
    }

    /// True once the deadline has passed
    pub fn expired(&self) -> bool {
        Utc::now() >= self.deadline
    }

    /// Time left until the deadline, zero once expired
    pub fn remaining(&self) -> Duration {
        self.deadline
            .signed_duration_since(Utc::now())
            .to_std()
            .unwrap_or_default()
    }

    /// Fractional minutes from the actual start until now
    pub fn elapsed_minutes(&self) -> f64 {
        let elapsed = Utc::now().signed_duration_since(self.started);
        elapsed.num_milliseconds().max(0) as f64 / 60_000.0
    }
}
