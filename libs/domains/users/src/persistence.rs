use rand::Rng;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Durable save step run after a user is stored in memory
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceStep {
    fn save(&mut self, user: &User) -> UserResult<()>;
}

/// Stand-in for a database write that drops the connection at random
#[derive(Debug, Clone)]
pub struct SimulatedPersistence {
    failure_rate: f64,
}

impl SimulatedPersistence {
    /// `failure_rate` is clamped to [0, 1]; NaN disables failures
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl PersistenceStep for SimulatedPersistence {
    fn save(&mut self, user: &User) -> UserResult<()> {
        if rand::rng().random_bool(self.failure_rate) {
            return Err(UserError::Persistence(
                "lost connection to the database".to_string(),
            ));
        }

        tracing::debug!(user_id = user.id(), "Saved user");
        Ok(())
    }
}
