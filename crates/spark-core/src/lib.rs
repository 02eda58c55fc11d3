//! Swipe, match and premium rules for Spark.
//!
//! [`Core`] owns the database handle, the clock and the [`Policy`]; the
//! operations live in their own modules as `impl Core` blocks. Everything
//! here is synchronous rusqlite work, so async callers should run it on
//! `spawn_blocking`.

pub mod clock;
pub mod error;
pub mod matches;
pub mod policy;
pub mod quota;
pub mod scheduler;
pub mod subscription;
pub mod swipe;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use spark_db::Database;

pub use clock::{Clock, DayWindow, ManualClock, SystemClock};
pub use error::CoreError;
pub use policy::{DuplicateScope, Policy, ResetScope};
pub use quota::ResetReport;

pub struct Core {
    db: Database,
    clock: Arc<dyn Clock>,
    policy: Policy,
}

impl Core {
    pub fn new(db: Database, clock: Arc<dyn Clock>, policy: Policy) -> Self {
        Self { db, clock, policy }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// The current calendar day in the reference timezone.
    pub fn today(&self) -> DayWindow {
        DayWindow::containing(self.clock.now(), self.policy.timezone)
    }
}
