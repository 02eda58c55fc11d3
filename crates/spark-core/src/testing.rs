use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use spark_db::Database;
use spark_db::models::NewUser;
use uuid::Uuid;

use crate::{Core, ManualClock, Policy};

/// 10:00 on 2026-05-01 in Jakarta.
pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 3, 0, 0).unwrap()
}

pub fn core_with(policy: Policy) -> (Core, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(morning()));
    let db = Database::open_in_memory().unwrap();
    (Core::new(db, clock.clone(), policy), clock)
}

pub fn core() -> (Core, Arc<ManualClock>) {
    core_with(Policy::default())
}

pub fn user(core: &Core, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    core.db()
        .create_user(&NewUser {
            id: &id.to_string(),
            email: &format!("{}@example.com", name.to_lowercase()),
            password_hash: "hash",
            name,
            gender: "other",
            date_of_birth: "1998-01-01",
            verified: false,
        })
        .unwrap();
    id
}

pub fn users(core: &Core, prefix: &str, n: usize) -> Vec<Uuid> {
    (1..=n).map(|i| user(core, &format!("{prefix}{i}"))).collect()
}
