use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info, warn};

use crate::Core;
use crate::clock::next_day_start;

/// Background task that resets swipe quotas at every local midnight of the
/// reference timezone. Never returns; spawn it with `tokio::spawn`.
pub async fn run_reset_loop(core: Arc<Core>) {
    let tz = core.policy().timezone;

    loop {
        let now = core.clock().now();
        let wait = until_next_reset(now, tz);
        info!("Next quota reset in {}s ({})", wait.as_secs(), tz);
        tokio::time::sleep(wait).await;

        let worker = core.clone();
        match tokio::task::spawn_blocking(move || worker.reset_daily_quotas()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Quota reset error: {}", e),
            Err(e) => error!("spawn_blocking join error: {}", e),
        }
    }
}

/// Time from `now` to the next 00:00 in `tz`.
pub fn until_next_reset(now: DateTime<Utc>, tz: Tz) -> Duration {
    (next_day_start(now, tz) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use spark_db::queries::daily_limits;
    use spark_types::models::SwipeType::Like;

    use super::*;
    use crate::testing;

    #[test]
    fn test_until_next_reset() {
        let tz = chrono_tz::Asia::Jakarta;
        // 23:30 local
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 16, 30, 0).unwrap();
        assert_eq!(until_next_reset(now, tz), Duration::from_secs(30 * 60));
        // exactly midnight waits a full day, not zero
        let midnight = Utc.with_ymd_and_hms(2026, 5, 1, 17, 0, 0).unwrap();
        assert_eq!(until_next_reset(midnight, tz), Duration::from_secs(24 * 3600));
    }

    #[tokio::test]
    async fn test_reset_loop_zeroes_counters_at_midnight() {
        let (core, clock) = testing::core();
        // 23:59:59.8 in Jakarta
        clock.set(Utc.with_ymd_and_hms(2026, 5, 1, 16, 59, 59).unwrap() + chrono::Duration::milliseconds(800));
        let u = testing::user(&core, "U");
        let v = testing::user(&core, "V");
        core.record_swipe(u, v, Like).unwrap();

        let core = Arc::new(core);
        let count = |core: &Core| {
            core.db()
                .with_conn(|conn| daily_limits::get_swipe_count(conn, &u.to_string(), "2026-05-01"))
                .unwrap()
        };
        assert_eq!(count(&core), Some(1));

        let task = tokio::spawn(run_reset_loop(core.clone()));
        let mut reset = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if count(&core) == Some(0) {
                reset = true;
                break;
            }
        }
        task.abort();
        assert!(reset, "counter was not reset by the loop");
    }
}
