use spark_db::format_date;
use spark_db::queries::{daily_limits, users};
use tracing::info;

use crate::{Core, CoreError, ResetScope};

/// What one run of the daily reset changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub counters_reset: usize,
    pub premium_flags_refreshed: usize,
}

impl Core {
    /// Zero the swipe counters and resync cached premium flags with the
    /// subscriptions active today. Both are single bulk statements in one
    /// transaction, so a concurrent swipe lands entirely before or after.
    /// Swipes and subscriptions are never touched.
    pub fn reset_daily_quotas(&self) -> Result<ResetReport, CoreError> {
        let today = format_date(self.today().date);
        let scope = self.policy.reset_scope;

        let report = self.db.transaction(|tx| -> Result<ResetReport, CoreError> {
            let counters_reset = match scope {
                ResetScope::All => daily_limits::reset_all(tx)?,
                ResetScope::Stale => daily_limits::reset_before(tx, &today)?,
            };
            let premium_flags_refreshed = users::refresh_premium_flags(tx, &today)?;
            Ok(ResetReport {
                counters_reset,
                premium_flags_refreshed,
            })
        })?;

        info!(
            "Daily reset for {}: {} counters zeroed, {} premium flags refreshed",
            today, report.counters_reset, report.premium_flags_refreshed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use spark_db::migrations::GOLD_PACKAGE_ID;
    use spark_db::queries::{subscriptions, swipes};
    use spark_types::models::SwipeType::Like;

    use crate::testing;

    #[test]
    fn test_reset_leaves_swipes_and_subscriptions_alone() {
        let (core, _) = testing::core();
        let u = testing::user(&core, "U");
        let v = testing::user(&core, "V");
        core.purchase(u, GOLD_PACKAGE_ID.parse().unwrap()).unwrap();
        core.record_swipe(u, v, Like).unwrap();
        core.record_swipe(v, u, Like).unwrap();

        let report = core.reset_daily_quotas().unwrap();
        assert_eq!(report.counters_reset, 2);
        assert_eq!(report.premium_flags_refreshed, 0);

        let uid = u.to_string();
        let (made, active) = core
            .db()
            .with_conn(|c| Ok((swipes::list_swipes_by(c, &uid)?, subscriptions::has_active(c, &uid, "2026-05-01")?)))
            .unwrap();
        assert_eq!(made.len(), 1);
        assert!(active);
        assert_eq!(core.find_matches(u).unwrap().len(), 1);

        // nothing left to zero
        assert_eq!(core.reset_daily_quotas().unwrap().counters_reset, 0);
    }

    #[test]
    fn test_reset_clears_lapsed_premium_flag() {
        let (core, clock) = testing::core();
        let u = testing::user(&core, "U");
        core.purchase(u, GOLD_PACKAGE_ID.parse().unwrap()).unwrap();

        clock.advance(Duration::days(45));
        let report = core.reset_daily_quotas().unwrap();
        assert_eq!(report.premium_flags_refreshed, 1);
        assert!(!core.db().get_user_by_id(&u.to_string()).unwrap().unwrap().is_premium);
    }
}
