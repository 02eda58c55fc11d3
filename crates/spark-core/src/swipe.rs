use spark_db::models::SwipeRow;
use spark_db::queries::{daily_limits, subscriptions, swipes, users};
use spark_db::{format_date, format_timestamp};
use spark_types::models::SwipeType;
use tracing::debug;
use uuid::Uuid;

use crate::{Core, CoreError, DayWindow, DuplicateScope};

impl Core {
    /// Record `swiper`'s swipe on `target`.
    ///
    /// Checks run in order and the first failure wins: self swipe, unknown
    /// target, repeat swipe within the duplicate scope, then the daily quota
    /// (skipped while the swiper has an active subscription). Everything after
    /// the self-swipe check happens in one write transaction, and the quota
    /// counter is claimed with a single guarded upsert, so concurrent swipes
    /// by the same user can never push the count past the limit.
    pub fn record_swipe(
        &self,
        swiper: Uuid,
        target: Uuid,
        swipe_type: SwipeType,
    ) -> Result<(), CoreError> {
        if swiper == target {
            return Err(CoreError::SelfSwipe);
        }

        let now = self.clock.now();
        let day = DayWindow::containing(now, self.policy.timezone);
        let date = format_date(day.date);
        let (start, end) = (format_timestamp(day.start), format_timestamp(day.end));
        let swiper_id = swiper.to_string();
        let target_id = target.to_string();
        let limit = self.policy.daily_swipe_limit;

        let used = self.db.transaction(|tx| -> Result<u32, CoreError> {
            if !users::user_exists(tx, &target_id)? {
                return Err(CoreError::NotFound("User"));
            }

            let window = match self.policy.duplicate_scope {
                DuplicateScope::Daily => Some((start.as_str(), end.as_str())),
                DuplicateScope::Forever => None,
            };
            if swipes::swipe_exists(tx, &swiper_id, &target_id, window)? {
                return Err(CoreError::DuplicateSwipe);
            }

            // Premium is re-derived from subscriptions, never from the
            // cached users.is_premium flag.
            let used = daily_limits::get_swipe_count(tx, &swiper_id, &date)?.unwrap_or(0);
            let unlimited = used >= limit && subscriptions::has_active(tx, &swiper_id, &date)?;
            if used >= limit && !unlimited {
                return Err(CoreError::QuotaExceeded);
            }

            let cap = (!unlimited).then_some(limit);
            if !daily_limits::try_increment(tx, &swiper_id, &date, cap)? {
                return Err(CoreError::QuotaExceeded);
            }

            swipes::insert_swipe(
                tx,
                &SwipeRow {
                    id: Uuid::new_v4().to_string(),
                    swiper_id: swiper_id.clone(),
                    swiped_user_id: target_id.clone(),
                    swipe_type: swipe_type.as_str().to_string(),
                    swiped_at: format_timestamp(now),
                },
            )?;

            Ok(used + 1)
        })?;

        debug!(
            "Swipe {} {} -> {} ({} today)",
            swipe_type.as_str(),
            swiper,
            target,
            used
        );
        Ok(())
    }
}
