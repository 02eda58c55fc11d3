use anyhow::{Context, anyhow};
use chrono::Months;
use spark_db::models::{PackageRow, SubscriptionRow};
use spark_db::queries::{packages, subscriptions, users};
use spark_db::{format_date, parse_date};
use spark_types::api::{PackageResponse, SubscriptionResponse};
use tracing::info;
use uuid::Uuid;

use crate::{Core, CoreError};

impl Core {
    /// Buy `package` for `user`, starting today and running one calendar
    /// month. Fails while another subscription is still active.
    pub fn purchase(&self, user: Uuid, package: Uuid) -> Result<SubscriptionResponse, CoreError> {
        let start = self.today().date;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| anyhow!("Subscription end date out of range for {}", start))?;

        let row = SubscriptionRow {
            id: Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            premium_package_id: package.to_string(),
            start_date: format_date(start),
            end_date: format_date(end),
        };

        self.db.transaction(|tx| -> Result<(), CoreError> {
            if subscriptions::has_active(tx, &row.user_id, &row.start_date)? {
                return Err(CoreError::AlreadySubscribed);
            }
            if packages::get_package(tx, &row.premium_package_id)?.is_none() {
                return Err(CoreError::NotFound("Premium package"));
            }
            subscriptions::insert_subscription(tx, &row)?;
            users::set_premium(tx, &row.user_id, true)?;
            Ok(())
        })?;

        info!("User {} subscribed to package {} until {}", user, package, end);
        Ok(subscription_response(&row, None)?)
    }

    /// The user's current subscription with its package.
    pub fn active_subscription(&self, user: Uuid) -> Result<SubscriptionResponse, CoreError> {
        let today = format_date(self.today().date);
        let (sub, pkg) = self
            .db
            .with_conn(|conn| subscriptions::get_active_with_package(conn, &user.to_string(), &today))?
            .ok_or(CoreError::NotFound("Active subscription"))?;

        let package = package_response(pkg)?;
        Ok(subscription_response(&sub, Some(package))?)
    }

    /// Fresh lookup; the cached `is_premium` column is only a hint.
    pub fn has_active_subscription(&self, user: Uuid) -> Result<bool, CoreError> {
        let today = format_date(self.today().date);
        Ok(self
            .db
            .with_conn(|conn| subscriptions::has_active(conn, &user.to_string(), &today))?)
    }
}

pub fn package_response(row: PackageRow) -> anyhow::Result<PackageResponse> {
    Ok(PackageResponse {
        id: row.id.parse().with_context(|| format!("Corrupt package id '{}'", row.id))?,
        name: row.name,
        description: row.description,
        price: row.price,
    })
}

fn subscription_response(
    row: &SubscriptionRow,
    premium_package: Option<PackageResponse>,
) -> anyhow::Result<SubscriptionResponse> {
    Ok(SubscriptionResponse {
        id: row.id.parse().with_context(|| format!("Corrupt subscription id '{}'", row.id))?,
        user_id: row.user_id.parse().with_context(|| format!("Corrupt user id '{}'", row.user_id))?,
        premium_package_id: row
            .premium_package_id
            .parse()
            .with_context(|| format!("Corrupt package id '{}'", row.premium_package_id))?,
        start_date: parse_date(&row.start_date)?,
        end_date: parse_date(&row.end_date)?,
        premium_package,
    })
}
