use anyhow::Result;
use rusqlite::Connection;

use super::OptionalExt;
use crate::models::{PackageRow, SubscriptionRow};

/// A subscription is active while `end_date >= today`.
pub fn has_active(conn: &Connection, user_id: &str, today: &str) -> Result<bool> {
    let active: bool = conn.query_row(
        "SELECT EXISTS (
             SELECT 1 FROM user_premium_subscriptions
             WHERE user_id = ?1 AND end_date >= ?2
         )",
        [user_id, today],
        |row| row.get(0),
    )?;
    Ok(active)
}

pub fn insert_subscription(conn: &Connection, sub: &SubscriptionRow) -> Result<()> {
    conn.execute(
        "INSERT INTO user_premium_subscriptions (id, user_id, premium_package_id, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            sub.id,
            sub.user_id,
            sub.premium_package_id,
            sub.start_date,
            sub.end_date,
        ],
    )?;
    Ok(())
}

/// The active subscription with the latest end date, joined to its package.
pub fn get_active_with_package(
    conn: &Connection,
    user_id: &str,
    today: &str,
) -> Result<Option<(SubscriptionRow, PackageRow)>> {
    let row = conn
        .query_row(
            "SELECT s.id, s.user_id, s.premium_package_id, s.start_date, s.end_date,
                    p.id, p.name, p.description, p.price
             FROM user_premium_subscriptions s
             JOIN premium_packages p ON p.id = s.premium_package_id
             WHERE s.user_id = ?1 AND s.end_date >= ?2
             ORDER BY s.end_date DESC, s.created_at DESC
             LIMIT 1",
            [user_id, today],
            |row| {
                Ok((
                    SubscriptionRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        premium_package_id: row.get(2)?,
                        start_date: row.get(3)?,
                        end_date: row.get(4)?,
                    },
                    PackageRow {
                        id: row.get(5)?,
                        name: row.get(6)?,
                        description: row.get(7)?,
                        price: row.get(8)?,
                    },
                ))
            },
        )
        .optional()?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::migrations::GOLD_PACKAGE_ID;
    use crate::queries::fixtures;

    #[test]
    fn test_active_until_end_date_inclusive() {
        let db = Database::open_in_memory().unwrap();
        fixtures::user(&db, "u");

        db.with_conn(|conn| {
            insert_subscription(
                conn,
                &SubscriptionRow {
                    id: "s1".into(),
                    user_id: "u".into(),
                    premium_package_id: GOLD_PACKAGE_ID.into(),
                    start_date: "2026-05-01".into(),
                    end_date: "2026-06-01".into(),
                },
            )?;

            assert!(has_active(conn, "u", "2026-05-15")?);
            assert!(has_active(conn, "u", "2026-06-01")?);
            assert!(!has_active(conn, "u", "2026-06-02")?);

            let (sub, pkg) = get_active_with_package(conn, "u", "2026-06-01")?.unwrap();
            assert_eq!(sub.id, "s1");
            assert_eq!(pkg.name, "Gold");
            assert!(get_active_with_package(conn, "u", "2026-06-02")?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
