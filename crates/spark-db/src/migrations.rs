use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Id of the package seeded on first start.
pub const GOLD_PACKAGE_ID: &str = "00000000-0000-0000-0000-000000000001";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            name            TEXT NOT NULL,
            gender          TEXT NOT NULL,
            date_of_birth   TEXT NOT NULL,
            is_premium      INTEGER NOT NULL DEFAULT 0,
            verified        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- No uniqueness constraint: one swipe per pair per day is enforced
        -- by the swipe engine, whose scope is configurable.
        CREATE TABLE IF NOT EXISTS swipes (
            id              TEXT PRIMARY KEY,
            swiper_id       TEXT NOT NULL REFERENCES users(id),
            swiped_user_id  TEXT NOT NULL REFERENCES users(id),
            swipe_type      TEXT NOT NULL CHECK (swipe_type IN ('LIKE', 'PASS')),
            swiped_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_swipes_pair
            ON swipes(swiper_id, swiped_user_id, swiped_at);

        CREATE TABLE IF NOT EXISTS daily_limits (
            user_id         TEXT NOT NULL REFERENCES users(id),
            date            TEXT NOT NULL,
            swipe_count     INTEGER NOT NULL DEFAULT 0 CHECK (swipe_count >= 0),
            PRIMARY KEY (user_id, date)
        );

        CREATE TABLE IF NOT EXISTS premium_packages (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE,
            description     TEXT NOT NULL,
            price           INTEGER NOT NULL CHECK (price >= 0)
        );

        CREATE TABLE IF NOT EXISTS user_premium_subscriptions (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL REFERENCES users(id),
            premium_package_id  TEXT NOT NULL REFERENCES premium_packages(id),
            start_date          TEXT NOT NULL,
            end_date            TEXT NOT NULL,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_subscriptions_user
            ON user_premium_subscriptions(user_id, end_date);

        -- Seed the default premium package
        INSERT OR IGNORE INTO premium_packages (id, name, description, price)
            VALUES ('00000000-0000-0000-0000-000000000001', 'Gold', 'Gold membership package', 100000);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
