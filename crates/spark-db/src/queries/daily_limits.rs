use anyhow::Result;
use rusqlite::Connection;

use super::OptionalExt;

pub fn get_swipe_count(conn: &Connection, user_id: &str, date: &str) -> Result<Option<u32>> {
    let count = conn
        .query_row(
            "SELECT swipe_count FROM daily_limits WHERE user_id = ?1 AND date = ?2",
            [user_id, date],
            |row| row.get(0),
        )
        .optional()?;
    Ok(count)
}

/// Claim one swipe for `(user_id, date)` in a single statement: creates the
/// row at 1, or bumps it while it is below `limit`. `None` means no limit.
/// Returns `false` when the row is already at the limit and nothing changed.
pub fn try_increment(
    conn: &Connection,
    user_id: &str,
    date: &str,
    limit: Option<u32>,
) -> Result<bool> {
    let changed = conn.execute(
        "INSERT INTO daily_limits (user_id, date, swipe_count) VALUES (?1, ?2, 1)
         ON CONFLICT (user_id, date) DO UPDATE
             SET swipe_count = swipe_count + 1
             WHERE ?3 IS NULL OR daily_limits.swipe_count < ?3",
        rusqlite::params![user_id, date, limit],
    )?;
    Ok(changed == 1)
}

/// Zero every counter in one statement. Rows keep their date.
pub fn reset_all(conn: &Connection) -> Result<usize> {
    let changed = conn.execute("UPDATE daily_limits SET swipe_count = 0 WHERE swipe_count > 0", [])?;
    Ok(changed)
}

/// Zero counters dated strictly before `date`.
pub fn reset_before(conn: &Connection, date: &str) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE daily_limits SET swipe_count = 0 WHERE date < ?1 AND swipe_count > 0",
        [date],
    )?;
    Ok(changed)
}
