use anyhow::Result;
use rusqlite::Connection;

use crate::models::{MatchRow, SwipeRow};

pub fn insert_swipe(conn: &Connection, swipe: &SwipeRow) -> Result<()> {
    conn.execute(
        "INSERT INTO swipes (id, swiper_id, swiped_user_id, swipe_type, swiped_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            swipe.id,
            swipe.swiper_id,
            swipe.swiped_user_id,
            swipe.swipe_type,
            swipe.swiped_at,
        ],
    )?;
    Ok(())
}

/// Whether `swiper_id` already swiped `swiped_user_id`. With a window
/// `[start, end)` only swipes inside it count; without one any swipe does.
pub fn swipe_exists(
    conn: &Connection,
    swiper_id: &str,
    swiped_user_id: &str,
    window: Option<(&str, &str)>,
) -> Result<bool> {
    let exists: bool = match window {
        Some((start, end)) => conn.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM swipes
                 WHERE swiper_id = ?1 AND swiped_user_id = ?2
                   AND swiped_at >= ?3 AND swiped_at < ?4
             )",
            rusqlite::params![swiper_id, swiped_user_id, start, end],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM swipes WHERE swiper_id = ?1 AND swiped_user_id = ?2
             )",
            rusqlite::params![swiper_id, swiped_user_id],
            |row| row.get(0),
        )?,
    };
    Ok(exists)
}

pub fn list_swipes_by(conn: &Connection, swiper_id: &str) -> Result<Vec<SwipeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, swiper_id, swiped_user_id, swipe_type, swiped_at
         FROM swipes
         WHERE swiper_id = ?1
         ORDER BY swiped_at, rowid",
    )?;

    let rows = stmt
        .query_map([swiper_id], |row| {
            Ok(SwipeRow {
                id: row.get(0)?,
                swiper_id: row.get(1)?,
                swiped_user_id: row.get(2)?,
                swipe_type: row.get(3)?,
                swiped_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Users that `user_id` liked and who liked `user_id` back, on any day.
/// One row per counterpart, in the order of `user_id`'s first like on them.
pub fn find_mutual_likes(conn: &Connection, user_id: &str) -> Result<Vec<MatchRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.gender, u.date_of_birth
         FROM swipes s
         JOIN users u ON u.id = s.swiped_user_id
         WHERE s.swiper_id = ?1
           AND s.swipe_type = 'LIKE'
           AND EXISTS (
               SELECT 1 FROM swipes r
               WHERE r.swiper_id = s.swiped_user_id
                 AND r.swiped_user_id = ?1
                 AND r.swipe_type = 'LIKE'
           )
         GROUP BY u.id
         ORDER BY MIN(s.swiped_at), MIN(s.rowid)",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(MatchRow {
                user_id: row.get(0)?,
                name: row.get(1)?,
                gender: row.get(2)?,
                date_of_birth: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
