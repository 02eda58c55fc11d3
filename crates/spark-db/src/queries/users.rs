use anyhow::Result;
use rusqlite::Connection;

use super::OptionalExt;
use crate::Database;
use crate::models::{NewUser, UserRow};

const USER_COLUMNS: &str =
    "id, email, password, name, gender, date_of_birth, is_premium, verified, created_at";

impl Database {
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<()> {
        self.with_conn(|conn| insert_user(conn, user))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| find_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| find_by_id(conn, id))
    }
}

pub fn insert_user(conn: &Connection, user: &NewUser<'_>) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, password, name, gender, date_of_birth, verified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            user.id,
            user.email,
            user.password_hash,
            user.name,
            user.gender,
            user.date_of_birth,
            user.verified,
        ],
    )?;
    Ok(())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    query_user(conn, "email", email)
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    query_user(conn, "id", id)
}

pub fn user_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn set_premium(conn: &Connection, id: &str, premium: bool) -> Result<()> {
    conn.execute(
        "UPDATE users SET is_premium = ?2 WHERE id = ?1",
        rusqlite::params![id, premium],
    )?;
    Ok(())
}

/// Re-derive the cached `is_premium` flag from subscriptions active on
/// `today`, touching only rows that disagree. Returns the number fixed.
pub fn refresh_premium_flags(conn: &Connection, today: &str) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE users
         SET is_premium = EXISTS (
             SELECT 1 FROM user_premium_subscriptions s
             WHERE s.user_id = users.id AND s.end_date >= ?1
         )
         WHERE is_premium != EXISTS (
             SELECT 1 FROM user_premium_subscriptions s
             WHERE s.user_id = users.id AND s.end_date >= ?1
         )",
        [today],
    )?;
    Ok(changed)
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                name: row.get(3)?,
                gender: row.get(4)?,
                date_of_birth: row.get(5)?,
                is_premium: row.get(6)?,
                verified: row.get(7)?,
                created_at: row.get(8)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn test_create_and_lookup_user() {
        let db = Database::open_in_memory().unwrap();
        fixtures::user(&db, "ana");

        let by_email = db.get_user_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, "ana");
        assert!(!by_email.is_premium);
        assert_eq!(by_email.gender, "female");

        assert!(db.get_user_by_id("ana").unwrap().is_some());
        assert!(db.get_user_by_id("nobody").unwrap().is_none());
        assert!(db.with_conn(|c| user_exists(c, "ana")).unwrap());
        assert!(!db.with_conn(|c| user_exists(c, "nobody")).unwrap());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().unwrap();
        fixtures::user(&db, "ana");
        let dup = db.create_user(&NewUser {
            id: "other",
            email: "ana@example.com",
            password_hash: "hash",
            name: "Other",
            gender: "male",
            date_of_birth: "1990-05-05",
            verified: false,
        });
        assert!(dup.is_err());
    }

    #[test]
    fn test_refresh_premium_flags_clears_lapsed() {
        let db = Database::open_in_memory().unwrap();
        fixtures::user(&db, "lapsed");
        fixtures::user(&db, "active");
        db.with_conn(|conn| {
            conn.execute_batch(
                "INSERT INTO user_premium_subscriptions (id, user_id, premium_package_id, start_date, end_date)
                 VALUES ('s1', 'lapsed', '00000000-0000-0000-0000-000000000001', '2026-01-01', '2026-02-01'),
                        ('s2', 'active', '00000000-0000-0000-0000-000000000001', '2026-02-10', '2026-03-10');
                 UPDATE users SET is_premium = 1 WHERE id = 'lapsed';",
            )?;
            Ok(())
        })
        .unwrap();

        let fixed = db.with_conn(|c| refresh_premium_flags(c, "2026-02-15")).unwrap();
        assert_eq!(fixed, 2);
        assert!(!db.get_user_by_id("lapsed").unwrap().unwrap().is_premium);
        assert!(db.get_user_by_id("active").unwrap().unwrap().is_premium);

        let again = db.with_conn(|c| refresh_premium_flags(c, "2026-02-15")).unwrap();
        assert_eq!(again, 0);
    }
}
