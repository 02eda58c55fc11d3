use anyhow::Result;
use rusqlite::Connection;

use super::OptionalExt;
use crate::Database;
use crate::models::PackageRow;

impl Database {
    pub fn list_packages(&self) -> Result<Vec<PackageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, price FROM premium_packages ORDER BY price, name",
            )?;
            let rows = stmt
                .query_map([], map_package)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

pub fn get_package(conn: &Connection, id: &str) -> Result<Option<PackageRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, description, price FROM premium_packages WHERE id = ?1",
            [id],
            map_package,
        )
        .optional()?;
    Ok(row)
}

fn map_package(row: &rusqlite::Row<'_>) -> rusqlite::Result<PackageRow> {
    Ok(PackageRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
    })
}
