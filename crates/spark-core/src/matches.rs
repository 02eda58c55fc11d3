use anyhow::{Context, anyhow};
use spark_db::parse_date;
use spark_db::queries::swipes;
use spark_types::api::MatchResponse;
use spark_types::models::Gender;
use uuid::Uuid;

use crate::{Core, CoreError};

impl Core {
    /// Everyone `user` has liked who liked `user` back, on any day.
    pub fn find_matches(&self, user: Uuid) -> Result<Vec<MatchResponse>, CoreError> {
        let rows = self
            .db
            .with_conn(|conn| swipes::find_mutual_likes(conn, &user.to_string()))?;

        let matches = rows
            .into_iter()
            .map(|row| {
                Ok(MatchResponse {
                    matched_user_id: row
                        .user_id
                        .parse()
                        .with_context(|| format!("Corrupt user id '{}'", row.user_id))?,
                    gender: Gender::parse(&row.gender)
                        .ok_or_else(|| anyhow!("Corrupt gender '{}' on user '{}'", row.gender, row.user_id))?,
                    birth_date: parse_date(&row.date_of_birth)?,
                    name: row.name,
                    bio: None,
                    photo_url: None,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(matches)
    }
}
