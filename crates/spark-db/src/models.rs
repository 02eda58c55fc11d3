/// Database row types. These map directly to SQLite rows.
/// Distinct from spark-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub date_of_birth: String,
    pub is_premium: bool,
    pub verified: bool,
    pub created_at: String,
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub gender: &'a str,
    pub date_of_birth: &'a str,
    pub verified: bool,
}

pub struct SwipeRow {
    pub id: String,
    pub swiper_id: String,
    pub swiped_user_id: String,
    pub swipe_type: String,
    pub swiped_at: String,
}

/// A mutual-like counterpart joined with their profile fields.
pub struct MatchRow {
    pub user_id: String,
    pub name: String,
    pub gender: String,
    pub date_of_birth: String,
}

pub struct PackageRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

pub struct SubscriptionRow {
    pub id: String,
    pub user_id: String,
    pub premium_package_id: String,
    pub start_date: String,
    pub end_date: String,
}
