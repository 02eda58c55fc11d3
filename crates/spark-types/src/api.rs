use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Gender, SwipeType};

// -- JWT Claims --

/// JWT claims issued at login and checked by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Users --

/// Registration payload. Gender and birth date arrive as strings and are
/// validated by the handler so bad values answer 400 with a reason.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub verified: bool,
    /// Accepted for client compatibility and ignored: premium is only
    /// granted by purchasing a subscription.
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub is_premium: bool,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub token: String,
}

// -- Swipes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwipeRequest {
    pub swiped_user_id: Uuid,
    pub swipe_type: SwipeType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub success: bool,
}

// -- Matches --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matched_user_id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchResponse>,
}

// -- Premium --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    pub premium_package_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub premium_package_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_package: Option<PackageResponse>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
