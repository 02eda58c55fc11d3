use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::{State, rejection::JsonRejection}, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, NaiveDate};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use spark_db::models::{NewUser, UserRow};
use spark_db::queries::users;
use spark_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use spark_types::models::Gender;

use crate::{ApiError, AppState, run_blocking};

const TOKEN_TTL_DAYS: i64 = 30;

/// POST /users: create an account. Answers 201 with the public profile.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let today = state.core.today().date;
    let email = validate_email(&req.email)?;
    if req.password.chars().count() < 8 {
        return Err(ApiError::Validation("Password must be at least 8 characters".into()));
    }
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    let gender = Gender::parse(&req.gender)
        .ok_or_else(|| ApiError::Validation("Gender must be one of male, female, other".into()))?;
    let date_of_birth = parse_birth_date(&req.date_of_birth, today)?;

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();
    let core = state.core.clone();
    let verified = req.verified;

    // Lookup and insert share one write transaction so two sign-ups with
    // the same address cannot both pass the check.
    let row = run_blocking(move || {
        core.db().transaction(|tx| -> Result<UserRow, ApiError> {
            if users::find_by_email(tx, &email)?.is_some() {
                return Err(ApiError::EmailTaken);
            }

            let id = user_id.to_string();
            users::insert_user(
                tx,
                &NewUser {
                    id: &id,
                    email: &email,
                    password_hash: &password_hash,
                    name: &name,
                    gender: gender.as_str(),
                    date_of_birth: &spark_db::format_date(date_of_birth),
                    verified,
                },
            )?;

            users::find_by_id(tx, &id)?
                .ok_or_else(|| ApiError::from(anyhow::anyhow!("User {} vanished after insert", id)))
        })
    })
    .await?;

    info!("Registered user {}", user_id);
    Ok((StatusCode::CREATED, Json(user_response(row)?)))
}

/// POST /login: exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let email = req.email.trim().to_lowercase();

    let core = state.core.clone();
    let user = run_blocking(move || core.db().get_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("Stored hash for {} is unreadable: {}", user.id, e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt user id '{}': {}", user.id, e))?;

    let token = create_token(&state.jwt_secret, user_id, &user.email)?;

    Ok(Json(LoginResponse { user_id, token }))
}

pub fn create_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn user_response(row: UserRow) -> anyhow::Result<UserResponse> {
    Ok(UserResponse {
        id: row.id.parse()?,
        gender: Gender::parse(&row.gender)
            .ok_or_else(|| anyhow::anyhow!("Corrupt gender '{}' on user '{}'", row.gender, row.id))?,
        date_of_birth: spark_db::parse_date(&row.date_of_birth)?,
        created_at: spark_db::parse_timestamp(&row.created_at)?,
        email: row.email,
        name: row.name,
        is_premium: row.is_premium,
        verified: row.verified,
    })
}

/// Lowercased, trimmed address of the form `local@domain.tld`.
fn validate_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    let invalid = || ApiError::Validation("Invalid email".into());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(email)
}

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339 timestamp.
fn parse_birth_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| ApiError::Validation("Invalid date format".into()))?;

    if date > today {
        return Err(ApiError::Validation("Date of birth cannot be in the future".into()));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::decode_token;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Ana@Example.com ").unwrap(), "ana@example.com");
        for bad in ["testingmailcom", "@mail.com", "a@mail", "a@.com", "a@mail.", "a b@mail.com", "a@b@c.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_birth_date_formats() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let expected = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert_eq!(parse_birth_date("1999-01-01", today).unwrap(), expected);
        assert_eq!(parse_birth_date("1999/01/01", today).unwrap(), expected);
        assert_eq!(parse_birth_date("1999-01-01T00:00:00Z", today).unwrap(), expected);
        assert!(parse_birth_date("not a date", today).is_err());
        assert!(parse_birth_date("2030-01-01", today).is_err());
    }

    #[test]
    fn test_token_round_trip_and_wrong_secret() {
        let user_id = Uuid::new_v4();
        let token = create_token("secret-a", user_id, "a@example.com").unwrap();

        let claims = decode_token("secret-a", &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");

        assert!(matches!(decode_token("secret-b", &token), Err(ApiError::InvalidToken)));
    }
}
