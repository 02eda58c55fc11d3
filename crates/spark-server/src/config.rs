use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use chrono_tz::Tz;
use tracing::info;

use spark_core::{DuplicateScope, Policy, ResetScope};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub policy: Policy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("SPARK_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("SPARK_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let daily_swipe_limit: u32 = try_load("SPARK_DAILY_SWIPE_LIMIT", "10")?;
        if daily_swipe_limit == 0 {
            bail!("SPARK_DAILY_SWIPE_LIMIT must be at least 1");
        }

        let timezone: Tz = env::var("SPARK_TIMEZONE")
            .unwrap_or_else(|_| "Asia/Jakarta".into())
            .parse()
            .map_err(|e| anyhow!("Invalid SPARK_TIMEZONE: {}", e))?;

        Ok(Self {
            host: env::var("SPARK_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: try_load("SPARK_PORT", "3000")?,
            db_path: env::var("SPARK_DB_PATH").unwrap_or_else(|_| "spark.db".into()).into(),
            jwt_secret,
            policy: Policy {
                timezone,
                daily_swipe_limit,
                duplicate_scope: try_load::<DuplicateScope>("SPARK_DUPLICATE_SCOPE", "daily")?,
                reset_scope: try_load::<ResetScope>("SPARK_RESET_SCOPE", "all")?,
            },
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}
