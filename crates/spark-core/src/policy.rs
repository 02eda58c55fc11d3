use std::str::FromStr;

use anyhow::anyhow;
use chrono_tz::Tz;

/// How long a swipe on someone blocks swiping them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateScope {
    /// Once per pair per calendar day.
    Daily,
    /// Once per pair, ever.
    Forever,
}

/// Which quota counters the daily reset zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Every counter, including today's.
    All,
    /// Only counters dated before today.
    Stale,
}

impl FromStr for DuplicateScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "forever" => Ok(Self::Forever),
            other => Err(anyhow!("unknown duplicate scope '{}' (expected daily|forever)", other)),
        }
    }
}

impl FromStr for ResetScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "stale" => Ok(Self::Stale),
            other => Err(anyhow!("unknown reset scope '{}' (expected all|stale)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    /// Zone whose midnight starts a new quota day.
    pub timezone: Tz,
    /// Free swipes per day for users without an active subscription.
    pub daily_swipe_limit: u32,
    pub duplicate_scope: DuplicateScope,
    pub reset_scope: ResetScope,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Jakarta,
            daily_swipe_limit: 10,
            duplicate_scope: DuplicateScope::Daily,
            reset_scope: ResetScope::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scopes() {
        assert_eq!("daily".parse::<DuplicateScope>().unwrap(), DuplicateScope::Daily);
        assert_eq!("FOREVER".parse::<DuplicateScope>().unwrap(), DuplicateScope::Forever);
        assert!("weekly".parse::<DuplicateScope>().is_err());

        assert_eq!("all".parse::<ResetScope>().unwrap(), ResetScope::All);
        assert_eq!("Stale".parse::<ResetScope>().unwrap(), ResetScope::Stale);
        assert!("none".parse::<ResetScope>().is_err());
    }
}
