use thiserror::Error;

/// Outcomes the caller can act on, plus an opaque internal failure.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("You cannot swipe on yourself")]
    SelfSwipe,

    #[error("You have already swiped on this user")]
    DuplicateSwipe,

    #[error("You have reached your daily swipe limit")]
    QuotaExceeded,

    #[error("You already have an active subscription")]
    AlreadySubscribed,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
