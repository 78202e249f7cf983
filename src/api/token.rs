use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Holds the current bearer token. Read on every request and written only by
/// authentication, so concurrent callers can share one client.
#[derive(Debug, Default)]
pub struct TokenStore {
    inner: RwLock<Option<Token>>,
}

impl TokenStore {
    pub fn get(&self) -> Option<Token> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: Token) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// A store without a token counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.get().is_none_or(|token| token.expires_at <= now)
    }
}
