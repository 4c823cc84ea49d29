//! Pending wallet logins, keyed by the OAuth `state` handed to Google.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// How long a `/connect` link stays valid.
pub const DEFAULT_LOGIN_TTL: Duration = Duration::from_secs(600);

struct Pending {
    chat_id: i64,
    issued_at: Instant,
}

/// One-time login states issued by `/connect`.
///
/// The callback only notifies a chat whose state was issued here and not yet
/// redeemed or expired.
pub struct PendingLogins {
    ttl: Duration,
    pending: Mutex<HashMap<String, Pending>>,
}

impl PendingLogins {
    /// Creates an empty store whose states expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh state for `chat_id`.
    pub async fn issue(&self, chat_id: i64) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let mut pending = self.pending.lock().await;
        pending.retain(|_, p| p.issued_at.elapsed() <= self.ttl);
        pending.insert(
            state.clone(),
            Pending {
                chat_id,
                issued_at: Instant::now(),
            },
        );
        state
    }

    /// Consumes `state` and returns the chat it was issued to.
    pub async fn redeem(&self, state: &str) -> Option<i64> {
        let pending = self.pending.lock().await.remove(state)?;
        (pending.issued_at.elapsed() <= self.ttl).then_some(pending.chat_id)
    }
}

impl Default for PendingLogins {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_is_single_use() {
        let logins = PendingLogins::default();
        let state = logins.issue(42).await;
        assert_eq!(state.len(), 32);

        assert_eq!(logins.redeem(&state).await, Some(42));
        assert_eq!(logins.redeem(&state).await, None);
    }

    #[tokio::test]
    async fn test_unknown_state_is_rejected() {
        let logins = PendingLogins::default();
        logins.issue(42).await;
        assert_eq!(logins.redeem("42").await, None);
    }

    #[tokio::test]
    async fn test_expired_state_is_rejected() {
        let logins = PendingLogins::new(Duration::ZERO);
        let state = logins.issue(42).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(logins.redeem(&state).await, None);
    }

    #[tokio::test]
    async fn test_states_differ_per_issue() {
        let logins = PendingLogins::default();
        assert_ne!(logins.issue(1).await, logins.issue(1).await);
    }
}
