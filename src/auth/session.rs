use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    issued_at: DateTime<Utc>,
}

/// Bearer-token sessions with a fixed lifetime.
///
/// Tokens are opaque uuids; expired entries are pruned lazily whenever a
/// token is resolved.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a fresh token for a signed-in user.
    pub fn issue(&mut self, user_id: Uuid) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.insert(
            token,
            Session {
                user_id,
                issued_at: Utc::now(),
            },
        );
        token
    }

    /// Look up the user behind a token, dropping it if it has expired.
    pub fn resolve(&mut self, token: &Uuid) -> Option<Uuid> {
        let expired = match self.sessions.get(token) {
            Some(s) => Utc::now() - s.issued_at > self.ttl,
            None => return None,
        };
        if expired {
            self.sessions.remove(token);
            return None;
        }
        self.sessions.get(token).map(|s| s.user_id)
    }

    pub fn revoke(&mut self, token: &Uuid) {
        self.sessions.remove(token);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_user() {
        let mut store = SessionStore::new(1);
        let user = Uuid::new_v4();
        let token = store.issue(user);
        assert_eq!(store.resolve(&token), Some(user));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let mut store = SessionStore::new(1);
        assert_eq!(store.resolve(&Uuid::new_v4()), None);
    }

    #[test]
    fn revoked_token_does_not_resolve() {
        let mut store = SessionStore::new(1);
        let token = store.issue(Uuid::new_v4());
        store.revoke(&token);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn expired_token_is_pruned_on_resolve() {
        // Zero-hour ttl: everything is expired immediately.
        let mut store = SessionStore::new(0);
        let token = store.issue(Uuid::new_v4());
        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }
}
