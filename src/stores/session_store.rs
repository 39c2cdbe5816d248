use crate::models::session::Session;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store for gateway sessions, keyed by session token
pub struct SessionStore {
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Add a session to the store
    /// If a session with the same token already exists, it will be replaced
    pub fn add(&self, session: Session) {
        let token = session.token.clone();
        self.sessions.insert(token, Arc::new(session));
    }

    /// Get a session by token
    pub fn get(&self, token: &str) -> Option<Arc<Session>> {
        self.sessions
            .get(token)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session by token
    /// Returns the removed session if it existed; safe to call repeatedly
    pub fn remove(&self, token: &str) -> Option<Arc<Session>> {
        self.sessions.remove(token).map(|(_, session)| session)
    }

    /// Drop sessions older than `ttl` seconds, returning how many were removed
    pub fn cleanup_expired(&self, ttl: i64, current_time: i64) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !crate::utils::time::is_expired(session.created_at, ttl, current_time));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;

    fn make_session(token: &str, created_at: i64) -> Session {
        Session::new(
            token.to_string(),
            User::new(
                "uid-1".to_string(),
                "user@example.com".to_string(),
                "steve".to_string(),
            ),
            "access-token".to_string(),
            created_at,
        )
    }

    #[test]
    fn test_add_and_get() {
        let store = SessionStore::new();
        store.add(make_session("tok-1", 1000));

        let session = store.get("tok-1").unwrap();
        assert_eq!(session.user.id, "uid-1");
        assert!(store.get("tok-2").is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        store.add(make_session("tok-1", 1000));

        assert!(store.remove("tok-1").is_some());
        assert!(store.remove("tok-1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new();
        store.add(make_session("old", 1000));
        store.add(make_session("fresh", 5000));

        let removed = store.cleanup_expired(3600, 5100);
        assert_eq!(removed, 1);
        assert!(store.get("old").is_none());
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn test_replacing_same_token() {
        let store = SessionStore::new();
        store.add(make_session("tok-1", 1000));
        store.add(make_session("tok-1", 2000));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tok-1").unwrap().created_at, 2000);
    }
}
