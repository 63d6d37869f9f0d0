use dashmap::DashMap;
use nanoid::nanoid;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

const SHARED_SESSION_ID: &str = "shared";

/// Reading state of one client: the cached search results, a cursor into
/// them, and every title already served.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub query: String,
    pub candidates: Vec<String>,
    pub cursor: usize,
    seen: HashSet<String>,
}

impl SearchSession {
    /// Replaces the cached results with a fresh search. Titles served for an
    /// earlier search may be served again.
    pub fn start(&mut self, query: &str, candidates: Vec<String>) {
        self.query = query.to_string();
        self.candidates = candidates;
        self.cursor = 0;
        self.seen.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Returns the candidate under the cursor and advances past it.
    pub fn next_candidate(&mut self) -> Option<String> {
        let candidate = self.candidates.get(self.cursor).cloned();
        if candidate.is_some() {
            self.cursor += 1;
        }
        candidate
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    pub fn has_seen(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    /// Records `title` as served. Returns false if it already was.
    pub fn mark_seen(&mut self, title: &str) -> bool {
        self.seen.insert(title.to_string())
    }
}

pub type SessionHandle = Arc<Mutex<SearchSession>>;

/// Sessions keyed by an opaque token handed to the client.
///
/// In shared mode every request lands on the same session, so all clients
/// explore one result stream together.
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
    shared: bool,
}

impl SessionStore {
    pub fn new(shared: bool) -> SessionStore {
        SessionStore {
            sessions: DashMap::new(),
            shared,
        }
    }

    /// Looks up the session for `id`, creating one under a new token when the
    /// id is absent or unknown.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        if self.shared {
            let handle = self
                .sessions
                .entry(SHARED_SESSION_ID.to_string())
                .or_default()
                .value()
                .clone();
            return (SHARED_SESSION_ID.to_string(), handle);
        }

        if let Some(id) = id {
            if let Some(handle) = self.sessions.get(id) {
                return (id.to_string(), handle.value().clone());
            }
            log::debug!("unknown session {id}, starting a new one");
        }

        let id = nanoid!();
        let handle = SessionHandle::default();
        self.sessions.insert(id.clone(), handle.clone());
        (id, handle)
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
    fn test_cursor_advances_until_exhausted() {
        let mut session = SearchSession::default();
        session.start("rust", vec!["A".into(), "B".into()]);
        assert_eq!(session.next_candidate().as_deref(), Some("A"));
        assert_eq!(session.remaining(), 1);
        assert_eq!(session.next_candidate().as_deref(), Some("B"));
        assert_eq!(session.next_candidate(), None);
        assert_eq!(session.cursor, 2);
    }

    #[test]
    fn test_start_resets_seen() {
        let mut session = SearchSession::default();
        session.start("one", vec![]);
        assert!(session.mark_seen("A"));
        assert!(!session.mark_seen("A"));
        session.start("two", vec![]);
        assert!(!session.has_seen("A"));
    }

    #[tokio::test]
    async fn test_store_isolates_clients() {
        let store = SessionStore::new(false);
        let (first_id, first) = store.get_or_create(None);
        let (second_id, second) = store.get_or_create(None);
        assert_ne!(first_id, second_id);

        first.lock().await.mark_seen("A");
        assert!(!second.lock().await.has_seen("A"));

        let (again_id, again) = store.get_or_create(Some(&first_id));
        assert_eq!(again_id, first_id);
        assert!(again.lock().await.has_seen("A"));
    }

    #[test]
    fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(false);
        let (id, _) = store.get_or_create(Some("made-up"));
        assert_ne!(id, "made-up");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_shared_store_returns_one_session() {
        let store = SessionStore::new(true);
        let (a_id, a) = store.get_or_create(None);
        let (b_id, b) = store.get_or_create(Some("anything"));
        assert_eq!(a_id, b_id);
        a.lock().await.mark_seen("A");
        assert!(b.lock().await.has_seen("A"));
        assert_eq!(store.len(), 1);
    }
}
