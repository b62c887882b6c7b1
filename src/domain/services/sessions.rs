#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use dashmap::DashMap;

use crate::domain::models::Session;
use crate::domain::models::SessionId;

/// In-memory sessions, one per chat participant. Values are copied in and
/// out so no map guard is ever held across an await.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn get(&self, id: SessionId) -> Option<Session> {
        return self.sessions.get(&id).map(|session| return session.clone());
    }

    /// Stores a session, or removes it when `None` is given.
    pub fn set(&self, id: SessionId, session: Option<Session>) {
        match session {
            Some(session) => {
                self.sessions.insert(id, session);
            }
            None => {
                self.sessions.remove(&id);
            }
        }
    }

    /// Snapshot of all sessions ordered by id.
    pub fn list(&self) -> Vec<(SessionId, Session)> {
        let mut sessions = self
            .sessions
            .iter()
            .map(|entry| return (*entry.key(), entry.value().clone()))
            .collect::<Vec<(SessionId, Session)>>();
        sessions.sort_by_key(|(id, _)| return *id);

        return sessions;
    }

    pub fn len(&self) -> usize {
        return self.sessions.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.sessions.is_empty();
    }
}
