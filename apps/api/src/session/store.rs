//! In-memory session table.
//!
//! The map lock is held only for lookups and inserts. Mutation of a session
//! goes through the session's own submission lock and write-once outcome, so
//! different sessions never contend with each other. Nothing is persisted or
//! evicted; sessions live as long as the process.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::models::profile::Profile;
use crate::recommendation::models::RecommendationRecord;
use crate::session::models::{Session, SessionId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session {0} has already been answered")]
    AlreadyAnswered(SessionId),
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the profile under a fresh random ID. IDs are never reused.
    pub fn create(&self, profile: Profile) -> SessionId {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        loop {
            let id = SessionId::generate();
            if let Entry::Vacant(slot) = sessions.entry(id) {
                slot.insert(Arc::new(Session::new(id, profile)));
                return id;
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Stores answers and result together. Fails for an unknown session or
    /// one that already has an outcome; an existing outcome is never replaced.
    pub fn attach_answers_and_result(
        &self,
        id: &SessionId,
        answers: Profile,
        result: RecommendationRecord,
    ) -> Result<(), SessionError> {
        let session = self.get(id).ok_or(SessionError::NotFound(*id))?;
        if session.finalize(answers, result) {
            Ok(())
        } else {
            Err(SessionError::AlreadyAnswered(*id))
        }
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
