use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::recommendation::models::RecommendationRecord;
use crate::session::assembler::merge;

/// Opaque session token. Random (UUID v4), so it doubles as the bearer
/// credential for fetching a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Answered,
}

/// Answers and result, stored together exactly once.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub answers: Profile,
    pub result: RecommendationRecord,
}

/// One student's progress. The profile is fixed at creation; the outcome is
/// written at most once, while the submission lock is held.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    profile: Profile,
    created_at: DateTime<Utc>,
    submission: Mutex<()>,
    outcome: OnceLock<Outcome>,
}

impl Session {
    pub fn new(id: SessionId, profile: Profile) -> Self {
        Self {
            id,
            profile,
            created_at: Utc::now(),
            submission: Mutex::new(()),
            outcome: OnceLock::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    pub fn state(&self) -> SessionState {
        if self.outcome.get().is_some() {
            SessionState::Answered
        } else {
            SessionState::Created
        }
    }

    /// Serializes submissions for this session only.
    pub async fn begin_submission(&self) -> MutexGuard<'_, ()> {
        self.submission.lock().await
    }

    /// Profile with the stored answers merged over it, once answered.
    pub fn combined_profile(&self) -> Option<Profile> {
        self.outcome().map(|o| merge(&self.profile, &o.answers))
    }

    /// Returns false if an outcome was already stored; the existing one is kept.
    pub(crate) fn finalize(&self, answers: Profile, result: RecommendationRecord) -> bool {
        self.outcome
            .set(Outcome { answers, result })
            .is_ok()
    }
}
