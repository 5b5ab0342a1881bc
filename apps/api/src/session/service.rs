//! Session flow — the three steps that drive a session from profile to result.
//!
//! Flow: start_session → submit_answers (merge → recommend → attach) → fetch_result.
//!
//! A session moves Created → Answered exactly once. A failed submission leaves
//! it in Created with nothing stored, so the student can resubmit.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::recommendation::models::RecommendationRecord;
use crate::recommendation::recommender::{RecommendError, Recommender};
use crate::session::assembler::merge;
use crate::session::models::{SessionId, SessionState};
use crate::session::store::{SessionError, SessionStore};

/// Stored result together with the merged profile it was computed from.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub result: RecommendationRecord,
    pub profile: Profile,
}

pub fn start_session(store: &SessionStore, profile: Profile) -> SessionId {
    let id = store.create(profile);
    info!("Session {id} started");
    id
}

/// Merges answers over the profile, asks the recommender, and stores both.
///
/// The recommendation is bounded by `timeout`; on expiry the in-flight call is
/// dropped and the submission fails as an upstream error.
pub async fn submit_answers(
    store: &SessionStore,
    recommender: &dyn Recommender,
    timeout: Duration,
    id: &SessionId,
    answers: Profile,
) -> Result<SessionId, AppError> {
    let session = store.get(id).ok_or(SessionError::NotFound(*id))?;

    // Held across the recommendation call: a concurrent duplicate waits here,
    // then observes Answered and is rejected.
    let _submission = session.begin_submission().await;
    if session.state() == SessionState::Answered {
        warn!("Session {id} already answered; rejecting resubmission");
        return Err(SessionError::AlreadyAnswered(*id).into());
    }

    let combined = merge(session.profile(), &answers);
    let result = match tokio::time::timeout(timeout, recommender.recommend(&combined)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("Session {id}: recommendation via {} failed: {e}", recommender.backend());
            return Err(e.into());
        }
        Err(_) => {
            warn!(
                "Session {id}: recommendation via {} timed out after {}s",
                recommender.backend(),
                timeout.as_secs()
            );
            return Err(RecommendError::Upstream(format!(
                "timed out after {}s",
                timeout.as_secs()
            ))
            .into());
        }
    };

    store.attach_answers_and_result(id, answers, result)?;
    info!(
        "Session {id} answered via {} backend, {}s after start",
        recommender.backend(),
        (Utc::now() - session.created_at()).num_seconds()
    );
    Ok(session.id())
}

/// Returns the stored result. Unknown and not-yet-answered sessions are both not-found.
pub fn fetch_result(store: &SessionStore, id: &SessionId) -> Result<SessionResult, AppError> {
    let session = store.get(id).ok_or(SessionError::NotFound(*id))?;
    let outcome = session.outcome().ok_or(SessionError::NotFound(*id))?;
    let profile = session
        .combined_profile()
        .ok_or(SessionError::NotFound(*id))?;

    Ok(SessionResult {
        result: outcome.result.clone(),
        profile,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::recommendation::fallback::FallbackRecord;
    use crate::recommendation::recommender::FallbackRecommender;
    use crate::session::assembler::{normalize_answers, AnswerValue};

    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Fails the first `failures` calls with a schema violation, then succeeds.
    struct FlakyRecommender {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Recommender for FlakyRecommender {
        async fn recommend(&self, _: &Profile) -> Result<RecommendationRecord, RecommendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(RecommendError::Schema("expected value at line 1".to_string()))
            } else {
                Ok(FallbackRecord::builtin().unwrap().record)
            }
        }

        fn backend(&self) -> &'static str {
            "flaky"
        }
    }

    struct SlowRecommender {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Recommender for SlowRecommender {
        async fn recommend(&self, _: &Profile) -> Result<RecommendationRecord, RecommendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(FallbackRecord::builtin().unwrap().record)
        }

        fn backend(&self) -> &'static str {
            "slow"
        }
    }

    fn fallback() -> FallbackRecommender {
        FallbackRecommender::new(FallbackRecord::builtin().unwrap())
    }

    fn profile(pairs: &[(&str, &str)]) -> Profile {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn multi(values: &[&str]) -> AnswerValue {
        AnswerValue::Multi(values.iter().map(|v| v.to_string()).collect())
    }

    #[tokio::test]
    async fn test_end_to_end_in_fallback_mode() {
        let store = SessionStore::new();
        let recommender = fallback();

        let s1 = start_session(&store, profile(&[("fullName", "Asha"), ("courseBranch", "CS")]));

        let mut raw = BTreeMap::new();
        raw.insert("q1".to_string(), multi(&["a", "b"]));
        raw.insert("q9".to_string(), multi(&[]));
        let answers = normalize_answers(&raw);

        let returned = submit_answers(&store, &recommender, TIMEOUT, &s1, answers)
            .await
            .unwrap();
        assert_eq!(returned, s1);

        let fetched = fetch_result(&store, &s1).unwrap();
        assert_eq!(fetched.result, FallbackRecord::builtin().unwrap().record);
        assert_eq!(
            fetched.profile,
            profile(&[
                ("fullName", "Asha"),
                ("courseBranch", "CS"),
                ("q1", "a, b"),
                ("q9", "None selected"),
            ])
        );
    }

    #[tokio::test]
    async fn test_fetch_before_submit_is_not_found() {
        let store = SessionStore::new();
        let id = start_session(&store, profile(&[("fullName", "Asha")]));
        assert!(matches!(
            fetch_result(&store, &id),
            Err(AppError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_unknown_session_is_not_found() {
        let store = SessionStore::new();
        assert!(matches!(
            fetch_result(&store, &SessionId::generate()),
            Err(AppError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_to_unknown_session_is_not_found() {
        let store = SessionStore::new();
        let result = submit_answers(
            &store,
            &fallback(),
            TIMEOUT,
            &SessionId::generate(),
            Profile::new(),
        )
        .await;
        assert!(matches!(result, Err(AppError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_second_submission_conflicts_and_keeps_result() {
        let store = SessionStore::new();
        let recommender = fallback();
        let id = start_session(&store, profile(&[("fullName", "Asha")]));

        submit_answers(&store, &recommender, TIMEOUT, &id, profile(&[("q2", "first")]))
            .await
            .unwrap();
        let before = fetch_result(&store, &id).unwrap();

        let second =
            submit_answers(&store, &recommender, TIMEOUT, &id, profile(&[("q2", "second")])).await;
        assert!(matches!(second, Err(AppError::AlreadyAnswered(_))));

        let after = fetch_result(&store, &id).unwrap();
        assert_eq!(after.result, before.result);
        assert_eq!(after.profile["q2"], "first");
    }

    #[tokio::test]
    async fn test_failed_recommendation_leaves_session_created_and_retry_succeeds() {
        let store = SessionStore::new();
        let recommender = FlakyRecommender {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        let id = start_session(&store, profile(&[("fullName", "Asha")]));

        let first = submit_answers(&store, &recommender, TIMEOUT, &id, profile(&[("q1", "x")])).await;
        assert!(matches!(first, Err(AppError::SchemaViolation(_))));

        let session = store.get(&id).unwrap();
        assert_eq!(session.state(), SessionState::Created);
        assert!(session.outcome().is_none());
        assert!(matches!(
            fetch_result(&store, &id),
            Err(AppError::SessionNotFound(_))
        ));

        submit_answers(&store, &recommender, TIMEOUT, &id, profile(&[("q1", "y")]))
            .await
            .unwrap();
        assert_eq!(fetch_result(&store, &id).unwrap().profile["q1"], "y");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_recommendation_times_out_as_upstream_failure() {
        let store = SessionStore::new();
        let recommender = SlowRecommender {
            delay: Duration::from_secs(600),
            calls: AtomicUsize::new(0),
        };
        let id = start_session(&store, Profile::new());

        let result = submit_answers(
            &store,
            &recommender,
            Duration::from_secs(5),
            &id,
            Profile::new(),
        )
        .await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
        assert_eq!(store.get(&id).unwrap().state(), SessionState::Created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_duplicate_submissions_apply_once() {
        let store = Arc::new(SessionStore::new());
        let recommender = Arc::new(SlowRecommender {
            delay: Duration::from_secs(2),
            calls: AtomicUsize::new(0),
        });
        let id = start_session(&store, profile(&[("fullName", "Asha")]));

        let spawn_submit = |label: &'static str| {
            let store = Arc::clone(&store);
            let recommender = Arc::clone(&recommender);
            tokio::spawn(async move {
                submit_answers(
                    &store,
                    recommender.as_ref(),
                    TIMEOUT,
                    &id,
                    profile(&[("q2", label)]),
                )
                .await
            })
        };

        let a = spawn_submit("a");
        let b = spawn_submit("b");
        let results = [a.await.unwrap(), b.await.unwrap()];

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::AlreadyAnswered(_))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(recommender.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_do_not_block_each_other() {
        let store = SessionStore::new();
        let recommender = SlowRecommender {
            delay: Duration::from_secs(2),
            calls: AtomicUsize::new(0),
        };
        let a = start_session(&store, Profile::new());
        let b = start_session(&store, Profile::new());

        let started = tokio::time::Instant::now();
        let (ra, rb) = tokio::join!(
            submit_answers(&store, &recommender, TIMEOUT, &a, Profile::new()),
            submit_answers(&store, &recommender, TIMEOUT, &b, Profile::new()),
        );
        assert!(ra.is_ok() && rb.is_ok());
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
