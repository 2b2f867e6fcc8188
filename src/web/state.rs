use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::course::{Course, Lesson};
use crate::model::{ResourceTyped, ResourceType};
use crate::progress::{ProgressSnapshot, ProgressStore};
use crate::quiz::QuizSession;
use crate::unlock::UnlockState;
use crate::utils::Clock;
use crate::web::{AuthenticatedUser, WebError, WebResult};

pub type SharedSession = Arc<Mutex<QuizSession>>;

#[derive(Debug)]
struct Entry {
    session: SharedSession,
    touched: DateTime<Utc>,
}

/// Open quiz sessions, keyed by session id.
///
/// A session untouched for `idle_timeout` is dropped, a committed one after
/// `committed_grace` so a repeated commit still sees its receipt.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
    committed_grace: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::minutes(30), Duration::minutes(5))
    }
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration, committed_grace: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
            committed_grace,
        }
    }

    /// Sweeps expired sessions, then registers `session`.
    pub async fn insert(&self, session: QuizSession, now: DateTime<Utc>) -> Uuid {
        let id = session.id();
        let mut sessions = self.sessions.lock().await;
        self.sweep_locked(&mut sessions, now);
        sessions.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(session)),
                touched: now,
            },
        );
        id
    }

    /// Looks up a session and marks it as used at `now`.
    pub async fn get(&self, id: Uuid, now: DateTime<Utc>) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&id)?;
        entry.touched = entry.touched.max(now);
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.lock().await.remove(&id).map(|e| e.session)
    }

    /// Drops every other open session the owner has on the same lesson.
    pub async fn retain_latest(&self, owner: Uuid, lesson_id: &str, keep: Uuid) {
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|id, entry| {
            if *id == keep {
                return true;
            }
            // a session busy in another request is left alone
            match entry.session.try_lock() {
                Ok(s) => s.owner() != owner || s.lesson().id() != lesson_id,
                Err(_) => true,
            }
        });
    }

    /// Drops idle and committed sessions that have outlived their window.
    /// Returns how many were removed.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.sweep_locked(&mut sessions, now)
    }

    fn sweep_locked(&self, sessions: &mut HashMap<Uuid, Entry>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let age = now - entry.touched;
            if age >= self.idle_timeout {
                return false;
            }
            match entry.session.try_lock() {
                Ok(s) => s.receipt().is_none() || age < self.committed_grace,
                Err(_) => true,
            }
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "expired quiz sessions dropped");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[derive(Clone)]
pub struct AppState {
    course: Arc<Course>,
    store: Arc<dyn ProgressStore>,
    sessions: SessionRegistry,
    clock: Clock,
    jwt: Arc<str>,
}

impl AppState {
    pub fn new(course: Arc<Course>, store: Arc<dyn ProgressStore>, clock: Clock, jwt: &str) -> Self {
        Self::with_sessions(course, store, clock, jwt, SessionRegistry::default())
    }

    pub fn with_sessions(
        course: Arc<Course>,
        store: Arc<dyn ProgressStore>,
        clock: Clock,
        jwt: &str,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            course,
            store,
            sessions,
            clock,
            jwt: Arc::from(jwt),
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    /// Stored progress of `user` and the lock state derived from it.
    pub async fn progress_of(
        &self,
        user: &AuthenticatedUser,
    ) -> WebResult<(ProgressSnapshot, UnlockState)> {
        let snapshot = self
            .store
            .load_progress(user.user_id())
            .await
            .map_err(|e| WebError::resource_fetch_error(ResourceType::Progress, e))?;
        let unlock = UnlockState::derive(&self.course, &snapshot.completed_lesson_ids);
        Ok((snapshot, unlock))
    }

    /// Looks up a lesson the user is allowed to open.
    pub async fn unlocked_lesson(
        &self,
        user: &AuthenticatedUser,
        lesson_id: &str,
    ) -> WebResult<(&Lesson, ProgressSnapshot, UnlockState)> {
        let lesson = self
            .course
            .lesson(lesson_id)
            .ok_or(WebError::resource_not_found(Lesson::get_resource_type()))?;

        let (snapshot, unlock) = self.progress_of(user).await?;
        if !unlock.is_unlocked(lesson_id) {
            return Err(WebError::resource_forbidden(Lesson::get_resource_type()));
        }
        Ok((lesson, snapshot, unlock))
    }
}
