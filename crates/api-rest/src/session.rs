//! Per-client session store.
//!
//! Each session owns a private [`PatientRegistry`]; registries are never shared between
//! sessions. The map sits behind a `tokio::sync::RwLock`, so mutations of one session
//! are serialised with respect to each other.

use chart_core::{CoreConfig, PatientError, PatientRegistry};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(Uuid),
    #[error(transparent)]
    Patient(#[from] PatientError),
}

#[derive(Debug)]
struct Session {
    registry: PatientRegistry,
    created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    cfg: Arc<CoreConfig>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Opens a new session with a fresh registry and returns its id and patient count.
    ///
    /// When the store is full the oldest session is dropped first.
    pub async fn create(&self) -> (Uuid, usize) {
        let registry = self.cfg.new_registry();
        let patient_count = registry.len();
        let id = Uuid::new_v4();

        let mut sessions = self.sessions.write().await;
        while sessions.len() >= self.cfg.max_sessions() {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.created_at)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session_id = %oldest, "evicted oldest session");
        }
        sessions.insert(
            id,
            Session {
                registry,
                created_at: Utc::now(),
            },
        );

        (id, patient_count)
    }

    /// Drops a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Runs a read-only operation against a session's registry.
    pub async fn read<T>(
        &self,
        id: Uuid,
        op: impl FnOnce(&PatientRegistry) -> Result<T, PatientError>,
    ) -> Result<T, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::UnknownSession(id))?;
        Ok(op(&session.registry)?)
    }

    /// Runs a mutating operation against a session's registry under the write lock.
    pub async fn write<T>(
        &self,
        id: Uuid,
        op: impl FnOnce(&mut PatientRegistry) -> Result<T, PatientError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        Ok(op(&mut session.registry)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(seed: bool, max_sessions: usize) -> SessionStore {
        SessionStore::new(Arc::new(CoreConfig::new(seed, max_sessions).unwrap()))
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = store(true, 8);
        let (a, count) = store.create().await;
        let (b, _) = store.create().await;
        assert_eq!(count, 2);

        store
            .write(a, |r| r.add_patient("Alice", 40, "Female", "Black", "HIV"))
            .await
            .expect("add should succeed");

        assert_eq!(store.read(a, |r| Ok(r.len())).await.unwrap(), 3);
        assert_eq!(store.read(b, |r| Ok(r.len())).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = store(false, 8);
        let err = store
            .read(Uuid::new_v4(), |r| Ok(r.len()))
            .await
            .expect_err("should be unknown");
        assert!(matches!(err, SessionError::UnknownSession(_)));
    }

    #[tokio::test]
    async fn test_core_errors_pass_through() {
        let store = store(true, 8);
        let (id, _) = store.create().await;
        let err = store
            .read(id, |r| r.find_by_name("nobody").map(|p| p.id))
            .await
            .expect_err("should be not found");
        assert!(matches!(err, SessionError::Patient(PatientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_full_store_evicts_oldest() {
        let store = store(false, 2);
        let (first, _) = store.create().await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let (second, _) = store.create().await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let (third, _) = store.create().await;

        assert_eq!(store.len().await, 2);
        assert!(!store.contains(first).await);
        assert!(store.contains(second).await);
        assert!(store.contains(third).await);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store(false, 2);
        let (id, _) = store.create().await;
        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
    }
}
