use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

use crate::{
    model::{HasOwner, ResourceType, check_access},
    web::{AuthenticatedUser, WebError, WebResult},
    wizard::{CourseDraft, WizardStore},
};

/// One open authoring session.
#[derive(Debug)]
pub struct DraftSession {
    owner_id: Uuid,
    store: WizardStore,
    last_used: Instant,
}

impl HasOwner for DraftSession {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Every open session, keyed by draft id. A request holds the lock for exactly one
/// store action.
///
/// Sessions live until they are closed or sit unused for longer than the idle
/// limit passed to [`SessionRegistry::evict_idle`].
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, DraftSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `draft` on behalf of `owner_id`. A session already open on the same
    /// draft is kept as it is, owner and unsaved edits included, provided `actor`
    /// may touch it.
    #[tracing::instrument(skip_all, fields(draft_id = %draft.id()))]
    pub async fn open<R, F>(
        &self,
        actor: &AuthenticatedUser,
        owner_id: Uuid,
        draft: CourseDraft,
        f: F,
    ) -> WebResult<R>
    where
        F: FnOnce(&WizardStore) -> R,
    {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get_mut(&draft.id()) {
            check_access(actor, &*existing)
                .map_err(|e| WebError::resource_access(ResourceType::Draft, e))?;
            existing.last_used = Instant::now();
            tracing::debug!("draft session already open");
            return Ok(f(&existing.store));
        }

        let session = DraftSession {
            owner_id,
            store: WizardStore::new(draft),
            last_used: Instant::now(),
        };
        let result = f(&session.store);
        sessions.insert(session.store.draft().id(), session);
        tracing::debug!("draft session opened");
        Ok(result)
    }

    /// Runs `f` against the session's store if `actor` may touch it.
    pub async fn with_session<R, F>(&self, actor: &AuthenticatedUser, id: Uuid, f: F) -> WebResult<R>
    where
        F: FnOnce(&mut WizardStore) -> WebResult<R>,
    {
        self.with_owned_session(actor, id, |_, store| f(store)).await
    }

    /// Like [`SessionRegistry::with_session`], also handing `f` the id of the
    /// instructor the session belongs to, which may differ from `actor`.
    pub async fn with_owned_session<R, F>(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        f: F,
    ) -> WebResult<R>
    where
        F: FnOnce(Uuid, &mut WizardStore) -> WebResult<R>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(WebError::resource_not_found(ResourceType::Draft))?;
        check_access(actor, &*session)
            .map_err(|e| WebError::resource_access(ResourceType::Draft, e))?;

        session.last_used = Instant::now();
        f(session.owner_id, &mut session.store)
    }

    /// Drops the session. Saved copies are untouched.
    pub async fn close(&self, actor: &AuthenticatedUser, id: Uuid) -> WebResult<()> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get(&id)
            .ok_or(WebError::resource_not_found(ResourceType::Draft))?;
        check_access(actor, session).map_err(|e| WebError::resource_access(ResourceType::Draft, e))?;

        sessions.remove(&id);
        tracing::debug!(draft_id = %id, "draft session closed");
        Ok(())
    }

    /// Drops every session unused for longer than `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_used.elapsed() <= max_idle);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "idle draft sessions dropped");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::web::UserRole;

    fn instructor() -> AuthenticatedUser {
        AuthenticatedUser::new(Uuid::new_v4(), UserRole::Instructor)
    }

    async fn open_for(registry: &SessionRegistry, owner: &AuthenticatedUser) -> Uuid {
        registry
            .open(owner, owner.user_id(), CourseDraft::new(), |store| store.draft().id())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sessions_are_owned() {
        let registry = SessionRegistry::new();
        let owner = instructor();
        let id = open_for(&registry, &owner).await;

        let section = registry
            .with_session(&owner, id, |store| Ok(store.add_section()))
            .await
            .unwrap();

        let stranger = instructor();
        let denied = registry
            .with_session(&stranger, id, |store| Ok(store.delete_section(section)))
            .await;
        assert!(matches!(denied, Err(WebError::ResourceError(_))));
        assert!(registry.close(&stranger, id).await.is_err());

        let admin = AuthenticatedUser::admin();
        let count = registry
            .with_session(&admin, id, |store| Ok(store.curriculum().sections().len()))
            .await
            .unwrap();
        assert_eq!(count, 1);

        registry.close(&owner, id).await.unwrap();
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_reopen_by_stranger_is_forbidden() {
        let registry = SessionRegistry::new();
        let owner = instructor();
        let draft = CourseDraft::new();
        registry
            .open(&owner, owner.user_id(), draft.clone(), |_| ())
            .await
            .unwrap();

        let stranger = instructor();
        let result = registry
            .open(&stranger, stranger.user_id(), draft, |_| ())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_admin_reopen_keeps_owner_and_edits() {
        let registry = SessionRegistry::new();
        let owner = instructor();
        let draft = CourseDraft::new();
        let id = draft.id();
        registry
            .open(&owner, owner.user_id(), draft.clone(), |_| ())
            .await
            .unwrap();
        registry
            .with_session(&owner, id, |store| Ok(store.add_section()))
            .await
            .unwrap();

        let admin = AuthenticatedUser::admin();
        let sections = registry
            .open(&admin, admin.user_id(), draft, |store| {
                store.curriculum().sections().len()
            })
            .await
            .unwrap();
        assert_eq!(sections, 1);

        let (session_owner, sections) = registry
            .with_owned_session(&owner, id, |owner_id, store| {
                Ok((owner_id, store.curriculum().sections().len()))
            })
            .await
            .unwrap();
        assert_eq!(session_owner, owner.user_id());
        assert_eq!(sections, 1);
    }

    #[tokio::test]
    async fn test_admin_sees_the_session_owner() {
        let registry = SessionRegistry::new();
        let owner = instructor();
        let id = open_for(&registry, &owner).await;

        let admin = AuthenticatedUser::admin();
        let session_owner = registry
            .with_owned_session(&admin, id, |owner_id, _| Ok(owner_id))
            .await
            .unwrap();
        assert_eq!(session_owner, owner.user_id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let registry = SessionRegistry::new();
        let owner = instructor();
        let stale = open_for(&registry, &owner).await;
        let busy = open_for(&registry, &owner).await;

        tokio::time::advance(Duration::from_secs(90)).await;
        registry
            .with_session(&owner, busy, |store| Ok(store.current_step()))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
        assert_eq!(registry.len().await, 1);
        let gone = registry.with_session(&owner, stale, |_| Ok(())).await;
        assert!(matches!(gone, Err(WebError::ResourceError(_))));
    }
}
