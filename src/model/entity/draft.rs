use crate::impl_paginatable_for;
use crate::model::access::{HasOwner, check_access};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseError, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use crate::wizard::CourseDraft;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A saved course draft. `draft` is the JSON form of [`CourseDraft`].
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DraftRecord {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    draft: serde_json::Value,
    updated_at: DateTime<Utc>,
}

/// A draft to store under `owner_id`, which is the instructor the draft belongs to
/// and not necessarily the caller doing the save.
#[derive(Debug)]
pub struct DraftRecordCreate {
    owner_id: Uuid,
    draft: CourseDraft,
}

impl DraftRecordCreate {
    pub fn new(owner_id: Uuid, draft: CourseDraft) -> Self {
        Self { owner_id, draft }
    }
}

impl ResourceTyped for DraftRecord {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::SavedDraft
    }
}

impl DraftRecord {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Decodes the stored draft, repairing derived fields and rejecting
    /// duplicated ids.
    pub fn draft(&self) -> DatabaseResult<CourseDraft> {
        let draft: CourseDraft = serde_json::from_value(self.draft.clone())?;
        Ok(draft.into_verified()?)
    }

    fn check_overwrite(&self, actor: &AuthenticatedUser, owner_id: Uuid) -> DatabaseResult<()> {
        check_access(actor, self)?;
        if self.owner_id != owner_id {
            return Err(DatabaseError::Forbidden);
        }
        Ok(())
    }

    /// Overwrites the stored copy of the draft, or inserts it on first save.
    /// A stored copy belonging to someone other than `data`'s owner is refused.
    pub async fn save(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: DraftRecordCreate,
    ) -> DatabaseResult<Self> {
        match Self::find_by_id(mm, actor, data.draft.id()).await? {
            Some(record) => {
                record.check_overwrite(actor, data.owner_id)?;
                record.update(mm, actor, data).await
            }
            None => Self::create(mm, actor, data).await,
        }
    }
}

#[async_trait]
impl CrudRepository<DraftRecord, DraftRecordCreate, Uuid> for DraftRecord {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: DraftRecordCreate,
    ) -> DatabaseResult<Self> {
        let json = serde_json::to_value(&data.draft)?;
        let result = sqlx::query_as(
            r#"
            INSERT INTO course_drafts (id, owner_id, title, draft, updated_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING *
            "#,
        )
        .bind(data.draft.id())
        .bind(data.owner_id)
        .bind(&data.draft.basics().title)
        .bind(&json)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }

    /// Replaces the stored draft. The owner never changes.
    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: DraftRecordCreate,
    ) -> DatabaseResult<Self> {
        let json = serde_json::to_value(&data.draft)?;
        let updated_at: DateTime<Utc> = sqlx::query_scalar(
            "UPDATE course_drafts SET title = $1, draft = $2, updated_at = now() WHERE id = $3 RETURNING updated_at",
        )
        .bind(&data.draft.basics().title)
        .bind(&json)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        self.title = data.draft.basics().title.clone();
        self.draft = json;
        self.updated_at = updated_at;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM course_drafts WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_drafts WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;

        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM course_drafts
            WHERE $1 OR owner_id = $2
            ORDER BY updated_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(actor.is_admin())
        .bind(actor.user_id())
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM course_drafts WHERE $1 OR owner_id = $2")
                .bind(actor.is_admin())
                .bind(actor.user_id())
                .fetch_one(mm.executor())
                .await?;

        Ok(result)
    }
}

impl_paginatable_for!(DraftRecord, DraftRecordCreate, Uuid);

impl HasOwner for DraftRecord {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curriculum::LectureDraft;
    use crate::web::UserRole;
    use crate::wizard::WizardStore;

    fn record(draft: serde_json::Value) -> DraftRecord {
        DraftRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: String::new(),
            draft,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_draft_decodes_and_repairs() {
        let mut store = WizardStore::default();
        let section = store.add_section();
        store.add_lecture(section, LectureDraft::default()).unwrap();

        let mut json = serde_json::to_value(store.draft()).unwrap();
        json["curriculum"]["sections"][0]["lectures"][0]["order"] = serde_json::json!(4);

        let draft = record(json).draft().unwrap();
        assert_eq!(draft.curriculum().sections()[0].lectures()[0].order(), 0);
        assert_eq!(draft.id(), store.draft().id());
    }

    #[test]
    fn test_admin_overwrites_under_the_instructor() {
        let saved = record(serde_json::Value::Null);
        let admin = AuthenticatedUser::admin();
        let instructor = AuthenticatedUser::new(saved.owner_id, UserRole::Instructor);

        assert!(saved.check_overwrite(&admin, saved.owner_id).is_ok());
        assert!(saved.check_overwrite(&instructor, saved.owner_id).is_ok());
        assert!(matches!(
            saved.check_overwrite(&admin, admin.user_id()),
            Err(DatabaseError::Forbidden)
        ));

        let stranger = AuthenticatedUser::new(Uuid::new_v4(), UserRole::Instructor);
        assert!(matches!(
            saved.check_overwrite(&stranger, stranger.user_id()),
            Err(DatabaseError::Forbidden)
        ));
    }

    #[test]
    fn test_draft_with_duplicate_sections_is_corrupt() {
        let mut store = WizardStore::default();
        store.add_section();

        let mut json = serde_json::to_value(store.draft()).unwrap();
        let copy = json["curriculum"]["sections"][0].clone();
        json["curriculum"]["sections"]
            .as_array_mut()
            .unwrap()
            .push(copy);

        assert!(matches!(
            record(json).draft(),
            Err(DatabaseError::CorruptDraft(_))
        ));
    }
}
