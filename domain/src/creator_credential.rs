//! Credential Service: validated CRUD over stored YouTube creator credentials.

use crate::creator_credentials::Model;
use crate::creator_status::CreatorStatus;
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::Id;
use email_address::EmailAddress;
use entity_api::query::IntoQueryFilterMap;
use entity_api::{creator_credential, creator_credentials, query};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

pub use entity_api::creator_credential::{find_by_email, find_by_id};

/// Everything needed to store a freshly linked creator.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct NewCreatorCredential {
    #[schema(value_type = Uuid)]
    pub creator_id: Id,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Defaults to `active`
    #[serde(default)]
    pub status: Option<CreatorStatus>,
}

/// Partial update. Each field is either present (overwrite) or absent (keep).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct CreatorCredentialPatch {
    #[schema(value_type = Option<Uuid>)]
    pub creator_id: Option<Id>,
    pub email: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub status: Option<CreatorStatus>,
}

impl CreatorCredentialPatch {
    /// Shallow-merges the present fields onto `existing`. Timestamps and `id` are left
    /// alone; the store refreshes `updated_at` when the merged record is written.
    pub fn apply_to(self, existing: Model) -> Model {
        Model {
            creator_id: self.creator_id.unwrap_or(existing.creator_id),
            email: self.email.unwrap_or(existing.email),
            access_token: self.access_token.unwrap_or(existing.access_token),
            refresh_token: self.refresh_token.unwrap_or(existing.refresh_token),
            status: self.status.unwrap_or(existing.status),
            ..existing
        }
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), Error> {
    if EmailAddress::is_valid(email) {
        Ok(())
    } else {
        warn!("Rejecting malformed creator email: {email}");
        Err(Error::invalid_argument("email must be a valid address"))
    }
}

pub async fn create(db: &DatabaseConnection, new: NewCreatorCredential) -> Result<Model, Error> {
    validate_email(&new.email)?;

    debug!(
        "Creating creator credential for creator_id {} ({})",
        new.creator_id, new.email
    );

    let now = chrono::Utc::now();
    let model = Model {
        id: Id::nil(),
        creator_id: new.creator_id,
        email: new.email,
        access_token: new.access_token,
        refresh_token: new.refresh_token,
        status: new.status.unwrap_or_default(),
        created_at: now.into(),
        updated_at: now.into(),
    };

    let creator = creator_credential::create(db, model).await.map_err(|e| {
        warn!("Creator credential creation failed: {e:?}");
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Creator credential not created".to_string(),
            )),
        }
    })?;

    info!("Created creator credential {}", creator.id);
    Ok(creator)
}

/// Search by any combination of id, creator_id, email and status. Absent filter
/// fields never constrain the result; an empty filter returns every record.
pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let query_filter_map = params.into_query_filter_map();
    debug!("Searching creator credentials with {query_filter_map:?}");

    let creators = query::find_by::<creator_credentials::Entity, creator_credentials::Column>(
        db,
        query_filter_map,
    )
    .await
    .inspect_err(|e| warn!("Creator credential search failed: {e:?}"))?;

    Ok(creators)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    patch: CreatorCredentialPatch,
) -> Result<Model, Error> {
    if id.is_nil() {
        return Err(Error::invalid_argument("id is required"));
    }

    if let Some(email) = &patch.email {
        validate_email(email)?;
    }

    debug!("Updating creator credential {id} with {patch:?}");

    let existing = find_by_id(db, id).await?.ok_or_else(|| {
        warn!("Creator credential not found: {id}");
        Error::not_found()
    })?;

    let creator = creator_credential::update(db, id, patch.apply_to(existing))
        .await
        .inspect_err(|e| warn!("Creator credential update failed for {id}: {e:?}"))?;

    Ok(creator)
}

/// Deletes the credential and returns a confirmation message naming `id`.
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<String, Error> {
    if find_by_id(db, id).await?.is_none() {
        warn!("Refusing to delete unknown creator credential {id}");
        return Err(Error::not_found());
    }

    creator_credential::delete_by_id(db, id)
        .await
        .inspect_err(|e| warn!("Creator credential deletion failed for {id}: {e:?}"))?;

    info!("Deleted creator credential {id}");
    Ok(format!("Creator credential with id {id} deleted successfully"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::EntityErrorKind;

    pub(crate) fn stored(email: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            creator_id: Id::new_v4(),
            email: email.to_string(),
            access_token: "t1".to_string(),
            refresh_token: "r1".to_string(),
            status: CreatorStatus::Active,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let existing = stored("a@x.com");
        let patch = CreatorCredentialPatch {
            access_token: Some("t2".to_string()),
            ..Default::default()
        };

        let merged = patch.apply_to(existing.clone());

        assert_eq!(merged.access_token, "t2");
        assert_eq!(merged.refresh_token, "r1");
        assert_eq!(merged.email, existing.email);
        assert_eq!(merged.creator_id, existing.creator_id);
        assert_eq!(merged.status, existing.status);
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.created_at, existing.created_at);
    }

    #[test]
    fn patch_can_set_an_empty_refresh_token() {
        let patch = CreatorCredentialPatch {
            refresh_token: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(patch.apply_to(stored("a@x.com")).refresh_token, "");
    }

    #[test]
    fn empty_patch_is_identity() {
        let existing = stored("a@x.com");
        assert_eq!(
            CreatorCredentialPatch::default().apply_to(existing.clone()),
            existing
        );
    }

    #[test]
    fn new_credential_status_defaults_to_active_when_omitted() {
        let new: NewCreatorCredential = serde_json::from_value(serde_json::json!({
            "creator_id": Id::new_v4(),
            "email": "a@x.com",
            "access_token": "t1",
            "refresh_token": "r1"
        }))
        .unwrap();

        assert_eq!(new.status, None);
        assert_eq!(new.status.unwrap_or_default(), CreatorStatus::Active);
    }

    #[test]
    fn validate_email_rejects_garbage() {
        assert!(validate_email("a@x.com").is_ok());
        let err = validate_email("not-an-email").unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::InvalidArgument(_))
        ));
        assert_ne!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::tests::stored;
    use super::*;
    use crate::error::EntityErrorKind;
    use entity_api::query::QueryFilterMap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn not_found() -> DomainErrorKind {
        DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
    }

    #[tokio::test]
    async fn create_defaults_status_and_returns_stored_fields() -> Result<(), Error> {
        let record = stored("a@x.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![record.clone()]])
            .into_connection();

        let created = create(
            &db,
            NewCreatorCredential {
                creator_id: record.creator_id,
                email: record.email.clone(),
                access_token: "t1".to_string(),
                refresh_token: "r1".to_string(),
                status: None,
            },
        )
        .await?;

        assert_eq!(created.status, CreatorStatus::Active);
        assert_eq!(created.creator_id, record.creator_id);
        assert_eq!(created.email, "a@x.com");
        assert_eq!(created.access_token, "t1");
        assert_eq!(created.refresh_token, "r1");
        assert!(!created.id.is_nil());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("active"));
        Ok(())
    }

    #[tokio::test]
    async fn create_wraps_store_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![sea_orm::DbErr::Custom("duplicate".to_string())])
            .into_connection();

        let err = create(
            &db,
            NewCreatorCredential {
                creator_id: Id::new_v4(),
                email: "a@x.com".to_string(),
                access_token: "t1".to_string(),
                refresh_token: String::new(),
                status: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Other(
                "Creator credential not created".to_string()
            ))
        );
        assert!(err.source.is_some());
    }

    #[tokio::test]
    async fn create_rejects_malformed_email_without_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = create(
            &db,
            NewCreatorCredential {
                creator_id: Id::new_v4(),
                email: "nope".to_string(),
                access_token: "t1".to_string(),
                refresh_token: "r1".to_string(),
                status: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::InvalidArgument(_))
        ));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn find_by_with_empty_filter_returns_all_records() -> Result<(), Error> {
        let records = vec![stored("a@x.com"), stored("b@x.com")];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![records.clone()])
            .into_connection();

        assert_eq!(find_by(&db, QueryFilterMap::new()).await?, records);
        Ok(())
    }

    #[tokio::test]
    async fn update_on_missing_id_is_not_found_and_never_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let err = update(
            &db,
            Id::new_v4(),
            CreatorCredentialPatch {
                access_token: Some("t2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.error_kind, not_found());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
        assert!(!log.contains("INSERT"));
    }

    #[tokio::test]
    async fn update_with_nil_id_is_invalid_argument() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = update(&db, Id::nil(), CreatorCredentialPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn delete_on_missing_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let err = delete_by_id(&db, Id::new_v4()).await.unwrap_err();

        assert_eq!(err.error_kind, not_found());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("DELETE"));
    }

    #[tokio::test]
    async fn create_read_update_delete_scenario() -> Result<(), Error> {
        let created = stored("a@x.com");
        let mut updated = created.clone();
        updated.access_token = "t2".to_string();
        updated.updated_at = entity_api::creator_credential::next_updated_at(created.updated_at);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // create
            .append_query_results(vec![vec![created.clone()]])
            // find_by_email
            .append_query_results(vec![vec![created.clone()]])
            // update: service existence check, store existence check, UPDATE .. RETURNING
            .append_query_results(vec![vec![created.clone()]])
            .append_query_results(vec![vec![created.clone()]])
            .append_query_results(vec![vec![updated.clone()]])
            // find_by_id after update
            .append_query_results(vec![vec![updated.clone()]])
            // delete: existence check
            .append_query_results(vec![vec![updated.clone()]])
            // find_by_id after delete
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let record = create(
            &db,
            NewCreatorCredential {
                creator_id: created.creator_id,
                email: "a@x.com".to_string(),
                access_token: "t1".to_string(),
                refresh_token: "r1".to_string(),
                status: None,
            },
        )
        .await?;
        assert_eq!(record.status, CreatorStatus::Active);
        assert!(!record.id.is_nil());

        assert_eq!(find_by_email(&db, "a@x.com").await?, Some(record.clone()));

        let after_update = update(
            &db,
            record.id,
            CreatorCredentialPatch {
                access_token: Some("t2".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert!(after_update.updated_at > record.updated_at);

        let fetched = find_by_id(&db, record.id).await?.unwrap();
        assert_eq!(fetched.access_token, "t2");
        assert_eq!(fetched.refresh_token, "r1");

        let message = delete_by_id(&db, record.id).await?;
        assert!(message.contains(&record.id.to_string()));

        assert_eq!(find_by_id(&db, record.id).await?, None);
        Ok(())
    }
}
