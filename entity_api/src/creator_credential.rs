use super::error::Error;
use entity::creator_credentials::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::debug;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection,
};

/// Inserts a new creator credential. The store assigns `id` and both timestamps;
/// whatever the caller put in those fields is ignored.
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!(
        "Creating creator credential for creator_id: {}, email: {}",
        model.creator_id, model.email
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        creator_id: Set(model.creator_id),
        email: Set(model.email),
        access_token: Set(model.access_token),
        refresh_token: Set(model.refresh_token),
        status: Set(model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

/// Overwrites every mutable field of the record identified by `id` with the values in
/// `model` and refreshes `updated_at`. `id` and `created_at` are never touched.
pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?.ok_or_else(Error::not_found)?;

    debug!("Updating creator credential: {id}");

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        creator_id: Set(model.creator_id),
        email: Set(model.email),
        access_token: Set(model.access_token),
        refresh_token: Set(model.refresh_token),
        status: Set(model.status),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(next_updated_at(existing.updated_at)),
    };

    Ok(active_model.update(db).await?)
}

/// Deletes the record identified by `id`, failing with `RecordNotFound` when no row matched.
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        debug!("No creator credential to delete for id: {id}");
        return Err(Error::not_found());
    }

    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

/// Timestamp for a mutation of a record last touched at `previous`.
/// Always strictly later than `previous`, even when the wall clock is not.
pub fn next_updated_at(previous: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let floor = previous + chrono::Duration::microseconds(1);
    now.max(floor)
}
