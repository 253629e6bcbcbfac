//! SeaORM Entity for the creator_credentials table.
//! One row per creator whose YouTube channel has been linked through OAuth.

use crate::creator_status::CreatorStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::creator_credentials::Model)]
#[sea_orm(schema_name = "youtube_creator", table_name = "creator_credentials")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Externally supplied identifier of the creator, distinct from `id`
    #[sea_orm(unique)]
    #[schema(value_type = Uuid)]
    pub creator_id: Id,

    #[sea_orm(unique)]
    pub email: String,

    // Bearer credentials are write-only from the API's point of view
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Empty when Google did not issue a refresh token
    #[serde(skip_serializing)]
    pub refresh_token: String,

    #[serde(default)]
    pub status: CreatorStatus,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
