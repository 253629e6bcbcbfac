use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standing of a creator's linked YouTube account.
///
/// Stored as plain text so that it can be matched by the generic column
/// filters in `entity_api::query`.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CreatorStatus {
    /// Tokens are usable for API calls
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    /// Linked but not currently used
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Disabled by an operator
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl std::fmt::Display for CreatorStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatorStatus::Active => write!(fmt, "active"),
            CreatorStatus::Inactive => write!(fmt, "inactive"),
            CreatorStatus::Suspended => write!(fmt, "suspended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::strum::IntoEnumIterator;

    #[test]
    fn default_status_is_active() {
        assert_eq!(CreatorStatus::default(), CreatorStatus::Active);
    }

    #[test]
    fn display_matches_stored_value() {
        for status in CreatorStatus::iter() {
            assert_eq!(status.to_string(), status.to_value());
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&CreatorStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");
    }
}
