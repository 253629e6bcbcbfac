use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /youtube/callback`
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CallbackParams {
    pub(crate) code: String,
    /// Stored as the creator's email; a placeholder is used when absent
    #[serde(default)]
    pub(crate) email: Option<String>,
}
