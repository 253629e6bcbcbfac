use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use log::*;
use service::config::ApiVersion;

/// Rejects any request whose `x-version` header is missing or names an
/// unsupported API version. Yields the requested version on success.
pub(crate) struct CompareApiVersion(pub String);

impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let version = parts
            .headers
            .get(ApiVersion::field_name())
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Missing {} header", ApiVersion::field_name()),
                )
            })?;

        if !ApiVersion::is_supported(version) {
            debug!("Rejecting request for unsupported API version {version}");
            return Err((
                StatusCode::BAD_REQUEST,
                format!("API version {version} is not supported"),
            ));
        }

        Ok(CompareApiVersion(version.to_string()))
    }
}
