use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::youtube::CallbackParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::Id;
use service::config::ApiVersion;

use log::*;

/// GET the Google consent URL a creator must visit to link their channel
#[utoipa::path(
    get,
    path = "/youtube/auth_url",
    params(ApiVersion),
    responses(
        (status = 200, description = "Authorization URL", body = String),
        (status = 500, description = "YouTube OAuth client is not configured")
    )
)]
pub async fn auth_url(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET YouTube authorization URL");

    let url = app_state.youtube.build_authorization_url()?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), url)))
}

/// POST the authorization code Google redirected back with
#[utoipa::path(
    post,
    path = "/youtube/callback",
    params(ApiVersion),
    request_body = crate::params::youtube::CallbackParams,
    responses(
        (status = 200, description = "Creator linked", body = domain::youtube::AuthorizationOutcome),
        (status = 422, description = "Missing authorization code"),
        (status = 502, description = "Google rejected the code")
    )
)]
pub async fn callback(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(params): Json<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST YouTube OAuth callback");

    let outcome = app_state
        .youtube
        .complete_authorization(app_state.db_conn_ref(), &params.code, params.email)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), outcome)))
}

/// GET the YouTube channel of the creator behind a credential
#[utoipa::path(
    get,
    path = "/youtube/channels/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Creator credential id")
    ),
    responses(
        (status = 200, description = "Channel resource as returned by YouTube", body = Object),
        (status = 404, description = "Creator credential not found"),
        (status = 409, description = "Credential has no access token"),
        (status = 502, description = "YouTube rejected the request")
    )
)]
pub async fn channel(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET YouTube channel for creator credential: {id}");

    let channel = app_state
        .youtube
        .fetch_channel_info(app_state.db_conn_ref(), id)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), channel)))
}

/// POST a video upload. Binary uploads are not accepted through this API.
#[utoipa::path(
    post,
    path = "/youtube/videos",
    params(ApiVersion),
    responses(
        (status = 501, description = "Video upload requires a binary-capable endpoint")
    )
)]
pub async fn upload(CompareApiVersion(_v): CompareApiVersion) -> impl IntoResponse {
    debug!("POST YouTube video upload rejected");

    (
        StatusCode::NOT_IMPLEMENTED,
        "Video upload requires a binary-capable endpoint",
    )
}
