use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::creator::IndexParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::creator_credential as CreatorCredentialApi;
use domain::creator_credential::{CreatorCredentialPatch, NewCreatorCredential};
use domain::Id;
use service::config::ApiVersion;

use log::*;

/// POST create a new creator credential
#[utoipa::path(
    post,
    path = "/creators",
    params(ApiVersion),
    request_body = domain::creator_credential::NewCreatorCredential,
    responses(
        (status = 201, description = "Successfully created a new creator credential", body = domain::creator_credentials::Model),
        (status = 422, description = "Unprocessable Entity"),
        (status = 500, description = "Creator credential not created, including when the creator_id or email is already taken")
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(new_creator): Json<NewCreatorCredential>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new creator credential for: {}", new_creator.email);

    let creator = CreatorCredentialApi::create(app_state.db_conn_ref(), new_creator).await?;

    debug!("New creator credential: {}", creator.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), creator)),
    ))
}

/// GET all creator credentials matching the (optional) filter fields
#[utoipa::path(
    get,
    path = "/creators",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved matching creator credentials", body = [domain::creator_credentials::Model]),
        (status = 400, description = "Missing or unsupported x-version header")
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all creator credentials with {params:?}");

    let creators = CreatorCredentialApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), creators)))
}

/// GET a particular creator credential specified by its id. `data` is null when absent.
#[utoipa::path(
    get,
    path = "/creators/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Creator credential id to retrieve")
    ),
    responses(
        (status = 200, description = "The creator credential, or null", body = Option<domain::creator_credentials::Model>)
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET creator credential by id: {id}");

    let creator = CreatorCredentialApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), creator)))
}

/// GET a particular creator credential by email. `data` is null when absent.
#[utoipa::path(
    get,
    path = "/creators/email/{email}",
    params(
        ApiVersion,
        ("email" = String, Path, description = "Creator email to look up")
    ),
    responses(
        (status = 200, description = "The creator credential, or null", body = Option<domain::creator_credentials::Model>)
    )
)]
pub async fn read_by_email(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET creator credential by email: {email}");

    let creator = CreatorCredentialApi::find_by_email(app_state.db_conn_ref(), &email).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), creator)))
}

#[utoipa::path(
    put,
    path = "/creators/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the creator credential to update"),
    ),
    request_body = domain::creator_credential::CreatorCredentialPatch,
    responses(
        (status = 200, description = "Successfully updated creator credential", body = domain::creator_credentials::Model),
        (status = 404, description = "Creator credential not found"),
        (status = 422, description = "Unprocessable Entity")
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(patch): Json<CreatorCredentialPatch>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update creator credential with id: {id}");

    let creator = CreatorCredentialApi::update(app_state.db_conn_ref(), id, patch).await?;

    debug!("Updated creator credential: {}", creator.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), creator)))
}

#[utoipa::path(
    delete,
    path = "/creators/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of the creator credential to delete"),
    ),
    responses(
        (status = 200, description = "Confirmation message naming the deleted id", body = String),
        (status = 404, description = "Creator credential not found")
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE creator credential by id: {id}");

    let message = CreatorCredentialApi::delete_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), message)))
}
