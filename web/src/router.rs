use crate::{controller::health_check_controller, params, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{creator_controller, youtube_controller};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "YouTube Creator API"
        ),
        paths(
            creator_controller::create,
            creator_controller::index,
            creator_controller::read,
            creator_controller::read_by_email,
            creator_controller::update,
            creator_controller::delete,
            health_check_controller::health_check,
            youtube_controller::auth_url,
            youtube_controller::callback,
            youtube_controller::channel,
            youtube_controller::upload,
        ),
        components(
            schemas(
                domain::creator_credentials::Model,
                domain::creator_status::CreatorStatus,
                domain::creator_credential::NewCreatorCredential,
                domain::creator_credential::CreatorCredentialPatch,
                domain::youtube::AuthorizationOutcome,
                params::youtube::CallbackParams,
            )
        ),
        tags(
            (name = "youtube_creator", description = "YouTube creator credentials & OAuth API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(creator_routes(app_state.clone()))
        .merge(health_routes())
        .merge(youtube_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn creator_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/creators", post(creator_controller::create))
        .route("/creators", get(creator_controller::index))
        .route("/creators/{id}", get(creator_controller::read))
        .route("/creators/{id}", put(creator_controller::update))
        .route("/creators/{id}", delete(creator_controller::delete))
        .route(
            "/creators/email/{email}",
            get(creator_controller::read_by_email),
        )
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn youtube_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/youtube/auth_url", get(youtube_controller::auth_url))
        .route("/youtube/callback", post(youtube_controller::callback))
        .route("/youtube/channels/{id}", get(youtube_controller::channel))
        .route("/youtube/videos", post(youtube_controller::upload))
        .with_state(app_state)
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::tests::{body_json, configured, test_state, versioned};
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use domain::creator_credentials::Model;
    use domain::creator_status::CreatorStatus;
    use domain::Id;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use tower::ServiceExt;

    fn stored(email: &str) -> Model {
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

    #[tokio::test]
    async fn create_returns_created_record_without_tokens() {
        let creator = stored("a@x.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![creator.clone()]])
            .into_connection();
        let app = define_routes(test_state(db, configured()));

        let body = serde_json::json!({
            "creator_id": creator.creator_id,
            "email": "a@x.com",
            "access_token": "t1",
            "refresh_token": "r1"
        });
        let response = app
            .oneshot(
                versioned("POST", "/creators")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["status_code"], 201);
        assert_eq!(json["data"]["email"], "a@x.com");
        assert_eq!(json["data"]["status"], "active");
        assert!(json["data"].get("access_token").is_none());
        assert!(json["data"].get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn read_unknown_id_returns_null_data() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();
        let app = define_routes(test_state(db, configured()));

        let response = app
            .oneshot(
                versioned("GET", &format!("/creators/{}", Id::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn index_with_empty_filters_returns_everything() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored("a@x.com"), stored("b@x.com")]])
            .into_connection();
        let app = define_routes(test_state(db, configured()));

        let response = app
            .oneshot(
                versioned("GET", "/creators?email=&status=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();
        let app = define_routes(test_state(db, configured()));

        let response = app
            .oneshot(
                versioned("DELETE", &format!("/creators/{}", Id::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_known_id_confirms_with_id() {
        let creator = stored("a@x.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![creator.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let app = define_routes(test_state(db, configured()));

        let response = app
            .oneshot(
                versioned("DELETE", &format!("/creators/{}", creator.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["data"]
            .as_str()
            .unwrap()
            .contains(&creator.id.to_string()));
    }

    #[tokio::test]
    async fn update_with_malformed_email_is_unprocessable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = define_routes(test_state(db, configured()));

        let response = app
            .oneshot(
                versioned("PUT", &format!("/creators/{}", Id::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"not-an-email"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
