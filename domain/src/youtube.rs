//! OAuth lifecycle for linked YouTube creators.
//!
//! A credential moves from unauthenticated (no record) to active once the
//! authorization code has been exchanged, and is treated as expired whenever
//! Google stops vouching for its access token. Expired credentials are
//! refreshed on demand before an upload.

use crate::creator_credentials::Model;
use crate::creator_status::CreatorStatus;
use crate::error::Error;
use crate::gateway::youtube::{VideoMetadata, YouTubeClient};
use crate::Id;
use dashmap::DashMap;
use entity_api::creator_credential;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::config::Config;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// Stored when Google does not tell us who the creator is.
pub const PLACEHOLDER_EMAIL: &str = "unknown@unknown.com";

const AUTHORIZATION_SUCCESS_MESSAGE: &str = "Successfully authenticated with YouTube";

/// What a completed consent flow hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthorizationOutcome {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub message: String,
}

/// Coordinates the OAuth lifecycle of creator credentials.
///
/// Refreshes are serialized per credential: two requests that find the same
/// expired token wait on one lock, and the second reuses whatever the first stored
/// instead of spending the refresh token again.
pub struct LifecycleManager {
    client: YouTubeClient,
    refresh_locks: DashMap<Id, Arc<Mutex<()>>>,
}

impl LifecycleManager {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client: YouTubeClient::new(config)?,
            refresh_locks: DashMap::new(),
        })
    }

    /// URL of the Google consent screen for the configured OAuth client.
    pub fn build_authorization_url(&self) -> Result<String, Error> {
        self.client.authorization_url()
    }

    /// Exchanges `code` for tokens and stores a new active credential.
    pub async fn complete_authorization(
        &self,
        db: &DatabaseConnection,
        code: &str,
        email: Option<String>,
    ) -> Result<AuthorizationOutcome, Error> {
        if code.is_empty() {
            return Err(Error::invalid_argument("Authorization code is required"));
        }

        // The code is single use, so reject bad input before spending it.
        let email = email
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
        crate::creator_credential::validate_email(&email)?;

        let tokens = self.client.exchange_code(code).await?;
        let access_token = tokens.access_token.ok_or_else(|| {
            warn!("Google token response did not include an access token");
            Error::upstream("No access token received")
        })?;

        let creator = crate::creator_credential::create(
            db,
            crate::creator_credential::NewCreatorCredential {
                creator_id: Id::new_v4(),
                email,
                access_token,
                refresh_token: tokens.refresh_token.unwrap_or_default(),
                status: Some(CreatorStatus::Active),
            },
        )
        .await?;

        info!("Linked YouTube creator {}", creator.id);

        Ok(AuthorizationOutcome {
            id: creator.id,
            message: AUTHORIZATION_SUCCESS_MESSAGE.to_string(),
        })
    }

    /// Channel details for the creator behind credential `id`, as returned by YouTube.
    pub async fn fetch_channel_info(
        &self,
        db: &DatabaseConnection,
        id: Id,
    ) -> Result<serde_json::Value, Error> {
        let creator = find_credential(db, id).await?;

        if creator.access_token.is_empty() {
            return Err(Error::invalid_state("No access token available"));
        }

        self.client.channel_info(&creator.access_token).await
    }

    /// Uploads `payload` on behalf of credential `id`, refreshing its access token first
    /// when Google no longer accepts it.
    pub async fn upload_media(
        &self,
        db: &DatabaseConnection,
        id: Id,
        payload: Vec<u8>,
        metadata: &VideoMetadata,
    ) -> Result<serde_json::Value, Error> {
        let creator = find_credential(db, id).await?;

        let access_token = if self.check_token_validity(&creator.access_token).await {
            creator.access_token
        } else {
            self.refresh_stored_token(db, creator).await?
        };

        self.client
            .upload_video(&access_token, payload, metadata)
            .await
    }

    /// True only when Google reports a positive remaining lifetime for `token`.
    /// Every failure counts as invalid.
    pub async fn check_token_validity(&self, token: &str) -> bool {
        match self.client.token_info(token).await {
            Ok(info) => info.expires_in.is_some_and(|expires_in| expires_in > 0),
            Err(e) => {
                debug!("Token validity check failed: {e:?}");
                false
            }
        }
    }

    /// Trades `refresh_token` for a new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, Error> {
        let tokens = self.client.refresh_token(refresh_token).await?;
        tokens.access_token.ok_or_else(|| {
            warn!("Google refresh response did not include an access token");
            Error::upstream("No access token received")
        })
    }

    async fn refresh_stored_token(
        &self,
        db: &DatabaseConnection,
        stale: Model,
    ) -> Result<String, Error> {
        let id = stale.id;
        debug!("Access token for creator credential {id} is no longer valid, refreshing");

        let lock = self
            .refresh_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.refresh_under_lock(db, stale).await
        };

        // Drop the map entry once no other request is holding or waiting on it.
        drop(lock);
        self.refresh_locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn refresh_under_lock(
        &self,
        db: &DatabaseConnection,
        stale: Model,
    ) -> Result<String, Error> {
        let id = stale.id;

        // Another request may have refreshed while we waited on the lock.
        let current = find_credential(db, id).await?;
        if current.access_token != stale.access_token {
            debug!("Access token for creator credential {id} was refreshed concurrently");
            return Ok(current.access_token);
        }

        if current.refresh_token.is_empty() {
            warn!("Creator credential {id} has no refresh token");
            return Err(Error::invalid_state("No refresh token available"));
        }

        let access_token = self.refresh_access_token(&current.refresh_token).await?;

        creator_credential::update(
            db,
            id,
            Model {
                access_token: access_token.clone(),
                ..current
            },
        )
        .await
        .map_err(|e| {
            warn!("Failed to store refreshed access token for {id}: {e:?}");
            Error::from(e)
        })?;

        info!("Refreshed access token for creator credential {id}");
        Ok(access_token)
    }
}

async fn find_credential(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    crate::creator_credential::find_by_id(db, id)
        .await?
        .ok_or_else(|| {
            warn!("Creator credential not found: {id}");
            Error::not_found()
        })
}
