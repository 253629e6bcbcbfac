//! Google OAuth and YouTube Data API client.
//!
//! Covers the authorization URL, code exchange, token refresh, token
//! introspection, channel lookup and video upload. Each method is a single
//! HTTP round trip; nothing is retried.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use utoipa::ToSchema;

/// Scopes requested on every consent screen.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube.upload",
];

/// "People & Blogs", the category assigned to every upload.
const UPLOAD_CATEGORY_ID: &str = "22";

/// OAuth token response from Google. `access_token` is optional so that a
/// success response without one can be reported as an upstream error.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Token introspection response
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Request to exchange authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'static str,
}

/// Request to refresh access token
#[derive(Debug, Serialize)]
struct TokenRefreshRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    #[default]
    Private,
    Unlisted,
    Public,
}

/// Caller-supplied description of a video being uploaded.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub privacy_status: PrivacyStatus,
}

#[derive(Debug, Serialize)]
struct VideoSnippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    #[serde(rename = "categoryId")]
    category_id: &'static str,
}

#[derive(Debug, Serialize)]
struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    privacy_status: PrivacyStatus,
    #[serde(rename = "selfDeclaredMadeForKids")]
    self_declared_made_for_kids: bool,
}

/// The `metadata` part of an upload request
#[derive(Debug, Serialize)]
struct VideoResource<'a> {
    snippet: VideoSnippet<'a>,
    status: VideoStatus,
}

impl<'a> From<&'a VideoMetadata> for VideoResource<'a> {
    fn from(metadata: &'a VideoMetadata) -> Self {
        VideoResource {
            snippet: VideoSnippet {
                title: &metadata.title,
                description: &metadata.description,
                tags: &metadata.tags,
                category_id: UPLOAD_CATEGORY_ID,
            },
            status: VideoStatus {
                privacy_status: metadata.privacy_status,
                self_declared_made_for_kids: false,
            },
        }
    }
}

/// Endpoint URLs used by the client, configurable so tests can target a mock server
#[derive(Debug, Clone)]
pub struct YouTubeUrls {
    pub auth_url: String,
    pub token_url: String,
    pub tokeninfo_url: String,
    pub channels_url: String,
    pub upload_url: String,
}

impl From<&Config> for YouTubeUrls {
    fn from(config: &Config) -> Self {
        YouTubeUrls {
            auth_url: config.google_auth_url().to_string(),
            token_url: config.google_token_url().to_string(),
            tokeninfo_url: config.google_tokeninfo_url().to_string(),
            channels_url: format!("{}/channels", config.youtube_api_base_url()),
            upload_url: config.youtube_upload_url().to_string(),
        }
    }
}

/// OAuth client credentials; both halves must be configured for any token call.
#[derive(Clone)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

/// Google OAuth + YouTube Data API client
pub struct YouTubeClient {
    client: reqwest::Client,
    credentials: Option<ClientCredentials>,
    redirect_uri: String,
    urls: YouTubeUrls,
}

impl YouTubeClient {
    /// Builds a client from the application config. Missing client credentials are not
    /// an error here; operations that need them fail with a config error instead.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        let credentials = match (config.youtube_client_id(), config.youtube_client_secret()) {
            (Some(client_id), Some(client_secret)) => Some(ClientCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        Ok(Self {
            client,
            credentials,
            redirect_uri: config.youtube_redirect_uri().to_string(),
            urls: YouTubeUrls::from(config),
        })
    }

    fn credentials(&self) -> Result<&ClientCredentials, Error> {
        self.credentials.as_ref().ok_or_else(|| {
            warn!("YouTube OAuth client credentials are not configured");
            Error::config()
        })
    }

    /// Generate the OAuth authorization URL for creator consent
    pub fn authorization_url(&self) -> Result<String, Error> {
        let credentials = self.credentials()?;
        let scopes = SCOPES.join(" ");

        Ok(format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            prompt=consent",
            self.urls.auth_url,
            urlencoding::encode(&credentials.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes),
        ))
    }

    /// Exchange authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let credentials = self.credentials()?;
        let request = TokenExchangeRequest {
            code,
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            redirect_uri: &self.redirect_uri,
            grant_type: "authorization_code",
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {:?}", e);
                network_error(e)
            })?;

        let tokens: TokenResponse = json_or_upstream_error(response, "Google OAuth").await?;
        info!("Received OAuth tokens from Google");
        Ok(tokens)
    }

    /// Refresh an expired access token using the refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, Error> {
        let credentials = self.credentials()?;
        let request = TokenRefreshRequest {
            refresh_token,
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            grant_type: "refresh_token",
        };

        debug!("Refreshing Google access token");

        let response = self
            .client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to refresh Google token: {:?}", e);
                network_error(e)
            })?;

        let tokens: TokenResponse =
            json_or_upstream_error(response, "Google token refresh").await?;
        info!("Successfully refreshed Google access token");
        Ok(tokens)
    }

    /// Ask Google how long `access_token` has left to live
    pub async fn token_info(&self, access_token: &str) -> Result<TokenInfo, Error> {
        let response = self
            .client
            .get(&self.urls.tokeninfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(network_error)?;

        // Google reports expired tokens with an error status whose body has no
        // `expires_in`, so the status code is deliberately not checked here.
        Ok(response.json().await?)
    }

    /// Fetch the authenticated creator's own channel
    pub async fn channel_info(&self, access_token: &str) -> Result<serde_json::Value, Error> {
        let response = self
            .client
            .get(&self.urls.channels_url)
            .query(&[("part", "snippet,contentDetails,statistics"), ("mine", "true")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get YouTube channel info: {:?}", e);
                network_error(e)
            })?;

        let channel = json_or_upstream_error(response, "YouTube channels").await?;
        info!("Retrieved YouTube channel info");
        Ok(channel)
    }

    /// Upload `payload` as a new video described by `metadata`
    pub async fn upload_video(
        &self,
        access_token: &str,
        payload: Vec<u8>,
        metadata: &VideoMetadata,
    ) -> Result<serde_json::Value, Error> {
        let resource = serde_json::to_string(&VideoResource::from(metadata)).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(crate::error::InternalErrorKind::Other(
                "Failed to encode video metadata".to_string(),
            )),
        })?;

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(resource).mime_str("application/json")?,
            )
            .part(
                "video",
                reqwest::multipart::Part::bytes(payload)
                    .file_name("video.mp4")
                    .mime_str("video/mp4")?,
            );

        debug!("Uploading video \"{}\" to YouTube", metadata.title);

        let response = self
            .client
            .post(&self.urls.upload_url)
            .query(&[("part", "snippet,status")])
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to upload video to YouTube: {:?}", e);
                network_error(e)
            })?;

        let video = json_or_upstream_error(response, "YouTube upload").await?;
        info!("Video uploaded successfully");
        Ok(video)
    }
}

fn network_error(err: reqwest::Error) -> Error {
    Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
    }
}

/// Decodes a success body as `T`; any other status becomes an upstream error
/// carrying the response text.
async fn json_or_upstream_error<T>(response: reqwest::Response, what: &str) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned,
{
    if response.status().is_success() {
        response.json::<T>().await.map_err(|e| {
            warn!("Failed to parse {what} response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(format!(
                    "Invalid response from {what}"
                ))),
            }
        })
    } else {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        warn!("{what} error ({status}): {error_text}");
        Err(Error::upstream(format!("{what} returned {status}")))
    }
}
