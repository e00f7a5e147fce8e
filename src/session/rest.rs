//! Hosted backend client
//!
//! Speaks the Supabase-style REST API: GoTrue endpoints under `/auth/v1` for
//! sessions and PostgREST under `/rest/v1` for the `profiles` table.

use crate::config::BackendConfig;
use crate::error::{SessionError, SessionResult};
use crate::session::profile::{ProfileStore, UserProfile};
use crate::session::provider::{Session, SessionChannel, SessionProvider};
use crate::util::SecretString;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Auth user as returned by `/auth/v1/user`
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Password grant response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// REST backend implementing both [`SessionProvider`] and [`ProfileStore`]
pub struct RestBackend {
    http: Client,
    base_url: String,
    anon_key: SecretString,
    session: SessionChannel,
}

impl RestBackend {
    /// Create a new client from configuration
    pub fn new(config: &BackendConfig) -> SessionResult<Self> {
        let anon_key = config.anon_key.clone().ok_or_else(|| {
            SessionError::NotConfigured("backend.anon_key is not set".to_string())
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("nexus-console/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SessionError::Request)?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key,
            session: SessionChannel::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the project key and a bearer token (the session's, else the anon key)
    fn authorize(&self, request: RequestBuilder, bearer: Option<&SecretString>) -> RequestBuilder {
        let bearer = bearer.unwrap_or(&self.anon_key);
        request
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer.expose_secret())
    }

    async fn handle_response(response: Response) -> SessionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SessionError::from_response(status.as_u16(), &body))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> SessionResult<T> {
        response
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn fetch_user(&self, access_token: &SecretString) -> SessionResult<AuthUser> {
        let request = self.authorize(self.http.get(self.url("/auth/v1/user")), Some(access_token));
        let response = Self::handle_response(request.send().await?).await?;
        Self::json(response).await
    }
}

#[async_trait]
impl SessionProvider for RestBackend {
    fn current_session(&self) -> Option<Session> {
        self.session.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> SessionResult<Session> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let request = self
            .authorize(self.http.post(self.url("/auth/v1/token?grant_type=password")), None)
            .json(&body);

        let response = request.send().await?;
        // The password grant answers bad credentials with 400 invalid_grant
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(SessionError::Unauthorized);
        }
        let response = Self::handle_response(response).await?;
        let token: TokenResponse = Self::json(response).await?;

        let session = Session::new(token.user.id, token.user.email, token.access_token);
        info!(user_id = %session.user_id, "Signed in with password");
        self.session.publish(Some(session.clone()));
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn sign_in_with_token(&self, access_token: SecretString) -> SessionResult<Session> {
        let user = self.fetch_user(&access_token).await?;

        let session = Session {
            user_id: user.id,
            email: user.email,
            access_token,
        };
        info!(user_id = %session.user_id, "Signed in with access token");
        self.session.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> SessionResult<()> {
        let Some(session) = self.session.current() else {
            return Ok(());
        };

        // The local session is dropped even when the remote call fails.
        self.session.publish(None);

        let request = self.authorize(
            self.http.post(self.url("/auth/v1/logout")),
            Some(&session.access_token),
        );
        match request.send().await {
            Ok(response) => {
                Self::handle_response(response).await?;
                debug!(user_id = %session.user_id, "Remote session revoked");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Remote sign-out failed");
                Err(SessionError::Request(e))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "rest"
    }
}

#[async_trait]
impl ProfileStore for RestBackend {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &str) -> SessionResult<UserProfile> {
        let path = format!(
            "/rest/v1/profiles?id=eq.{}&select=*",
            urlencoding::encode(user_id)
        );
        let session = self.session.current();
        let request = self.authorize(
            self.http.get(self.url(&path)),
            session.as_ref().map(|s| &s.access_token),
        );

        let response = Self::handle_response(request.send().await?).await?;
        let rows: Vec<UserProfile> = Self::json(response).await?;

        rows.into_iter().next().ok_or_else(|| SessionError::NotFound {
            user_id: user_id.to_string(),
        })
    }
}
