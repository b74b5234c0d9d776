//! A client for the hosted backend's REST interface.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use crate::{
    auth::{Profile, Session, SignUpDetails, User, UserId},
    auth_events::{AuthEventKind, AuthEvents, AuthSubscription},
    transaction::{Transaction, TransactionData, TransactionId},
};

use super::{AuthService, BackendError, ProfileStore, TransactionStore};

/// Access tokens that expire within this many seconds are refreshed before
/// they are used.
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// Used when the backend does not say when a token expires.
const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

const TRANSACTIONS_TABLE: &str = "transactions";
const PROFILES_TABLE: &str = "profiles";

/// Where the backend lives and how to identify this app to it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// The project URL, e.g. "https://abc.example.co".
    pub url: String,
    /// The public (anon) API key.
    pub api_key: String,
    /// Where to keep the session between restarts. The session is only kept
    /// in memory if this is `None`.
    pub session_file: Option<PathBuf>,
}

/// Talks to the hosted backend over HTTP and keeps the current session.
#[derive(Debug)]
pub struct HostedBackend {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
    session: RwLock<Option<Session>>,
    refresh_lock: Mutex<()>,
    events: AuthEvents,
    session_file: Option<PathBuf>,
}

impl HostedBackend {
    /// Create a client for the backend at `config.url`.
    ///
    /// If a session file is configured and contains a session, that session
    /// is resumed.
    ///
    /// # Errors
    /// Returns [BackendError::InvalidUrl] if `config.url` is not a valid URL.
    pub async fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let mut url = config.url;

        // Without the trailing slash `Url::join` would replace the last path
        // segment instead of appending to it.
        if !url.ends_with('/') {
            url.push('/');
        }

        let base_url =
            Url::parse(&url).map_err(|error| BackendError::InvalidUrl(format!("{url}: {error}")))?;

        let session = match &config.session_file {
            Some(path) => load_session(path).await,
            None => None,
        };

        if let Some(session) = &session {
            tracing::info!("Resuming the session for user {}", session.user.id);
        }

        Ok(Self {
            base_url,
            api_key: config.api_key,
            http: reqwest::Client::new(),
            session: RwLock::new(session),
            refresh_lock: Mutex::new(()),
            events: AuthEvents::new(),
            session_file: config.session_file,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|error| BackendError::InvalidUrl(format!("{path}: {error}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
    }

    /// A request to `table` made on behalf of the signed-in user.
    async fn table_request(
        &self,
        method: Method,
        table: &str,
    ) -> Result<RequestBuilder, BackendError> {
        let session = self.get_session().await?.ok_or(BackendError::NotSignedIn)?;
        let url = self.endpoint(&format!("rest/v1/{table}"))?;

        Ok(self
            .request(method, url)
            .bearer_auth(&session.access_token))
    }

    async fn replace_session(&self, session: Option<Session>, kind: AuthEventKind) {
        {
            let mut current = self.session.write().await;
            *current = session.clone();
        }

        if let Some(path) = &self.session_file {
            store_session(path, session.as_ref()).await;
        }

        self.events.emit(kind, session);
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.set_query(Some("grant_type=refresh_token"));

        let response = send(
            self.request(Method::POST, url)
                .json(&serde_json::json!({ "refresh_token": refresh_token })),
        )
        .await?;

        decode::<TokenResponse>(response)
            .await
            .map(TokenResponse::into_session)
    }
}

#[async_trait]
impl AuthService for HostedBackend {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let current = self.session.read().await.clone();

        match current {
            Some(session) if session.expires_within(REFRESH_MARGIN_SECONDS) => {}
            other => return Ok(other),
        }

        // Refresh tokens can only be used once, so concurrent requests must
        // not refresh the same session twice.
        let _guard = self.refresh_lock.lock().await;

        let Some(session) = self.session.read().await.clone() else {
            return Ok(None);
        };

        if !session.expires_within(REFRESH_MARGIN_SECONDS) {
            return Ok(Some(session));
        }

        tracing::debug!("Refreshing the access token for user {}", session.user.id);

        match self.refresh(&session.refresh_token).await {
            Ok(refreshed) => {
                self.replace_session(Some(refreshed.clone()), AuthEventKind::TokenRefreshed)
                    .await;
                Ok(Some(refreshed))
            }
            Err(BackendError::Transport(error)) => {
                tracing::error!("Could not reach the backend to refresh the session: {error}");
                Err(BackendError::Transport(error))
            }
            Err(error) => {
                tracing::warn!("Could not refresh the session, signing out: {error}");
                self.replace_session(None, AuthEventKind::SignedOut).await;
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.set_query(Some("grant_type=password"));

        let response = send(
            self.request(Method::POST, url)
                .json(&serde_json::json!({ "email": email, "password": password })),
        )
        .await?;

        let session = decode::<TokenResponse>(response).await?.into_session();

        tracing::info!("User {} signed in", session.user.id);
        self.replace_session(Some(session.clone()), AuthEventKind::SignedIn)
            .await;

        Ok(session)
    }

    async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<Session>, BackendError> {
        let url = self.endpoint("auth/v1/signup")?;
        let body = SignUpRequest {
            email: &details.email,
            password: &details.password,
            data: SignUpMetadata {
                first_name: &details.first_name,
                last_name: &details.last_name,
                phone: &details.phone,
            },
        };

        let response = send(self.request(Method::POST, url).json(&body)).await?;

        match decode::<SignUpResponse>(response).await? {
            SignUpResponse::SignedIn(token) => {
                let session = token.into_session();

                tracing::info!("User {} signed up", session.user.id);
                self.replace_session(Some(session.clone()), AuthEventKind::SignedIn)
                    .await;

                Ok(Some(session))
            }
            SignUpResponse::ConfirmationPending(user) => {
                tracing::info!("User {} signed up, waiting for email confirmation", user.id);
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let current = self.session.read().await.clone();

        if let Some(session) = current {
            let result = match self.endpoint("auth/v1/logout") {
                Ok(url) => send(
                    self.request(Method::POST, url)
                        .bearer_auth(&session.access_token),
                )
                .await
                .map(|_| ()),
                Err(error) => Err(error),
            };

            if let Err(error) = result {
                tracing::warn!("Could not end the session in the backend: {error}");
            }

            tracing::info!("User {} signed out", session.user.id);
        }

        self.replace_session(None, AuthEventKind::SignedOut).await;

        Ok(())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}

#[async_trait]
impl TransactionStore for HostedBackend {
    async fn list_transactions(&self, owner: &UserId) -> Result<Vec<Transaction>, BackendError> {
        let request = self
            .table_request(Method::GET, TRANSACTIONS_TABLE)
            .await?
            .query(&[
                ("select", "*".to_owned()),
                ("user_id", format!("eq.{owner}")),
                ("order", "date.desc".to_owned()),
            ]);

        decode(send(request).await?).await
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, BackendError> {
        let request = self
            .table_request(Method::GET, TRANSACTIONS_TABLE)
            .await?
            .query(&[("select", "*".to_owned()), ("id", format!("eq.{id}"))]);

        decode::<Vec<Transaction>>(send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or(BackendError::NotFound)
    }

    async fn insert_transaction(
        &self,
        owner: &UserId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError> {
        let request = self
            .table_request(Method::POST, TRANSACTIONS_TABLE)
            .await?
            .header("Prefer", "return=representation")
            .json(&NewTransactionRow {
                data,
                user_id: owner,
            });

        decode::<Vec<Transaction>>(send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("the inserted row was not returned".to_owned()))
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError> {
        let request = self
            .table_request(Method::PATCH, TRANSACTIONS_TABLE)
            .await?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(data);

        decode::<Vec<Transaction>>(send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or(BackendError::NotFound)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), BackendError> {
        let request = self
            .table_request(Method::DELETE, TRANSACTIONS_TABLE)
            .await?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");

        let deleted = decode::<Vec<serde_json::Value>>(send(request).await?).await?;

        if deleted.is_empty() {
            Err(BackendError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for HostedBackend {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, BackendError> {
        let request = self
            .table_request(Method::GET, PROFILES_TABLE)
            .await?
            .query(&[("select", "*".to_owned()), ("id", format!("eq.{user_id}"))]);

        Ok(decode::<Vec<Profile>>(send(request).await?)
            .await?
            .into_iter()
            .next())
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            OffsetDateTime::now_utc().unix_timestamp()
                + self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS)
        });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    SignedIn(TokenResponse),
    ConfirmationPending(User),
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    first_name: &'a str,
    last_name: &'a str,
    phone: &'a str,
}

#[derive(Serialize)]
struct NewTransactionRow<'a> {
    #[serde(flatten)]
    data: &'a TransactionData,
    user_id: &'a UserId,
}

/// The auth and row APIs name the message field differently.
#[derive(Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
    let response = request.send().await?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        });

    tracing::debug!("Backend responded with {status}: {message}");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
        StatusCode::NOT_FOUND => BackendError::NotFound,
        _ => BackendError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|error| BackendError::Decode(error.to_string()))
}

// ============================================================================
// SESSION FILE
// ============================================================================

async fn load_session(path: &Path) -> Option<Session> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
        Err(error) => {
            tracing::warn!("Could not read the session file {}: {error}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(session) => Some(session),
        Err(error) => {
            tracing::warn!(
                "Ignoring the session file {} as it could not be parsed: {error}",
                path.display()
            );
            None
        }
    }
}

async fn store_session(path: &Path, session: Option<&Session>) {
    let result = match session {
        Some(session) => match serde_json::to_string(session) {
            Ok(json) => tokio::fs::write(path, json)
                .await
                .map_err(|error| BackendError::Io(error.to_string())),
            Err(error) => Err(BackendError::Io(error.to_string())),
        },
        None => match tokio::fs::remove_file(path).await {
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => {
                Err(BackendError::Io(error.to_string()))
            }
            _ => Ok(()),
        },
    };

    if let Err(error) = result {
        tracing::warn!("Could not update the session file {}: {error}", path.display());
    }
}
