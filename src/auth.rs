// src/auth.rs
//! Session state (`token`, `username`) and the checks made before any
//! authenticated call.
//!
//! The session is read once by [`SessionManager::init`] and cleared by
//! [`SessionManager::teardown`]; everything else reads it through the manager.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::core::FsOps;
use crate::error::ClientError;
use crate::types::response::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Where the session lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Session persisted as a small TOML file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let Some(content) = FsOps::read_optional(&self.path).await? else {
            return Ok(None);
        };

        match toml::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    err
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let content = toml::to_string(session).context("Failed to serialize session")?;
        FsOps::write_file_safe(&self.path, &content).await
    }

    async fn clear(&self) -> Result<()> {
        FsOps::remove_file_if_exists(&self.path).await
    }
}

/// In-process store; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(token: &str, username: &str) -> Self {
        let store = Self::new();
        store.set(Some(Session {
            token: token.to_string(),
            username: username.to_string(),
        }));
        store
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }

    fn set(&self, session: Option<Session>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = session;
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.snapshot())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.set(Some(session.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.set(None);
        Ok(())
    }
}

/// The single read path for session state.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    current: Option<Session>,
}

impl SessionManager {
    /// Read the persisted session once at startup.
    pub async fn init(store: Box<dyn SessionStore>) -> Result<Self> {
        let current = store.load().await?;
        match &current {
            Some(session) => info!("Restored session for {}", session.username),
            None => info!("No stored session"),
        }
        Ok(Self { store, current })
    }

    /// Token usable for an authenticated call. Tokens whose `exp` has
    /// passed are treated as absent.
    pub fn token(&self) -> Option<&str> {
        let session = self.current.as_ref()?;
        if session.token.is_empty() {
            return None;
        }
        match inspect_token(&session.token) {
            Some(claims) if claims.is_expired() => None,
            _ => Some(session.token.as_str()),
        }
    }

    pub fn require_token(&self) -> Result<&str, ClientError> {
        self.token().ok_or(ClientError::AuthMissing)
    }

    pub fn username(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.username().is_some()
    }

    /// Persist a freshly issued session.
    pub async fn establish(&mut self, session: Session) -> Result<()> {
        self.store.save(&session).await?;
        info!("Session established for {}", session.username);
        self.current = Some(session);
        Ok(())
    }

    /// Logout: forget the session here and in the store.
    pub async fn teardown(&mut self) -> Result<()> {
        self.store.clear().await?;
        if let Some(session) = self.current.take() {
            info!("Session cleared for {}", session.username);
        }
        Ok(())
    }
}

/// Claims read from a JWT access token without verifying its signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| exp <= Utc::now().timestamp())
            .unwrap_or(false)
    }
}

/// `None` for tokens that are not JWTs; those are passed through as opaque.
pub fn inspect_token(token: &str) -> Option<TokenClaims> {
    let header = jsonwebtoken::decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation.algorithms = vec![header.alg, Algorithm::HS256];

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ClientError> {
    if request.username.trim().is_empty() {
        return Err(ClientError::InvalidInput("Username is required".to_string()));
    }
    if request.password.trim().is_empty() {
        return Err(ClientError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), ClientError> {
    if request.username.trim().is_empty() {
        return Err(ClientError::InvalidInput("Username is required".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(ClientError::InvalidInput("Full name is required".to_string()));
    }
    if request.email.trim().is_empty() {
        return Err(ClientError::InvalidInput("Email is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(ClientError::InvalidInput(
            "Please enter a valid email".to_string(),
        ));
    }
    if request.password.trim().is_empty() {
        return Err(ClientError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn jwt(exp_offset_secs: i64) -> String {
        let claims = json!({
            "sub": "alice",
            "exp": Utc::now().timestamp() + exp_offset_secs,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_init_reads_store_and_teardown_clears() {
        let store = MemorySessionStore::with_session("opaque-token", "alice");
        let mut session = SessionManager::init(Box::new(store.clone())).await.unwrap();

        assert_eq!(session.token(), Some("opaque-token"));
        assert_eq!(session.username(), Some("alice"));
        assert!(session.is_authenticated());

        session.teardown().await.unwrap();
        assert_eq!(session.token(), None);
        assert!(store.snapshot().is_none());
        assert_eq!(session.require_token(), Err(ClientError::AuthMissing));
    }

    #[tokio::test]
    async fn test_establish_persists() {
        let store = MemorySessionStore::new();
        let mut session = SessionManager::init(Box::new(store.clone())).await.unwrap();
        assert!(!session.is_authenticated());

        session
            .establish(Session {
                token: "t".to_string(),
                username: "bob".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(store.snapshot().map(|s| s.username), Some("bob".to_string()));
        assert_eq!(session.require_token(), Ok("t"));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job-analyzer").join("session.toml");
        let store = FileSessionStore::new(path.clone());

        assert_eq!(store.load().await.unwrap(), None);

        let saved = Session {
            token: "abc".to_string(),
            username: "carol".to_string(),
        };
        store.save(&saved).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(saved));

        store.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "not = [valid").await.unwrap();

        let store = FileSessionStore::new(path);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[test]
    fn test_inspect_token_reads_claims() {
        let claims = inspect_token(&jwt(3600)).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert!(!claims.is_expired());

        assert!(inspect_token(&jwt(-60)).unwrap().is_expired());
        assert_eq!(inspect_token("not-a-jwt"), None);
    }

    #[tokio::test]
    async fn test_expired_token_counts_as_missing() {
        let store = MemorySessionStore::with_session(&jwt(-60), "alice");
        let session = SessionManager::init(Box::new(store)).await.unwrap();
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_registration_validation_messages() {
        let mut request = RegisterRequest {
            username: "dave".to_string(),
            name: "Dave".to_string(),
            email: "dave.example.com".to_string(),
            password: "secret".to_string(),
            role: String::new(),
        };
        assert_eq!(
            validate_registration(&request),
            Err(ClientError::InvalidInput("Please enter a valid email".to_string()))
        );

        request.email = "dave@example.com".to_string();
        assert_eq!(validate_registration(&request), Ok(()));

        request.name = "  ".to_string();
        assert_eq!(
            validate_registration(&request),
            Err(ClientError::InvalidInput("Full name is required".to_string()))
        );
    }

    #[test]
    fn test_login_validation() {
        let request = LoginRequest {
            username: String::new(),
            password: "x".to_string(),
        };
        assert_eq!(
            validate_login(&request),
            Err(ClientError::InvalidInput("Username is required".to_string()))
        );
    }
}
