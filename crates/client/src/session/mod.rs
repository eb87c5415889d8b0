//! Process-wide session state.
//!
//! Holds the current user and tokens, persists them through a
//! [`TokenStorage`], and validates a restored token against the API on
//! startup. Lifecycle: `Loading → {Authenticated, Anonymous}`.
//!
//! Only this module's operations (`init`, `sign_in`, `sign_up`, `sign_out`)
//! mutate the session; every other component reads the current token through
//! the shared [`TokenCell`].

mod storage;

pub use storage::{FileTokenStorage, MemoryTokenStorage, StoredTokens, TokenStorage};

use devconnect_core::models::{Session, User};
use devconnect_core::{Error, validation};
use std::sync::{Arc, PoisonError, RwLock};

use crate::api::auth::{AuthApi, RegisterRequest};

/// Shared cell holding the current access token. Written only by
/// [`SessionStore`]; read by the HTTP client when building headers.
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    pub fn get(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: String) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Authentication lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Startup validation of a persisted token has not finished yet.
    Loading,
    Authenticated(Session),
    Anonymous,
}

/// The process-wide session store.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    tokens: TokenCell,
    state: RwLock<AuthState>,
}

impl SessionStore {
    /// Build a store in the `Loading` state. Call [`SessionStore::init`]
    /// before relying on the state.
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>, tokens: TokenCell) -> Self {
        Self { api, storage, tokens, state: RwLock::new(AuthState::Loading) }
    }

    /// Restore a persisted session, validating the stored token against
    /// `GET /auth/me`. Any failure (unreadable storage, network error,
    /// rejected token) clears storage and leaves the store anonymous.
    pub async fn init(&self) {
        let stored = match self.storage.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                self.become_anonymous();
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted session");
                self.become_anonymous();
                return;
            }
        };

        self.tokens.set(stored.access_token.clone());
        match self.api.current_user().await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "restored persisted session");
                self.set_state(AuthState::Authenticated(Session {
                    access_token: stored.access_token,
                    refresh_token: stored.refresh_token,
                    user,
                }));
            }
            Err(e) => {
                tracing::debug!(error = %e, "persisted token rejected; clearing session");
                self.become_anonymous();
            }
        }
    }

    /// Authenticate with email and password, persisting the issued tokens.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, Error> {
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        let login = self.api.login(email, password).await?;
        let stored = StoredTokens {
            access_token: login.session.access_token.clone(),
            refresh_token: login.session.refresh_token.clone(),
        };
        self.storage.save(&stored)?;
        self.tokens.set(stored.access_token.clone());
        self.set_state(AuthState::Authenticated(Session {
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
            user: login.user.clone(),
        }));
        Ok(login.user)
    }

    /// Create an account, then sign in with the same credentials.
    /// Registration alone does not establish a session.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        username: Option<&str>,
    ) -> Result<User, Error> {
        validation::validate_credentials(email, password, username, full_name)?;

        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.map(str::to_string),
            username: username.map(str::to_string),
        };
        self.api.register(&request).await?;
        self.sign_in(email, password).await
    }

    /// Best-effort logout: a failing logout endpoint is logged, never
    /// propagated, and local state is cleared unconditionally.
    pub async fn sign_out(&self) {
        if self.tokens.get().is_some()
            && let Err(e) = self.api.logout().await
        {
            tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
        }
        self.become_anonymous();
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn user(&self) -> Option<User> {
        match self.state() {
            AuthState::Authenticated(session) => Some(session.user),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    fn become_anonymous(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        self.tokens.clear();
        self.set_state(AuthState::Anonymous);
    }

    fn set_state(&self, state: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::LoginData;
    use async_trait::async_trait;
    use chrono::Utc;
    use devconnect_core::models::Role;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_user() -> User {
        User {
            id: "u-1".into(),
            email: "dev@example.com".into(),
            full_name: Some("Dev One".into()),
            username: Some("devone".into()),
            avatar_url: None,
            bio: None,
            website: None,
            github_url: None,
            linkedin_url: None,
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct StubAuth {
        reject_me: bool,
        fail_logout: bool,
        login_calls: AtomicU32,
        register_calls: AtomicU32,
        logout_calls: AtomicU32,
    }

    #[async_trait]
    impl AuthApi for StubAuth {
        async fn register(&self, _req: &RegisterRequest) -> Result<(), Error> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<LoginData, Error> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoginData {
                user: test_user(),
                session: crate::api::auth::SessionTokens {
                    access_token: "issued-token".into(),
                    refresh_token: Some("issued-refresh".into()),
                },
            })
        }

        async fn logout(&self) -> Result<(), Error> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_logout { Err(Error::Network("connection reset".into())) } else { Ok(()) }
        }

        async fn current_user(&self) -> Result<User, Error> {
            if self.reject_me {
                Err(Error::Http { status: 401, message: "invalid token".into() })
            } else {
                Ok(test_user())
            }
        }
    }

    fn store_with(api: StubAuth) -> (SessionStore, Arc<MemoryTokenStorage>, Arc<StubAuth>) {
        let api = Arc::new(api);
        let storage = Arc::new(MemoryTokenStorage::default());
        let store = SessionStore::new(api.clone(), storage.clone(), TokenCell::default());
        (store, storage, api)
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let (store, _, _) = store_with(StubAuth::default());
        assert_eq!(store.state(), AuthState::Loading);
    }

    #[tokio::test]
    async fn test_init_without_stored_token_is_anonymous() {
        let (store, _, _) = store_with(StubAuth::default());
        store.init().await;
        assert_eq!(store.state(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_init_restores_valid_session() {
        let (store, storage, _) = store_with(StubAuth::default());
        storage
            .save(&StoredTokens { access_token: "persisted".into(), refresh_token: None })
            .unwrap();

        store.init().await;
        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("persisted"));
        assert_eq!(store.user().unwrap().id, "u-1");
    }

    #[tokio::test]
    async fn test_init_with_rejected_token_clears_storage() {
        let (store, storage, _) = store_with(StubAuth { reject_me: true, ..Default::default() });
        storage
            .save(&StoredTokens { access_token: "stale".into(), refresh_token: Some("r".into()) })
            .unwrap();

        store.init().await;
        assert_eq!(store.state(), AuthState::Anonymous);
        assert_eq!(storage.load().unwrap(), None);
        assert_eq!(store.access_token(), None);
    }

    #[tokio::test]
    async fn test_sign_in_persists_issued_tokens() {
        let (store, storage, _) = store_with(StubAuth::default());
        let user = store.sign_in("dev@example.com", "secret").await.unwrap();
        assert_eq!(user.id, "u-1");
        assert!(store.is_authenticated());

        let stored = storage.load().unwrap().unwrap();
        assert_eq!(stored.access_token, "issued-token");
        assert_eq!(stored.refresh_token.as_deref(), Some("issued-refresh"));
        assert_eq!(store.access_token().as_deref(), Some("issued-token"));
    }

    #[tokio::test]
    async fn test_sign_in_validation_fails_before_any_request() {
        let (store, _, api) = store_with(StubAuth::default());
        let result = store.sign_in("not-an-email", "secret").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);

        let result = store.sign_in("dev@example.com", "short").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_up_registers_then_signs_in() {
        let (store, _, api) = store_with(StubAuth::default());
        store
            .sign_up("dev@example.com", "secret", Some("Dev One"), Some("devone"))
            .await
            .unwrap();
        assert_eq!(api.register_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 1);
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_clears_storage_even_when_logout_fails() {
        let (store, storage, api) = store_with(StubAuth { fail_logout: true, ..Default::default() });
        store.sign_in("dev@example.com", "secret").await.unwrap();

        store.sign_out().await;
        assert_eq!(api.logout_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.state(), AuthState::Anonymous);
        assert_eq!(storage.load().unwrap(), None);
        assert_eq!(store.access_token(), None);
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn test_sign_out_while_anonymous_skips_logout_call() {
        let (store, _, api) = store_with(StubAuth::default());
        store.init().await;
        store.sign_out().await;
        assert_eq!(api.logout_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.state(), AuthState::Anonymous);
    }
}
