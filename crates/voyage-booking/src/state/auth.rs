//! # Auth Store
//!
//! The signed-in user, their token and the request flags of the auth forms.
//!
//! ## Persistence
//! ```text
//! ┌────────────────────────┐        ┌──────────────────────────────────┐
//! │ AuthState              │        │ KeyValueStorage                  │
//! │  user      ────────────┼──┐     │                                  │
//! │  token     ────────────┼──┼───► │ "auth" = {"user":…,"token":"…"}  │
//! │  loading   (memory)    │  │     │                                  │
//! │  error     (memory)    │  │     └──────────────────────────────────┘
//! └────────────────────────┘  └─ written after every change, read once
//!                                at construction
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use voyage_core::validation::validate_password;
use voyage_core::{AuthUser, UserRole};

use super::SharedState;
use crate::error::{BookingResult, GatewayError};
use crate::gateway::{AuthGateway, AuthSession, ProfileUpdate, RegisterRequest};
use crate::storage::KeyValueStorage;

/// Storage key of the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth";

const LOGIN_FAILED: &str = "Invalid email or password.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub token: String,
    pub loading: bool,
    pub error: String,
}

/// The persisted subset of [`AuthState`].
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    user: Option<AuthUser>,
    #[serde(default)]
    token: String,
}

#[derive(Clone)]
pub struct AuthStore {
    state: SharedState<AuthState>,
    gateway: Arc<dyn AuthGateway>,
    storage: Arc<dyn KeyValueStorage>,
}

impl AuthStore {
    /// Creates the store and restores any persisted session.
    ///
    /// An unreadable session value is discarded with a warning.
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: Arc<dyn KeyValueStorage>) -> BookingResult<Self> {
        let mut state = AuthState::default();
        if let Some(raw) = storage.get(AUTH_STORAGE_KEY)? {
            match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(session) => {
                    debug!(logged_in = session.user.is_some(), "Auth session restored");
                    state.user = session.user;
                    state.token = session.token;
                }
                Err(e) => warn!(error = %e, "Discarding unreadable auth session"),
            }
        }

        Ok(AuthStore {
            state: SharedState::new(state),
            gateway,
            storage,
        })
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.snapshot()
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn user(&self) -> Option<AuthUser> {
        self.state.with(|s| s.user.clone())
    }

    pub fn token(&self) -> String {
        self.state.with(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.with(|s| !s.token.is_empty() && s.user.is_some())
    }

    pub fn is_agent(&self) -> bool {
        self.has_role(UserRole::Agent)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    fn has_role(&self, role: UserRole) -> bool {
        self.state.with(|s| s.user.as_ref().is_some_and(|u| u.role == role))
    }

    /// Empty when signed out.
    pub fn display_name(&self) -> String {
        self.state
            .with(|s| s.user.as_ref().map(AuthUser::display_name).unwrap_or_default())
    }

    pub fn initials(&self) -> String {
        self.state
            .with(|s| s.user.as_ref().map(AuthUser::initials).unwrap_or_default())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> BookingResult<AuthUser> {
        self.begin();
        let result = self.gateway.login(email, password).await;
        self.finish_session(result, LOGIN_FAILED)
    }

    pub async fn register(&self, request: &RegisterRequest) -> BookingResult<AuthUser> {
        self.begin();
        let result = self.gateway.register(request).await;
        self.finish_session(result, REGISTER_FAILED)
    }

    /// Returns whether a reset email was sent.
    pub async fn forgot_password(&self, email: &str) -> BookingResult<bool> {
        self.begin();
        let result = self.gateway.forgot_password(email).await;
        self.finish(result)
    }

    /// Applies `changes` to the signed-in user once the gateway accepts them.
    pub async fn update_profile(&self, changes: ProfileUpdate) -> BookingResult<()> {
        let token = self.token();
        self.begin();
        let result = self.gateway.update_profile(&token, &changes).await;
        self.finish(result)?;

        self.state.with_mut(|s| {
            if let Some(user) = s.user.as_mut() {
                changes.apply_to(user);
            }
        });
        self.persist()
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> BookingResult<()> {
        validate_password(new_password)?;
        let token = self.token();
        self.begin();
        let result = self.gateway.change_password(&token, old_password, new_password).await;
        self.finish(result)
    }

    pub fn logout(&self) -> BookingResult<()> {
        self.state.with_mut(|s| {
            s.user = None;
            s.token.clear();
        });
        info!("Signed out");
        self.persist()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin(&self) {
        self.state.with_mut(|s| {
            s.loading = true;
            s.error.clear();
        });
    }

    fn finish<T>(&self, result: Result<T, GatewayError>) -> BookingResult<T> {
        self.state.with_mut(|s| {
            s.loading = false;
            if let Err(err) = &result {
                s.error = err.to_string();
            }
        });
        result.map_err(Into::into)
    }

    fn finish_session(&self, result: Result<AuthSession, GatewayError>, failure: &str) -> BookingResult<AuthUser> {
        let outcome = self.state.with_mut(|s| {
            s.loading = false;
            match result {
                Ok(session) => {
                    s.user = Some(session.user.clone());
                    s.token = session.token;
                    Ok(session.user)
                }
                Err(err) => {
                    debug!(error = %err, "Auth request rejected");
                    s.error = failure.to_string();
                    Err(GatewayError::InvalidRequest(failure.to_string()))
                }
            }
        });

        let user = outcome?;
        info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.persist()?;
        Ok(user)
    }

    /// Writes user and token, or clears the key when signed out.
    fn persist(&self) -> BookingResult<()> {
        let session = self.state.with(|s| PersistedSession {
            user: s.user.clone(),
            token: s.token.clone(),
        });
        if session.user.is_none() && session.token.is_empty() {
            return self.storage.remove(AUTH_STORAGE_KEY);
        }
        let json = serde_json::to_string(&session)?;
        self.storage.set(AUTH_STORAGE_KEY, &json)
    }
}
