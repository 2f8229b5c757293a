//! Login service.
//!
//! Resolves credentials into a [`Session`] against the configured auth
//! backend. Two backend shapes exist:
//!
//! - **Token-issuing**: `POST {base}/auth/login {username, password}` returns
//!   `{token}` (or 401), paired with a fixed-id profile fetch.
//! - **Directory**: `GET {base}/users` returns profiles matched client-side
//!   by username or email against a single shared password; the token is
//!   minted locally.
//!
//! Which backend is active is a configuration decision
//! ([`AuthBackendConfig`]); the intermediate [`LoginOutcome`] keeps the two
//! payload shapes as an explicit tagged union instead of duck-typing the
//! response.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use shopstore_core::{Session, UserId, UserProfile};

use crate::config::AuthBackendConfig;

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No user with the given username or email.
    #[error("user not found")]
    UserNotFound,

    /// HTTP request to the auth backend failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Auth backend returned an unexpected status.
    #[error("auth backend returned status {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What the active backend produced, before it becomes a full session.
#[derive(Debug)]
enum LoginOutcome {
    /// The backend issued an opaque token; the profile comes separately.
    TokenIssued { token: String },
    /// The directory matched a profile; the token is minted locally.
    DirectoryMatched { profile: UserProfile },
}

/// Token response from the token-issuing backend.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// User record shape of the token-issuing backend's profile endpoint.
#[derive(Debug, Deserialize)]
struct TokenBackendUser {
    id: UserId,
    email: String,
    username: String,
    name: TokenBackendName,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBackendName {
    firstname: String,
    lastname: String,
}

/// User record shape of the directory backend.
#[derive(Debug, Deserialize)]
struct DirectoryUser {
    id: UserId,
    name: String,
    username: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    company: Option<DirectoryCompany>,
}

#[derive(Debug, Deserialize)]
struct DirectoryCompany {
    name: String,
}

impl From<DirectoryUser> for UserProfile {
    fn from(user: DirectoryUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            phone: user.phone,
            website: user.website,
            company: user.company.map(|c| c.name),
        }
    }
}

impl From<TokenBackendUser> for UserProfile {
    fn from(user: TokenBackendUser) -> Self {
        Self {
            id: user.id,
            name: format!("{} {}", user.name.firstname, user.name.lastname),
            username: user.username,
            email: user.email,
            phone: user.phone,
            website: None,
            company: None,
        }
    }
}

/// Service resolving credentials into sessions.
pub struct LoginService {
    client: reqwest::Client,
    backend: AuthBackendConfig,
}

impl LoginService {
    /// Create a login service for the configured backend.
    #[must_use]
    pub fn new(backend: AuthBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend,
        }
    }

    /// Resolve `username` (or email) and `password` into a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] or
    /// [`AuthError::InvalidCredentials`] for bad credentials, other
    /// [`AuthError`] variants for backend failures.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let outcome = match &self.backend {
            AuthBackendConfig::TokenIssuing { base_url } => {
                self.token_login(base_url, username, password).await?
            }
            AuthBackendConfig::Directory {
                base_url,
                shared_password,
            } => {
                self.directory_login(base_url, username, password, shared_password)
                    .await?
            }
        };

        match outcome {
            LoginOutcome::TokenIssued { token } => {
                let base_url = self.backend.base_url();
                let user = self.fetch_fixed_profile(base_url).await?;
                Ok(Session { token, user })
            }
            LoginOutcome::DirectoryMatched { profile } => Ok(Session {
                token: mint_token(profile.id),
                user: profile,
            }),
        }
    }

    async fn token_login(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let response = self
            .client
            .post(format!("{base_url}/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let body = response.text().await?;
        let issued: TokenResponse = serde_json::from_str(&body)?;
        Ok(LoginOutcome::TokenIssued {
            token: issued.token,
        })
    }

    async fn directory_login(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
        shared_password: &SecretString,
    ) -> Result<LoginOutcome, AuthError> {
        let response = self
            .client
            .get(format!("{base_url}/users"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let body = response.text().await?;
        let users: Vec<DirectoryUser> = serde_json::from_str(&body)?;

        let user = match_directory_user(users, username).ok_or(AuthError::UserNotFound)?;
        if password != shared_password.expose_secret() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(LoginOutcome::DirectoryMatched {
            profile: user.into(),
        })
    }

    /// The token-issuing backend has no "who am I" endpoint; its demo pairs
    /// the token with a fixed-id profile fetch.
    async fn fetch_fixed_profile(&self, base_url: &str) -> Result<UserProfile, AuthError> {
        let response = self
            .client
            .get(format!("{base_url}/users/1"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let body = response.text().await?;
        let user: TokenBackendUser = serde_json::from_str(&body)?;
        Ok(user.into())
    }
}

/// Match the submitted identifier against username OR email, case-insensitive.
fn match_directory_user(users: Vec<DirectoryUser>, identifier: &str) -> Option<DirectoryUser> {
    let identifier = identifier.to_lowercase();
    users.into_iter().find(|user| {
        user.username.to_lowercase() == identifier || user.email.to_lowercase() == identifier
    })
}

/// Mint the mock token paired with a directory match.
fn mint_token(user_id: UserId) -> String {
    format!("token_{}_{}", user_id, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_user(id: i64, username: &str, email: &str) -> DirectoryUser {
        DirectoryUser {
            id: UserId::new(id),
            name: format!("User {id}"),
            username: username.to_string(),
            email: email.to_string(),
            phone: None,
            website: None,
            company: None,
        }
    }

    #[test]
    fn test_match_by_username_ignores_case() {
        let users = vec![
            directory_user(1, "Bret", "Sincere@april.biz"),
            directory_user(2, "Antonette", "Shanna@melissa.tv"),
        ];
        let matched = match_directory_user(users, "bret").expect("match");
        assert_eq!(matched.id, UserId::new(1));
    }

    #[test]
    fn test_match_by_email_ignores_case() {
        let users = vec![directory_user(2, "Antonette", "Shanna@melissa.tv")];
        let matched = match_directory_user(users, "shanna@MELISSA.tv").expect("match");
        assert_eq!(matched.id, UserId::new(2));
    }

    #[test]
    fn test_no_match_is_none() {
        let users = vec![directory_user(1, "Bret", "Sincere@april.biz")];
        assert!(match_directory_user(users, "nobody").is_none());
    }

    #[test]
    fn test_mint_token_shape() {
        let token = mint_token(UserId::new(7));
        assert!(token.starts_with("token_7_"));
    }

    #[test]
    fn test_directory_user_maps_company_name() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "company": { "name": "Romaguera-Crona", "catchPhrase": "ignored" }
        }"#;
        let user: DirectoryUser = serde_json::from_str(json).expect("deserialize");
        let profile = UserProfile::from(user);
        assert_eq!(profile.company.as_deref(), Some("Romaguera-Crona"));
    }

    #[test]
    fn test_token_backend_user_builds_display_name() {
        let json = r#"{
            "id": 1,
            "email": "john@gmail.com",
            "username": "johnd",
            "name": { "firstname": "john", "lastname": "doe" },
            "phone": "1-570-236-7033"
        }"#;
        let user: TokenBackendUser = serde_json::from_str(json).expect("deserialize");
        let profile = UserProfile::from(user);
        assert_eq!(profile.name, "john doe");
        assert_eq!(profile.username, "johnd");
    }
}
