//! Login session handling.
//!
//! A [`Session`] is created from the login response and passed by
//! reference to whatever needs it; nothing mutates it after login.
//! Because each CLI invocation is a fresh process, the session is
//! persisted as a JSON file under the data directory: login writes it,
//! logout removes it, every other command just reads it.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::client::{ApiClient, ApiError};
use crate::rbac::{Permission, Principal};

/// How long the backend keeps a session alive when it does not say.
const SESSION_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

/// Shape of the login endpoint's `data` payload.
#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: Principal,
    #[serde(default, alias = "expiresAt")]
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Permission check against the logged-in principal. A missing
    /// session never reaches this point; the CLI treats "no session" as
    /// an automatic deny.
    pub fn can(&self, required: &Permission) -> bool {
        self.principal.can(required)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Read the persisted session, if any. An expired file is treated as
    /// absent and cleaned up.
    pub fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session: Session = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file: {}", path.display()))?;
        if session.is_expired() {
            tracing::debug!("stored session expired, removing");
            let _ = std::fs::remove_file(path);
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        Ok(())
    }

    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Exchange credentials for a session.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<Session, ApiError> {
    let data: LoginData = client
        .post_form_public(
            "/auth/login",
            &[
                ("email", email.to_string()),
                ("password", password.to_string()),
            ],
        )
        .await?;

    let expires_at = data
        .expires_at
        .unwrap_or_else(|| Utc::now() + Duration::days(SESSION_DAYS));

    tracing::info!(user = %data.user.email, "logged in");
    Ok(Session {
        token: data.token,
        principal: data.user,
        expires_at,
    })
}

/// Tell the backend the session is done. Best effort: a dead backend
/// must not keep the operator logged in locally.
pub async fn logout(client: &ApiClient) {
    if let Err(e) = client.post_ack("/auth/logout", &[]).await {
        tracing::debug!(error = %e, "logout call failed, clearing local session anyway");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::Principal;

    fn sample_session(expires_at: DateTime<Utc>) -> Session {
        Session {
            token: "tok".to_string(),
            principal: Principal {
                id: "u1".to_string(),
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                role: "ops".to_string(),
                permissions: vec!["amc:read".to_string()],
                kyc_status: None,
            },
            expires_at,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = std::env::temp_dir().join("fundesk-session-test");
        let path = dir.join("session.json");
        let _ = std::fs::remove_file(&path);

        let session = sample_session(Utc::now() + Duration::days(1));
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap().unwrap();
        assert_eq!(loaded.token, "tok");
        assert!(loaded.can(&Permission::new("amc", "read")));
        assert!(!loaded.can(&Permission::new("amc", "create")));

        Session::clear(&path).unwrap();
        assert!(Session::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_loads_as_none() {
        let dir = std::env::temp_dir().join("fundesk-session-test-expired");
        let path = dir.join("session.json");

        let session = sample_session(Utc::now() - Duration::hours(1));
        session.save(&path).unwrap();
        assert!(Session::load(&path).unwrap().is_none());
        // and the stale file is gone
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = std::env::temp_dir().join("fundesk-no-such-session.json");
        assert!(Session::load(&path).unwrap().is_none());
    }
}
