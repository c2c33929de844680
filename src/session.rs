use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::{User, UserType};

/// Identity of the logged-in user, handed to the containers that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn user_type(&self) -> UserType {
        self.user.user_type
    }
}

/// File-backed storage for the logged-in user.
///
/// Written at login, removed at logout, read once when the application starts.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn login(&self, user: &User) -> Result<Session> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(user)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing session to {}", self.path.display()))?;

        tracing::info!(email = %user.email, "user logged in");
        Ok(Session::new(user.clone()))
    }

    pub fn logout(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("user logged out");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn current(&self) -> Result<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let user: User = serde_json::from_str(&json)
            .with_context(|| format!("reading session from {}", self.path.display()))?;

        Ok(Some(Session::new(user)))
    }
}
