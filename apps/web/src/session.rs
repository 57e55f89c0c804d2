//! The user's session: bearer token plus the dark-mode preference.
//!
//! Loaded once at startup, begun on login/register, torn down on logout.
//! Every change is written back to the session file so a restart keeps the
//! user signed in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    Enabled,
    #[default]
    Disabled,
}

impl DarkMode {
    pub fn toggled(self) -> Self {
        match self {
            DarkMode::Enabled => DarkMode::Disabled,
            DarkMode::Disabled => DarkMode::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == DarkMode::Enabled
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "dark-mode")]
    pub dark_mode: DarkMode,
}

/// Shared handle to the session. Cloning shares the same state.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    path: Option<PathBuf>,
}

impl Session {
    /// A session that lives only in memory.
    #[cfg(test)]
    pub fn ephemeral(state: SessionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            path: None,
        }
    }

    /// Loads the session from `path`. A missing file starts signed out;
    /// an unreadable one is logged and replaced on the next write.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match read_state(&path).await {
            Ok(Some(state)) => {
                info!(path = %path.display(), signed_in = state.token.is_some(), "session restored");
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                SessionState::default()
            }
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(path),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    #[cfg(test)]
    pub async fn dark_mode(&self) -> DarkMode {
        self.state.read().await.dark_mode
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Starts a signed-in session with a freshly issued token.
    pub async fn begin(&self, token: String) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        state.token = Some(token);
        self.persist(&state).await
    }

    /// Signs out. The dark-mode preference survives.
    pub async fn end(&self) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        state.token = None;
        self.persist(&state).await
    }

    /// Signs out only if `token` is still the current one. A rejection that
    /// arrives after a fresh login leaves the new session alone.
    pub async fn end_if(&self, token: &str) -> Result<bool, SessionError> {
        let mut state = self.state.write().await;
        if state.token.as_deref() != Some(token) {
            return Ok(false);
        }
        state.token = None;
        self.persist(&state).await?;
        Ok(true)
    }

    pub async fn toggle_dark_mode(&self) -> Result<DarkMode, SessionError> {
        let mut state = self.state.write().await;
        state.dark_mode = state.dark_mode.toggled();
        self.persist(&state).await?;
        Ok(state.dark_mode)
    }

    async fn persist(&self, state: &SessionState) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

async fn read_state(path: &Path) -> Result<Option<SessionState>, SessionError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
