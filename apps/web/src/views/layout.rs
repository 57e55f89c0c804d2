use serde::Serialize;

use crate::errors::AppError;
use crate::session::{DarkMode, SessionState};

/// Page chrome shared by every view: sign-in state and theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub signed_in: bool,
    pub dark_mode: DarkMode,
    /// CSS class the markup toggles on `body`, header, nav links and buttons.
    pub theme_class: &'static str,
}

impl Layout {
    pub fn from_session(state: &SessionState) -> Self {
        Self {
            signed_in: state.token.is_some(),
            dark_mode: state.dark_mode,
            theme_class: if state.dark_mode.is_enabled() {
                "dark-mode"
            } else {
                ""
            },
        }
    }
}

/// A view together with its layout.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub layout: Layout,
    pub view: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking notification the page shows before anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// `"<action>: <reason>"`, e.g. "Error adding job: Job title and company are required".
    pub fn failure(action: &str, err: &AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("{action}: {}", err.user_message()),
        }
    }
}
