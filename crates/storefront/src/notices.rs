//! One-shot user notices carried across a redirect in the session.
//!
//! A handler pushes a notice, redirects, and the next rendered page takes and
//! shows it once. Session failures are logged and otherwise ignored: a lost
//! notice never fails a request.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key holding pending notices.
pub const NOTICES_KEY: &str = "notices";

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message shown at the top of the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class for templates.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "notice notice-success",
            NoticeLevel::Error => "notice notice-error",
        }
    }
}

/// Queue a notice for the next rendered page.
pub async fn push(session: &Session, notice: Notice) {
    let mut pending = session
        .get::<Vec<Notice>>(NOTICES_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(notice);

    if let Err(e) = session.insert(NOTICES_KEY, pending).await {
        tracing::error!("Failed to save notice to session: {e}");
    }
}

/// Take all pending notices, clearing them from the session.
pub async fn take(session: &Session) -> Vec<Notice> {
    match session.remove::<Vec<Notice>>(NOTICES_KEY).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read notices from session: {e}");
            Vec::new()
        }
    }
}
