//! The seam between the controller and whatever hosts the popup.

use async_trait::async_trait;
use serde::Serialize;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user
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

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// A file handed to the host for the user to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportArtifact {
    pub fn json(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: "application/json",
            contents: contents.into(),
        }
    }
}

/// Host capabilities the controller needs: blocking confirmation, notices
/// and downloads.
#[async_trait]
pub trait PopupHost: Send + Sync {
    /// Ask the user to confirm an action.
    async fn confirm(&self, message: &str) -> bool;

    /// Show a notice to the user.
    async fn notify(&self, notice: &Notice);

    /// Deliver an exported file.
    async fn download(&self, artifact: &ExportArtifact) -> std::io::Result<()>;
}
