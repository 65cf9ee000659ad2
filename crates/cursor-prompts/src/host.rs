//! Terminal implementation of the popup host.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Confirm;
use tracing::warn;

use cursor_prompts_core::{ExportArtifact, Notice, NoticeLevel, PopupHost};

/// Where an export lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Write `<dir>/<artifact file name>`
    Directory(PathBuf),
    /// Write exactly this file
    File(PathBuf),
}

impl ExportTarget {
    /// Paths ending in `.json` are files, anything else is a directory.
    pub fn from_path(path: PathBuf) -> Self {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            ExportTarget::File(path)
        } else {
            ExportTarget::Directory(path)
        }
    }

    fn resolve(&self, file_name: &str) -> PathBuf {
        match self {
            ExportTarget::Directory(dir) => dir.join(file_name),
            ExportTarget::File(path) => path.clone(),
        }
    }
}

pub struct TerminalHost {
    export_target: ExportTarget,
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(export_target: ExportTarget) -> Self {
        Self {
            export_target,
            assume_yes: false,
        }
    }

    /// Answer every confirmation with yes.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

#[async_trait]
impl PopupHost for TerminalHost {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await;

        match answer {
            Ok(Ok(yes)) => yes,
            Ok(Err(e)) => {
                warn!(error = %e, "Confirmation unavailable, treating as no");
                false
            }
            Err(e) => {
                warn!(error = %e, "Confirmation task failed");
                false
            }
        }
    }

    async fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => eprintln!("{} {}", "✓".bright_green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "✗".bright_red(), notice.message.bold()),
        }
    }

    async fn download(&self, artifact: &ExportArtifact) -> io::Result<()> {
        let path = self.export_target.resolve(&artifact.file_name);
        write_artifact(&path, &artifact.contents).await?;
        eprintln!(
            "{} Exported to {}",
            "✓".bright_green(),
            path.display().to_string().bold()
        );
        Ok(())
    }
}

async fn write_artifact(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, contents).await
}
