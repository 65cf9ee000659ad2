use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use cursor_prompts_core::{EventLoop, PopupController, UiEvent};
use cursor_prompts_logging::{init_tracing, LogFormat};
use cursor_prompts_store::{KeyValueStore, Preferences, PromptStorage, SqliteStore};

mod commands;
mod config;
mod host;
mod render;

use commands::{FormInput, ThemeAction};
use config::AppConfig;
use host::{ExportTarget, TerminalHost};

#[derive(Parser, Debug)]
#[command(
    name = "cursor-prompts",
    about = "Store, search and share reusable prompts",
    version,
    author
)]
struct Cli {
    /// Database file (default: ~/.local/share/cursor-prompts/prompts.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (default: ~/.config/cursor-prompts/cursor-prompts.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatChoice>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List prompts, optionally filtered
    List {
        /// Case-insensitive text to look for in title or content
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only prompts in this category
        #[arg(short, long, default_value = "")]
        category: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Add a prompt (asks for missing title or content)
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short = 'b', long)]
        content: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit an existing prompt
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short = 'b', long)]
        content: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a prompt
    Delete {
        id: String,
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List categories in use
    Categories,
    /// Suggest stored titles for partial input
    Suggest { text: String },
    /// Export all prompts to JSON
    Export {
        /// Directory, or a .json file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all prompts with an export file
    Import { file: PathBuf },
    /// Show or change the theme
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref())?;

    // Flags win over the config file
    let log_format = match cli.log_format {
        Some(choice) => choice.into(),
        None => config.log_format()?.unwrap_or_default(),
    };
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    let _log_guard = init_tracing(&log_level, log_format, log_file.as_deref())
        .context("Failed to initialize logging")?;

    let db_path = cli
        .db
        .clone()
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(SqliteStore::default_path);
    let kv: Arc<dyn KeyValueStore> = Arc::new(
        SqliteStore::open_at(&db_path)
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?,
    );

    let export_target = match &cli.command {
        Commands::Export {
            output: Some(output),
        } => ExportTarget::from_path(output.clone()),
        _ => ExportTarget::Directory(
            config
                .export_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        ),
    };
    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let host = TerminalHost::new(export_target).assume_yes(assume_yes);

    let controller = PopupController::new(
        Arc::new(PromptStorage::new(kv.clone())),
        Arc::new(Preferences::new(kv)),
        Arc::new(host),
    )
    .with_settings(config.controller_settings());
    let (ui, _task) = EventLoop::spawn(controller);
    ui.dispatch(UiEvent::Load)
        .await
        .context("Failed to load prompts")?;

    match cli.command {
        Commands::List {
            search,
            category,
            json,
        } => commands::list(&ui, search, category, json).await,
        Commands::Add {
            title,
            content,
            category,
        } => {
            let input = FormInput {
                title,
                content,
                category,
            };
            commands::add(&ui, input).await
        }
        Commands::Edit {
            id,
            title,
            content,
            category,
        } => {
            let input = FormInput {
                title,
                content,
                category,
            };
            commands::edit(&ui, id, input).await
        }
        Commands::Delete { id, .. } => commands::delete(&ui, id).await,
        Commands::Categories => commands::categories(&ui),
        Commands::Suggest { text } => commands::suggest(&ui, text).await,
        Commands::Export { .. } => commands::export(&ui).await,
        Commands::Import { file } => commands::import(&ui, &file).await,
        Commands::Theme { action } => commands::theme(&ui, action).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "cursor-prompts",
            "--db",
            "/tmp/p.db",
            "add",
            "-t",
            "Greet",
            "-b",
            "Hello",
            "-c",
            "chat",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
        match cli.command {
            Commands::Add {
                title,
                content,
                category,
            } => {
                assert_eq!(title.as_deref(), Some("Greet"));
                assert_eq!(content.as_deref(), Some("Hello"));
                assert_eq!(category.as_deref(), Some("chat"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_theme_defaults_to_show() {
        let cli = Cli::try_parse_from(["cursor-prompts", "theme"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Theme {
                action: ThemeAction::Show
            }
        ));
    }
}
