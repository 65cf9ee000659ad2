//! Subcommand handlers. Each one replays the clicks a popup user would
//! make, through the controller's event loop.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dialoguer::Input;

use cursor_prompts_core::{FormField, UiEvent, UiHandle, ViewState};
use cursor_prompts_store::Theme;

use crate::render;

/// Field values given on the command line; `None` leaves the form value as is.
#[derive(Debug, Default)]
pub struct FormInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

pub async fn list(ui: &UiHandle, search: String, category: String, json: bool) -> Result<ExitCode> {
    let view = ui.view();
    if !category.is_empty() && !view.has_category_option(&category) {
        bail!("Unknown category: {}", category);
    }

    ui.dispatch(UiEvent::SearchChanged(search)).await?;
    let view = ui.dispatch(UiEvent::CategorySelected(category)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view.prompts)?);
    } else {
        render::print_prompts(&view);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn add(ui: &UiHandle, input: FormInput) -> Result<ExitCode> {
    let title = match input.title {
        Some(title) => title,
        None => ask("Title").await?,
    };
    let content = match input.content {
        Some(content) => content,
        None => ask("Content").await?,
    };

    ui.dispatch(UiEvent::AddClicked).await?;
    fill_form(
        ui,
        FormInput {
            title: Some(title),
            content: Some(content),
            category: input.category,
        },
    )
    .await?;
    let view = ui.dispatch(UiEvent::Submit).await?;

    if view.modal.is_shown() {
        return Ok(ExitCode::FAILURE);
    }
    // New prompts are appended, and the list is unfiltered here
    if let Some(prompt) = view.prompts.last() {
        println!("{}", "Saved".bright_green());
        render::print_prompt(prompt, view.theme);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn edit(ui: &UiHandle, id: String, input: FormInput) -> Result<ExitCode> {
    let view = ui.dispatch(UiEvent::EditClicked(id.clone())).await?;
    if !view.modal.is_shown() {
        return Ok(ExitCode::FAILURE);
    }

    fill_form(ui, input).await?;
    let view = ui.dispatch(UiEvent::Submit).await?;
    if view.modal.is_shown() {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(prompt) = view.prompts.iter().find(|p| p.id == id) {
        println!("{}", "Updated".bright_green());
        render::print_prompt(prompt, view.theme);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn delete(ui: &UiHandle, id: String) -> Result<ExitCode> {
    if !contains(&ui.view(), &id) {
        eprintln!("No prompt with id {}", id.bold());
        return Ok(ExitCode::FAILURE);
    }

    let view = ui.dispatch(UiEvent::DeleteClicked(id.clone())).await?;
    if contains(&view, &id) {
        eprintln!("{}", "Cancelled".dimmed());
    } else {
        println!("{} {}", "Deleted".bright_green(), id);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn categories(ui: &UiHandle) -> Result<ExitCode> {
    render::print_categories(&ui.view());
    Ok(ExitCode::SUCCESS)
}

pub async fn suggest(ui: &UiHandle, text: String) -> Result<ExitCode> {
    ui.dispatch(UiEvent::AddClicked).await?;
    let view = ui
        .dispatch(UiEvent::FormChanged {
            field: FormField::Title,
            value: text,
        })
        .await?;
    ui.dispatch(UiEvent::Cancel).await?;

    for title in &view.suggestions {
        println!("{}", title);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn export(ui: &UiHandle) -> Result<ExitCode> {
    ui.dispatch(UiEvent::Export).await?;
    Ok(ExitCode::SUCCESS)
}

pub async fn import(ui: &UiHandle, file: &Path) -> Result<ExitCode> {
    let data = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let view = ui.dispatch(UiEvent::Import(data)).await?;
    match view.last_notice {
        Some(notice) if notice.is_error() => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Requested theme change
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

pub async fn theme(ui: &UiHandle, action: ThemeAction) -> Result<ExitCode> {
    let current = ui.view().theme;
    let wanted = match action {
        ThemeAction::Show => current,
        ThemeAction::Toggle => current.toggled(),
        ThemeAction::Light => Theme::Light,
        ThemeAction::Dark => Theme::Dark,
    };

    let view = if wanted != current {
        ui.dispatch(UiEvent::ToggleTheme).await?
    } else {
        ui.view()
    };
    println!("{}", view.theme);
    Ok(ExitCode::SUCCESS)
}

async fn fill_form(ui: &UiHandle, input: FormInput) -> Result<()> {
    let fields = [
        (FormField::Title, input.title),
        (FormField::Content, input.content),
        (FormField::Category, input.category),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            ui.dispatch(UiEvent::FormChanged { field, value }).await?;
        }
    }
    // Typing the title pops suggestions; leaving the field dismisses them
    ui.dispatch(UiEvent::ClickedOutside).await?;
    Ok(())
}

fn contains(view: &ViewState, id: &str) -> bool {
    view.prompts.iter().any(|p| p.id == id)
}

async fn ask(label: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || Input::<String>::new().with_prompt(label).interact_text())
        .await
        .context("Input task failed")?
        .with_context(|| format!("Failed to read {}", label.to_lowercase()))
}
