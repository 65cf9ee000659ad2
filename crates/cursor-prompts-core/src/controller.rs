use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use cursor_prompts_store::{export_file_name, Preferences, PromptStorage, StorageError};

use crate::error::ControllerError;
use crate::event::UiEvent;
use crate::host::{ExportArtifact, Notice, PopupHost};
use crate::settings::ControllerSettings;
use crate::view::{CategoryOption, FormField, ModalMode, ModalState, ViewState};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in both title and content";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save prompt. Please try again.";
pub const PROMPT_GONE_MESSAGE: &str = "This prompt no longer exists.";
pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this prompt?";
pub const IMPORT_OK_MESSAGE: &str = "Prompts imported successfully!";
pub const IMPORT_FAILED_MESSAGE: &str = "Failed to import prompts. Please check the file format.";

/// Owns the popup's view state and routes user events to storage.
///
/// Every mutation is followed by a re-read of the list and the category
/// filter so the view never drifts from what is stored.
pub struct PopupController {
    storage: Arc<PromptStorage>,
    preferences: Arc<Preferences>,
    host: Arc<dyn PopupHost>,
    settings: ControllerSettings,
    view: ViewState,
}

impl PopupController {
    pub fn new(
        storage: Arc<PromptStorage>,
        preferences: Arc<Preferences>,
        host: Arc<dyn PopupHost>,
    ) -> Self {
        Self {
            storage,
            preferences,
            host,
            settings: ControllerSettings::default(),
            view: ViewState::default(),
        }
    }

    pub fn with_settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Apply one user event.
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), ControllerError> {
        debug!(event = event.name(), "Handling event");

        match event {
            UiEvent::Load => self.load().await,
            UiEvent::SearchChanged(query) => {
                self.view.search_query = query;
                self.refresh_list().await
            }
            UiEvent::CategorySelected(category) => {
                self.view.selected_category = if self.view.has_category_option(&category) {
                    category
                } else {
                    debug!(category = %category, "Unknown category selected, showing all");
                    String::new()
                };
                self.refresh_list().await
            }
            UiEvent::AddClicked => {
                self.view.modal = ModalState::create();
                self.view.suggestions.clear();
                Ok(())
            }
            UiEvent::EditClicked(id) => self.open_edit(&id).await,
            UiEvent::DeleteClicked(id) => self.delete(&id).await,
            UiEvent::FormChanged { field, value } => self.change_field(field, value).await,
            UiEvent::SuggestionPicked(index) => {
                self.pick_suggestion(index);
                Ok(())
            }
            UiEvent::ClickedOutside => {
                self.view.suggestions.clear();
                Ok(())
            }
            UiEvent::Submit => self.submit().await,
            UiEvent::Cancel => {
                self.view.modal = ModalState::Hidden;
                self.view.suggestions.clear();
                Ok(())
            }
            UiEvent::Export => self.export().await,
            UiEvent::Import(data) => self.import(&data).await,
            UiEvent::ToggleTheme => self.toggle_theme().await,
        }
    }

    async fn load(&mut self) -> Result<(), ControllerError> {
        self.view.theme = self.preferences.theme().await?;
        self.refresh().await
    }

    /// Re-render the category filter, then the list.
    async fn refresh(&mut self) -> Result<(), ControllerError> {
        self.refresh_categories().await?;
        self.refresh_list().await
    }

    async fn refresh_categories(&mut self) -> Result<(), ControllerError> {
        let categories = self.storage.categories().await?;

        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(CategoryOption::all());
        options.extend(categories.iter().map(|c| CategoryOption::category(c)));
        self.view.category_options = options;

        // A selection whose category vanished falls back to "All"
        if !self.view.has_category_option(&self.view.selected_category) {
            self.view.selected_category.clear();
        }
        Ok(())
    }

    async fn refresh_list(&mut self) -> Result<(), ControllerError> {
        self.view.prompts = self
            .storage
            .search(&self.view.search_query, &self.view.selected_category)
            .await?;
        Ok(())
    }

    async fn open_edit(&mut self, id: &str) -> Result<(), ControllerError> {
        match self.storage.get(id).await? {
            Some(prompt) => {
                self.view.modal = ModalState::edit(&prompt);
                self.view.suggestions.clear();
            }
            None => {
                self.notify(Notice::error(PROMPT_GONE_MESSAGE)).await;
                self.refresh().await?;
            }
        }
        Ok(())
    }

    async fn change_field(
        &mut self,
        field: FormField,
        value: String,
    ) -> Result<(), ControllerError> {
        let ModalState::Shown { form, .. } = &mut self.view.modal else {
            debug!("Form change ignored: modal hidden");
            return Ok(());
        };
        form.set(field, value);

        if field == FormField::Title {
            self.suggest().await?;
        }
        Ok(())
    }

    /// Offer stored titles matching what has been typed so far.
    async fn suggest(&mut self) -> Result<(), ControllerError> {
        let query = match self.view.modal.form() {
            Some(form) => form.title.clone(),
            None => return Ok(()),
        };

        if query.chars().count() < self.settings.suggestion_min_chars {
            self.view.suggestions.clear();
            return Ok(());
        }

        self.view.suggestions = self
            .storage
            .search(&query, "")
            .await?
            .into_iter()
            .take(self.settings.suggestion_limit)
            .map(|p| p.title)
            .collect();
        Ok(())
    }

    fn pick_suggestion(&mut self, index: usize) {
        let Some(title) = self.view.suggestions.get(index).cloned() else {
            return;
        };
        if let ModalState::Shown { form, .. } = &mut self.view.modal {
            form.title = title;
        }
        self.view.suggestions.clear();
    }

    async fn submit(&mut self) -> Result<(), ControllerError> {
        let ModalState::Shown { mode, form, .. } = &self.view.modal else {
            debug!("Submit ignored: modal hidden");
            return Ok(());
        };

        let id = match mode {
            ModalMode::Create => None,
            ModalMode::Edit { prompt_id } => Some(prompt_id.as_str()),
        };
        let Some(draft) = form.to_draft(id) else {
            self.fail_submit(MISSING_FIELDS_MESSAGE).await;
            return Ok(());
        };

        match self.storage.save(draft).await {
            Ok(prompt) => {
                info!(id = %prompt.id, "Prompt submitted");
                self.view.modal = ModalState::Hidden;
                self.view.suggestions.clear();
                self.refresh().await
            }
            Err(StorageError::PromptNotFound(id)) => {
                error!(id = %id, "Submitted prompt no longer exists");
                self.fail_submit(PROMPT_GONE_MESSAGE).await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error saving prompt");
                self.fail_submit(SAVE_FAILED_MESSAGE).await;
                Ok(())
            }
        }
    }

    /// Keep the modal and its values, show why the submit did not go through.
    async fn fail_submit(&mut self, message: &str) {
        if let ModalState::Shown { error, .. } = &mut self.view.modal {
            *error = Some(message.to_string());
        }
        self.notify(Notice::error(message)).await;
    }

    async fn delete(&mut self, id: &str) -> Result<(), ControllerError> {
        if !self.host.confirm(DELETE_CONFIRM_MESSAGE).await {
            debug!(id, "Delete declined");
            return Ok(());
        }

        self.storage.delete(id).await?;
        self.view.modal = ModalState::Hidden;
        self.view.suggestions.clear();
        self.refresh().await
    }

    async fn export(&mut self) -> Result<(), ControllerError> {
        let contents = self.storage.export().await?;
        let artifact = ExportArtifact::json(export_file_name(Utc::now().date_naive()), contents);

        self.host
            .download(&artifact)
            .await
            .map_err(ControllerError::Download)?;
        info!(file = %artifact.file_name, "Exported prompts");
        Ok(())
    }

    async fn import(&mut self, data: &str) -> Result<(), ControllerError> {
        if self.storage.import(data).await {
            // Storage is already replaced, so report it before re-reading
            self.notify(Notice::info(IMPORT_OK_MESSAGE)).await;
            self.refresh().await?;
        } else {
            self.notify(Notice::error(IMPORT_FAILED_MESSAGE)).await;
        }
        Ok(())
    }

    async fn toggle_theme(&mut self) -> Result<(), ControllerError> {
        self.view.theme = self.preferences.toggle_theme().await?;
        Ok(())
    }

    async fn notify(&mut self, notice: Notice) {
        self.host.notify(&notice).await;
        self.view.last_notice = Some(notice);
    }
}
