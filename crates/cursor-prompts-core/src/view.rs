//! Rendered state of the popup.

use serde::Serialize;

use cursor_prompts_store::{Prompt, PromptDraft, Theme};

use crate::host::Notice;

/// Label of the catch-all entry in the category filter
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// One entry of the category filter. An empty `value` means no filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

impl CategoryOption {
    pub fn all() -> Self {
        Self {
            value: String::new(),
            label: ALL_CATEGORIES_LABEL.to_string(),
        }
    }

    pub fn category(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }
}

/// Editable fields of the prompt form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Content,
    Category,
}

/// Field values of the modal form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl PromptForm {
    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            category: prompt.category.clone(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Content => self.content = value,
            FormField::Category => self.category = value,
        }
    }

    /// Trimmed draft, or `None` if title or content is blank.
    pub fn to_draft(&self, id: Option<&str>) -> Option<PromptDraft> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return None;
        }

        let draft = PromptDraft::new(title, content, self.category.trim());
        Some(match id {
            Some(id) => draft.with_id(id),
            None => draft,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModalMode {
    Create,
    Edit { prompt_id: String },
}

/// Visibility and contents of the add/edit modal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Hidden,
    Shown {
        mode: ModalMode,
        form: PromptForm,
        error: Option<String>,
    },
}

impl ModalState {
    pub fn create() -> Self {
        ModalState::Shown {
            mode: ModalMode::Create,
            form: PromptForm::default(),
            error: None,
        }
    }

    pub fn edit(prompt: &Prompt) -> Self {
        ModalState::Shown {
            mode: ModalMode::Edit {
                prompt_id: prompt.id.clone(),
            },
            form: PromptForm::from_prompt(prompt),
            error: None,
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, ModalState::Shown { .. })
    }

    /// Heading shown above the form
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            ModalState::Hidden => None,
            ModalState::Shown {
                mode: ModalMode::Create,
                ..
            } => Some("Add New Prompt"),
            ModalState::Shown {
                mode: ModalMode::Edit { .. },
                ..
            } => Some("Edit Prompt"),
        }
    }

    pub fn form(&self) -> Option<&PromptForm> {
        match self {
            ModalState::Shown { form, .. } => Some(form),
            ModalState::Hidden => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModalState::Shown { error, .. } => error.as_deref(),
            ModalState::Hidden => None,
        }
    }
}

/// Everything a renderer needs to draw the popup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Prompts matching the current search and category
    pub prompts: Vec<Prompt>,
    pub category_options: Vec<CategoryOption>,
    pub search_query: String,
    /// Empty means all categories
    pub selected_category: String,
    pub modal: ModalState,
    /// Suggested titles; empty means the list is dismissed
    pub suggestions: Vec<String>,
    pub theme: Theme,
    pub last_notice: Option<Notice>,
}

impl ViewState {
    pub fn has_category_option(&self, value: &str) -> bool {
        self.category_options.iter().any(|o| o.value == value)
    }
}
