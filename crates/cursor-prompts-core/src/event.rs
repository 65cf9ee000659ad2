use crate::view::FormField;

/// A user action delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Popup opened
    Load,
    SearchChanged(String),
    CategorySelected(String),
    AddClicked,
    EditClicked(String),
    DeleteClicked(String),
    FormChanged { field: FormField, value: String },
    SuggestionPicked(usize),
    /// A click landed outside the title field and the suggestion list
    ClickedOutside,
    Submit,
    Cancel,
    Export,
    /// Text content of a user-selected file
    Import(String),
    ToggleTheme,
}

impl UiEvent {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Load => "load",
            UiEvent::SearchChanged(_) => "search_changed",
            UiEvent::CategorySelected(_) => "category_selected",
            UiEvent::AddClicked => "add_clicked",
            UiEvent::EditClicked(_) => "edit_clicked",
            UiEvent::DeleteClicked(_) => "delete_clicked",
            UiEvent::FormChanged { .. } => "form_changed",
            UiEvent::SuggestionPicked(_) => "suggestion_picked",
            UiEvent::ClickedOutside => "clicked_outside",
            UiEvent::Submit => "submit",
            UiEvent::Cancel => "cancel",
            UiEvent::Export => "export",
            UiEvent::Import(_) => "import",
            UiEvent::ToggleTheme => "toggle_theme",
        }
    }
}
