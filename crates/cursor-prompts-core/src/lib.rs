//! Popup controller for cursor-prompts.
//!
//! [`PopupController`] holds the view state of the prompt popup (list,
//! category filter, add/edit modal, title suggestions, theme) and turns
//! [`UiEvent`]s into storage calls. Hosts render [`ViewState`] and provide
//! confirmation, notices and downloads through [`PopupHost`].
//!
//! [`EventLoop`] runs a controller on its own task so a host can fire events
//! from anywhere while mutations stay strictly sequential.

mod controller;
mod error;
mod event;
mod event_loop;
mod host;
mod settings;
mod view;

pub use controller::{
    PopupController, DELETE_CONFIRM_MESSAGE, IMPORT_FAILED_MESSAGE, IMPORT_OK_MESSAGE,
    MISSING_FIELDS_MESSAGE, PROMPT_GONE_MESSAGE, SAVE_FAILED_MESSAGE,
};
pub use error::ControllerError;
pub use event::UiEvent;
pub use event_loop::{EventLoop, UiHandle};
pub use host::{ExportArtifact, Notice, NoticeLevel, PopupHost};
pub use settings::ControllerSettings;
pub use view::{
    CategoryOption, FormField, ModalMode, ModalState, PromptForm, ViewState,
    ALL_CATEGORIES_LABEL,
};
