use cursor_prompts_store::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Download failed: {0}")]
    Download(#[source] std::io::Error),

    #[error("Event loop closed")]
    LoopClosed,
}
