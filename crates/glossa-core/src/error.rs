use glossa_service::TranslateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("translator is already initialized; build a new instance to re-run setup")]
    AlreadyInitialized,

    #[error("no tokio runtime available to run the delivery queue")]
    NoRuntime,

    #[error("translation model is not ready")]
    ModelNotReady,

    #[error("preference store error: {0}")]
    Preferences(String),

    #[error(transparent)]
    Service(#[from] TranslateError),
}
