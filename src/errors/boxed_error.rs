use boxed_builder::BuilderError;
use boxed_core::PipeError;
use thiserror::Error;

/// Error de aplicación: agrupa los errores de ambos crates.
#[derive(Debug, Error)]
pub enum BoxedError {
    #[error("Error en pipe: {0}")]
    Pipe(#[from] PipeError),
    #[error("Error en builder: {0}")]
    Builder(#[from] BuilderError),
    #[error("Error en JSON: {0}")]
    Json(#[from] serde_json::Error),
}
