use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Outcome, Step, Terminate};
use crate::errors::PipeError;

/// Interfaz para definir steps síncronos como tipos propios (en lugar de
/// closures). Implementaciones deben ser puras respecto al input.
pub trait Transform: Send + Sync {
    /// Nombre usado en logs y en la anotación de errores.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn apply(&self, input: Value, terminate: Terminate) -> Result<Outcome, PipeError>;
}

/// Variante asíncrona de [`Transform`].
#[async_trait]
pub trait AsyncTransform: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn apply(&self, input: Value, terminate: Terminate) -> Result<Outcome, PipeError>;
}

impl Step {
    pub fn from_transform<T>(transform: T) -> Self
        where T: Transform + 'static
    {
        let label = transform.name().to_owned();
        Step::new(move |input, terminate| transform.apply(input, terminate)).labeled(label)
    }

    pub fn from_async<T>(transform: T) -> Self
        where T: AsyncTransform + 'static
    {
        let label = transform.name().to_owned();
        let transform = Arc::new(transform);
        Step::new(move |input, terminate| {
            let transform = Arc::clone(&transform);
            Ok(Outcome::deferred(async move { transform.apply(input, terminate).await }))
        }).labeled(label)
    }
}
