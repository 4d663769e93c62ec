use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::errors::PipeError;

/// Resultado diferido de un step. Puede resolverse a otro `Outcome`
/// (incluso otro diferido: el executor lo aplana).
pub type DeferredOutcome = BoxFuture<'static, Result<Outcome, PipeError>>;

/// Resultado abstracto de ejecutar un step.
///
/// El executor despacha sobre esta etiqueta; nunca inspecciona el valor para
/// adivinar si es asíncrono.
pub enum Outcome {
    /// Valor disponible inmediatamente.
    Immediate(Value),
    /// Valor que estará disponible cuando el futuro se resuelva.
    Deferred(DeferredOutcome),
    /// Terminación anticipada: el valor es el resultado final de la invocación.
    Terminated(Value),
}

impl Outcome {
    pub fn value(value: impl Into<Value>) -> Self {
        Outcome::Immediate(value.into())
    }

    /// Difiere un futuro que ya produce un `Outcome` (permite terminar
    /// desde dentro de un step asíncrono).
    pub fn deferred<F>(future: F) -> Self
        where F: Future<Output = Result<Outcome, PipeError>> + Send + 'static
    {
        Outcome::Deferred(future.boxed())
    }

    /// Difiere un futuro que produce un valor plano.
    pub fn from_future<F>(future: F) -> Self
        where F: Future<Output = Result<Value, PipeError>> + Send + 'static
    {
        Outcome::Deferred(future.map(|res| res.map(Outcome::Immediate)).boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Outcome::Deferred(_))
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Outcome::Terminated(_))
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Immediate(value)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Immediate(v) => f.debug_tuple("Immediate").field(v).finish(),
            Outcome::Deferred(_) => f.write_str("Deferred(..)"),
            Outcome::Terminated(v) => f.debug_tuple("Terminated").field(v).finish(),
        }
    }
}
