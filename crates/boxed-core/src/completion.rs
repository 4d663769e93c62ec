use std::fmt;
use std::future::IntoFuture;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::PipeError;
use crate::step::Outcome;

/// Resultado de invocar un pipe.
///
/// La modalidad se decide en tiempo de ejecución: `Ready` si ningún step
/// produjo un valor diferido, `Pending` en cuanto alguno lo hizo. Ambos se
/// pueden esperar con `.await`.
pub enum Completion {
    Ready(Value),
    Pending(BoxFuture<'static, Result<Value, PipeError>>),
}

impl Completion {
    pub fn is_ready(&self) -> bool {
        matches!(self, Completion::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Completion::Pending(_))
    }

    /// Valor inmediato, o `None` si la invocación quedó diferida.
    pub fn ready(self) -> Option<Value> {
        match self {
            Completion::Ready(value) => Some(value),
            Completion::Pending(_) => None,
        }
    }

    /// Resuelve el valor bloqueando el hilo actual con
    /// `futures::executor::block_on`.
    ///
    /// Pensado para callers síncronos; no usar dentro de un runtime async.
    /// No hay reactor de tokio: un step que espere timers o IO de tokio
    /// (`tokio::time::sleep`, sockets) hace panic aquí. Esos pipes se
    /// resuelven con `.await` dentro del runtime.
    pub fn block(self) -> Result<Value, PipeError> {
        match self {
            Completion::Ready(value) => Ok(value),
            Completion::Pending(pending) => futures::executor::block_on(pending),
        }
    }

    pub async fn into_typed<T>(self) -> Result<T, PipeError>
        where T: DeserializeOwned
    {
        let value = self.await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Convierte el resultado en el `Outcome` de un step exterior (pipes
    /// anidados). La terminación interna ya quedó resuelta en el valor.
    pub(crate) fn into_outcome(self) -> Outcome {
        match self {
            Completion::Ready(value) => Outcome::Immediate(value),
            Completion::Pending(pending) => Outcome::from_future(pending),
        }
    }
}

impl IntoFuture for Completion {
    type Output = Result<Value, PipeError>;
    type IntoFuture = BoxFuture<'static, Result<Value, PipeError>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Completion::Ready(value) => future::ready(Ok(value)).boxed(),
            Completion::Pending(pending) => pending,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Ready(v) => f.debug_tuple("Ready").field(v).finish(),
            Completion::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
