use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::{Outcome, Terminate};
use crate::errors::PipeError;
use crate::Args;

type StepFn = dyn Fn(Value, Terminate) -> Result<Outcome, PipeError> + Send + Sync;
type EntryFn = dyn Fn(Args, Terminate) -> Result<Outcome, PipeError> + Send + Sync;

/// Unidad de transformación unaria. Recibe la salida resuelta del paso
/// anterior y el handle de terminación de la invocación en curso.
///
/// Un `Step` es barato de clonar (la función se comparte por `Arc`), lo que
/// permite que varias cadenas compartan prefijos sin copiar código.
#[derive(Clone)]
pub struct Step {
    func: Arc<StepFn>,
    label: Option<Cow<'static, str>>,
}

impl Step {
    /// Contrato completo: la función decide el `Outcome`.
    pub fn new<F>(func: F) -> Self
        where F: Fn(Value, Terminate) -> Result<Outcome, PipeError> + Send + Sync + 'static
    {
        Self { func: Arc::new(func),
               label: None }
    }

    /// Transformación síncrona infalible.
    pub fn map<F>(func: F) -> Self
        where F: Fn(Value) -> Value + Send + Sync + 'static
    {
        Self::new(move |input, _| Ok(Outcome::Immediate(func(input))))
    }

    /// Transformación síncrona que puede fallar.
    pub fn try_map<F>(func: F) -> Self
        where F: Fn(Value) -> Result<Value, PipeError> + Send + Sync + 'static
    {
        Self::new(move |input, _| func(input).map(Outcome::Immediate))
    }

    /// Transformación asíncrona: el step siempre produce un valor diferido.
    pub fn future<F, Fut>(func: F) -> Self
        where F: Fn(Value) -> Fut + Send + Sync + 'static,
              Fut: Future<Output = Result<Value, PipeError>> + Send + 'static
    {
        Self::new(move |input, _| Ok(Outcome::from_future(func(input))))
    }

    pub fn labeled(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `true` si ambos steps comparten la misma función (mismo `Arc`).
    pub fn ptr_eq(&self, other: &Step) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub(crate) fn invoke(&self, input: Value, terminate: Terminate) -> Result<Outcome, PipeError> {
        (self.func)(input, terminate)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Step semilla de una cadena: recibe la lista completa de argumentos de la
/// llamada (aridad ≥ 0). Es el único paso que admite más de un argumento.
#[derive(Clone)]
pub struct Entry {
    func: Arc<EntryFn>,
    label: Option<Cow<'static, str>>,
}

impl Entry {
    pub fn new<F>(func: F) -> Self
        where F: Fn(Args, Terminate) -> Result<Outcome, PipeError> + Send + Sync + 'static
    {
        Self { func: Arc::new(func),
               label: None }
    }

    pub fn map<F>(func: F) -> Self
        where F: Fn(Args) -> Value + Send + Sync + 'static
    {
        Self::new(move |args, _| Ok(Outcome::Immediate(func(args))))
    }

    pub fn try_map<F>(func: F) -> Self
        where F: Fn(Args) -> Result<Value, PipeError> + Send + Sync + 'static
    {
        Self::new(move |args, _| func(args).map(Outcome::Immediate))
    }

    pub fn future<F, Fut>(func: F) -> Self
        where F: Fn(Args) -> Fut + Send + Sync + 'static,
              Fut: Future<Output = Result<Value, PipeError>> + Send + 'static
    {
        Self::new(move |args, _| Ok(Outcome::from_future(func(args))))
    }

    pub fn labeled(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// `true` si ambas entradas comparten la misma función (mismo `Arc`).
    pub fn ptr_eq(&self, other: &Entry) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub(crate) fn invoke(&self, args: Args, terminate: Terminate) -> Result<Outcome, PipeError> {
        (self.func)(args, terminate)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Un step unario usado como semilla recibe el primer argumento
/// (`null` si la llamada no trae ninguno); el resto se ignora.
impl From<Step> for Entry {
    fn from(step: Step) -> Self {
        let label = step.label.clone();
        let entry = Entry::new(move |args: Args, terminate| {
                        let first = args.into_iter().next().unwrap_or(Value::Null);
                        step.invoke(first, terminate)
                    });
        Entry { label, ..entry }
    }
}
