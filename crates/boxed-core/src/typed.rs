//! Adaptadores tipados.
//!
//! Permiten escribir steps con tipos concretos de Rust: el input `Value` se
//! decodifica a `I` y el output `O` se serializa de vuelta. Un fallo de
//! decodificación es un fallo del step (`PipeError::Decode`).

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::PipeError;
use crate::step::{Entry, Step};

fn label<I, O>() -> String {
    format!("{} -> {}", short_name::<I>(), short_name::<O>())
}

fn short_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // conserva los genéricos (`Vec<u8>`), recorta sólo el path del tipo raíz
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

pub fn map<I, O, F>(func: F) -> Step
    where I: DeserializeOwned,
          O: Serialize,
          F: Fn(I) -> O + Send + Sync + 'static
{
    Step::try_map(move |input| {
        let typed: I = serde_json::from_value(input)?;
        Ok(serde_json::to_value(func(typed))?)
    }).labeled(label::<I, O>())
}

pub fn try_map<I, O, F>(func: F) -> Step
    where I: DeserializeOwned,
          O: Serialize,
          F: Fn(I) -> Result<O, PipeError> + Send + Sync + 'static
{
    Step::try_map(move |input| {
        let typed: I = serde_json::from_value(input)?;
        Ok(serde_json::to_value(func(typed)?)?)
    }).labeled(label::<I, O>())
}

/// Step asíncrono tipado. La decodificación del input ocurre antes de
/// diferir, así que un input inválido falla de forma síncrona.
pub fn future<I, O, F, Fut>(func: F) -> Step
    where I: DeserializeOwned,
          O: Serialize,
          F: Fn(I) -> Fut + Send + Sync + 'static,
          Fut: Future<Output = Result<O, PipeError>> + Send + 'static
{
    Step::new(move |input, _| {
        let typed: I = serde_json::from_value(input)?;
        let pending = func(typed);
        Ok(crate::step::Outcome::from_future(async move { Ok(serde_json::to_value(pending.await?)?) }))
    }).labeled(label::<I, O>())
}

/// Entrada tipada: la lista de argumentos se decodifica como un array JSON,
/// así `A` puede ser una tupla (`(f64, f64)`) o un `Vec<T>`.
pub fn entry<A, O, F>(func: F) -> Entry
    where A: DeserializeOwned,
          O: Serialize,
          F: Fn(A) -> O + Send + Sync + 'static
{
    Entry::try_map(move |args| {
        let typed: A = serde_json::from_value(serde_json::Value::Array(args))?;
        Ok(serde_json::to_value(func(typed))?)
    }).labeled(label::<A, O>())
}
