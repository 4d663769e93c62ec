//! boxed-core: motor de composición de funciones (Pipe).
//!
//! Encadena steps unarios en una única unidad invocable, unificando steps
//! síncronos y asíncronos, con corto-circuito explícito (`Terminate`),
//! primer argumento variádico y pipes anidables como steps de otros pipes.

pub mod chain;
pub mod completion;
pub mod config;
pub mod errors;
pub mod executor;
pub mod macros;
pub mod pipe;
pub mod step;
pub mod typed;

use serde_json::Value;

/// Argumentos posicionales de una llamada.
pub type Args = Vec<Value>;

pub use chain::Chain;
pub use completion::Completion;
pub use config::PipeConfig;
pub use errors::PipeError;
pub use pipe::Pipe;
pub use step::{AsyncTransform, DeferredOutcome, Entry, Outcome, Step, Terminate, Transform};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
