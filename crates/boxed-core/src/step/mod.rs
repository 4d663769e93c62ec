//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de transformación unaria, síncrona o asíncrona, que
//! recibe además el handle de terminación de la invocación. Este módulo define:
//! - `Step` / `Entry`: funciones compartibles que componen una cadena.
//! - `Outcome`: etiqueta explícita Immediate | Deferred | Terminated.
//! - `Terminate`: señal de corto-circuito por invocación.
//! - `Transform` / `AsyncTransform`: steps definidos como tipos.

mod definition;
mod outcome;
mod terminate;
pub mod transform;

pub use definition::{Entry, Step};
pub use outcome::{DeferredOutcome, Outcome};
pub use terminate::Terminate;
pub use transform::{AsyncTransform, Transform};
