//! Builders de value objects con esquema explícito en tiempo de ejecución.
//!
//! Tres superficies comparten el mismo acumulador:
//! - `Builder`: campos en cualquier orden.
//! - `StagedBuilder`: orden de etapas obligatorio.
//! - `ForwardBuilder`: cada campo una sola vez.

mod accumulator;
pub mod blueprint;
pub mod builder;
pub mod error;
pub mod forward;
pub mod macros;
pub mod schema;
pub mod staged;

pub use accumulator::{Assign, Shape};
pub use blueprint::Blueprint;
pub use builder::Builder;
pub use error::BuilderError;
pub use forward::ForwardBuilder;
pub use schema::{FieldKind, FieldSpec, Schema, ValueObject};
pub use staged::StagedBuilder;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    use serde::Serialize;
    use serde_json::Value;

    pub fn to_default<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap_or(Value::Null)
    }
}
