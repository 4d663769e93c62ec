//! Boxed
//!
//! Librería de fachada:
//! - Re-exporta `boxed_core` (pipes) y `boxed_builder` (value objects).
//! - Expone `errors` con el error de aplicación que agrupa a ambos.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod errors;

pub use boxed_builder::{value_object, Assign, Blueprint, Builder, BuilderError, FieldKind, FieldSpec,
                        ForwardBuilder, Schema, Shape, StagedBuilder, ValueObject};
pub use boxed_core::{args, config, typed, Args, Chain, Completion, Entry, Outcome, Pipe, PipeConfig, PipeError, Step,
                     Terminate, Transform, AsyncTransform};
pub use errors::BoxedError;
