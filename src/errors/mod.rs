pub mod boxed_error;

pub use boxed_error::BoxedError;
