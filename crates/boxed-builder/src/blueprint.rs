use std::marker::PhantomData;

use crate::builder::Builder;
use crate::error::BuilderError;
use crate::forward::ForwardBuilder;
use crate::schema::{Schema, ValueObject};
use crate::staged::StagedBuilder;

/// Fábrica de builders para un value object.
///
/// Usage:
///   let students = Blueprint::<Student>::new();
///   let mut staged = students.staged_builder(&["name", "location"])?;
pub struct Blueprint<T: ValueObject> {
    _target: PhantomData<fn() -> T>,
}

impl<T: ValueObject> Blueprint<T> {
    pub fn new() -> Self {
        Self { _target: PhantomData }
    }

    pub fn schema(&self) -> &'static Schema {
        T::schema()
    }

    pub fn builder(&self) -> Builder<T> {
        Builder::new()
    }

    pub fn staged_builder(&self, stages: &[&str]) -> Result<StagedBuilder<T>, BuilderError> {
        StagedBuilder::new(stages)
    }

    pub fn forward_builder(&self) -> ForwardBuilder<T> {
        ForwardBuilder::new()
    }
}

impl<T: ValueObject> Default for Blueprint<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueObject> Clone for Blueprint<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ValueObject> Copy for Blueprint<T> {}
