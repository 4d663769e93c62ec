use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::accumulator::{self, Accumulator, Assign, Shape};
use crate::error::BuilderError;
use crate::schema::ValueObject;

/// Builder directo: cualquier campo, en cualquier orden, tantas veces como
/// se quiera.
///
/// Usage:
///   let mut b = Builder::<Student>::new();
///   b.set("name", "a")?.set("location", "b")?;
///   let student = b.build()?;
pub struct Builder<T: ValueObject> {
    acc: Accumulator,
    _target: PhantomData<fn() -> T>,
}

impl<T: ValueObject> Builder<T> {
    pub fn new() -> Self {
        Self { acc: Accumulator::new(T::schema(), T::type_name()),
               _target: PhantomData }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, BuilderError> {
        self.acc.write(field, Assign::Value(value.into()))?;
        Ok(self)
    }

    /// Calcula el valor a partir de lo acumulado hasta ahora.
    pub fn derive<F>(&mut self, field: &str, func: F) -> Result<&mut Self, BuilderError>
        where F: FnOnce(&Shape) -> Value
    {
        self.acc.write(field, Assign::derive(func))?;
        Ok(self)
    }

    /// Escribe y luego valida contra el acumulador actualizado. Si el
    /// validador falla, el valor queda escrito igualmente.
    pub fn set_checked<'a, V>(&mut self,
                              field: &str,
                              assign: impl Into<Assign<'a>>,
                              validate: V)
                              -> Result<&mut Self, BuilderError>
        where V: FnOnce(&Shape) -> Result<(), String>
    {
        let field = self.acc.write(field, assign.into())?;
        self.acc.check(field, validate)?;
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.acc.get(field)
    }

    pub fn shape(&self) -> &Shape {
        self.acc.shape()
    }

    pub fn from_partial<P>(&mut self, partial: &P) -> Result<&mut Self, BuilderError>
        where P: Serialize + ?Sized
    {
        self.acc.merge(accumulator::to_object(partial)?)?;
        Ok(self)
    }

    pub fn missing(&self) -> Vec<String> {
        self.acc.missing_required()
    }

    pub fn is_buildable(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn build_value(&self) -> Result<Value, BuilderError> {
        self.acc.finish()
    }

    pub fn build(&self) -> Result<T, BuilderError> {
        Ok(serde_json::from_value(self.build_value()?)?)
    }
}

impl<T: ValueObject> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueObject> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Self { acc: self.acc.clone(),
               _target: PhantomData }
    }
}

impl<T: ValueObject> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
         .field("type", &T::type_name())
         .field("shape", self.acc.shape())
         .finish()
    }
}
