use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

use crate::accumulator::{self, Accumulator, Assign, Shape};
use crate::error::BuilderError;
use crate::schema::ValueObject;

/// Builder "hacia delante": campos en cualquier orden, cada uno una sola vez.
pub struct ForwardBuilder<T: ValueObject> {
    acc: Accumulator,
    used: IndexSet<&'static str>,
    _target: PhantomData<fn() -> T>,
}

impl<T: ValueObject> ForwardBuilder<T> {
    pub fn new() -> Self {
        Self { acc: Accumulator::new(T::schema(), T::type_name()),
               used: IndexSet::new(),
               _target: PhantomData }
    }

    /// Setters todavía disponibles, en orden de declaración.
    pub fn remaining(&self) -> Vec<&'static str> {
        self.acc.schema().names().filter(|name| !self.used.contains(name)).collect()
    }

    fn admit(&self, field: &str) -> Result<&'static str, BuilderError> {
        let name = self.acc.spec(field)?.name;
        if self.used.contains(name) {
            return Err(BuilderError::AlreadySet(name.to_string()));
        }
        Ok(name)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, BuilderError> {
        self.set_checked(field, Assign::Value(value.into()), |_| Ok(()))
    }

    pub fn derive<F>(&mut self, field: &str, func: F) -> Result<&mut Self, BuilderError>
        where F: FnOnce(&Shape) -> Value
    {
        self.set_checked(field, Assign::derive(func), |_| Ok(()))
    }

    pub fn set_checked<'a, V>(&mut self,
                              field: &str,
                              assign: impl Into<Assign<'a>>,
                              validate: V)
                              -> Result<&mut Self, BuilderError>
        where V: FnOnce(&Shape) -> Result<(), String>
    {
        self.admit(field)?;
        let field = self.acc.write(field, assign.into())?;
        self.used.insert(field);
        self.acc.check(field, validate)?;
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.acc.get(field)
    }

    /// Todos los campos del parcial se comprueban antes de escribir nada.
    pub fn from_partial<P>(&mut self, partial: &P) -> Result<&mut Self, BuilderError>
        where P: Serialize + ?Sized
    {
        let entries = accumulator::to_object(partial)?;
        for field in entries.keys() {
            self.admit(field)?;
        }
        let written = self.acc.merge(entries)?;
        self.used.extend(written);
        Ok(self)
    }

    pub fn is_buildable(&self) -> bool {
        self.acc.missing_required().is_empty()
    }

    pub fn build_value(&self) -> Result<Value, BuilderError> {
        self.acc.finish()
    }

    pub fn build(&self) -> Result<T, BuilderError> {
        Ok(serde_json::from_value(self.build_value()?)?)
    }
}

impl<T: ValueObject> Default for ForwardBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueObject> fmt::Debug for ForwardBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardBuilder")
         .field("type", &T::type_name())
         .field("remaining", &self.remaining())
         .finish()
    }
}
