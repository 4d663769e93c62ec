//! Builder por etapas.
//!
//! Los campos declarados como etapas deben asignarse exactamente en el orden
//! declarado. Mientras quede alguna etapa pendiente, cualquier otro setter
//! falla con `OutOfOrder` y `build()` con `StagesPending`. Agotadas las
//! etapas, el resto de campos se asigna libremente.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexSet;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::accumulator::{self, Accumulator, Assign, Shape};
use crate::error::BuilderError;
use crate::schema::ValueObject;

pub struct StagedBuilder<T: ValueObject> {
    acc: Accumulator,
    pending: IndexSet<&'static str>,
    _target: PhantomData<fn() -> T>,
}

impl<T: ValueObject> StagedBuilder<T> {
    /// Cada etapa debe ser un campo del esquema y aparecer una sola vez.
    pub fn new(stages: &[&str]) -> Result<Self, BuilderError> {
        let acc = Accumulator::new(T::schema(), T::type_name());
        let mut pending = IndexSet::with_capacity(stages.len());
        for stage in stages {
            let spec = acc.spec(stage)
                          .map_err(|_| BuilderError::InvalidStage(stage.to_string()))?;
            if !pending.insert(spec.name) {
                return Err(BuilderError::InvalidStage(stage.to_string()));
            }
        }
        Ok(Self { acc,
                  pending,
                  _target: PhantomData })
    }

    /// Próximo campo esperado, o `None` si ya no quedan etapas.
    pub fn next_stage(&self) -> Option<&'static str> {
        self.pending.first().copied()
    }

    pub fn pending(&self) -> Vec<&'static str> {
        self.pending.iter().copied().collect()
    }

    fn admit(&self, field: &str) -> Result<(), BuilderError> {
        let spec = self.acc.spec(field)?;
        match self.next_stage() {
            Some(expected) if expected != spec.name => Err(BuilderError::OutOfOrder { expected: expected.to_string(),
                                                                                     got: spec.name.to_string() }),
            _ => Ok(()),
        }
    }

    fn advance(&mut self, field: &'static str) {
        if self.pending.shift_remove(field) {
            debug!("{}: stage `{}` complete, next {:?}", T::type_name(), field, self.next_stage());
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, BuilderError> {
        self.set_with(field, Assign::Value(value.into()), |_| Ok(()))
    }

    pub fn derive<F>(&mut self, field: &str, func: F) -> Result<&mut Self, BuilderError>
        where F: FnOnce(&Shape) -> Value
    {
        self.set_with(field, Assign::derive(func), |_| Ok(()))
    }

    /// La etapa se da por cumplida en cuanto el valor queda escrito, aunque
    /// luego falle el validador.
    pub fn set_checked<'a, V>(&mut self,
                              field: &str,
                              assign: impl Into<Assign<'a>>,
                              validate: V)
                              -> Result<&mut Self, BuilderError>
        where V: FnOnce(&Shape) -> Result<(), String>
    {
        self.set_with(field, assign.into(), validate)
    }

    fn set_with<V>(&mut self, field: &str, assign: Assign<'_>, validate: V) -> Result<&mut Self, BuilderError>
        where V: FnOnce(&Shape) -> Result<(), String>
    {
        self.admit(field)?;
        let field = self.acc.write(field, assign)?;
        self.advance(field);
        self.acc.check(field, validate)?;
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.acc.get(field)
    }

    /// Un parcial puede cumplir varias etapas de una vez, sin importar el
    /// orden en que las traiga.
    pub fn from_partial<P>(&mut self, partial: &P) -> Result<&mut Self, BuilderError>
        where P: Serialize + ?Sized
    {
        let written = self.acc.merge(accumulator::to_object(partial)?)?;
        for field in written {
            self.advance(field);
        }
        Ok(self)
    }

    pub fn is_buildable(&self) -> bool {
        self.pending.is_empty() && self.acc.missing_required().is_empty()
    }

    pub fn build_value(&self) -> Result<Value, BuilderError> {
        if !self.pending.is_empty() {
            return Err(BuilderError::StagesPending(self.pending.iter().map(|s| s.to_string()).collect()));
        }
        self.acc.finish()
    }

    pub fn build(&self) -> Result<T, BuilderError> {
        Ok(serde_json::from_value(self.build_value()?)?)
    }
}

impl<T: ValueObject> fmt::Debug for StagedBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedBuilder")
         .field("type", &T::type_name())
         .field("pending", &self.pending)
         .field("shape", self.acc.shape())
         .finish()
    }
}
