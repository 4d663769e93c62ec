//! Acumulador compartido por los tres builders.
//!
//! Semántica de escritura:
//! 1. El campo debe existir en el esquema.
//! 2. El valor se calcula (directo o derivado del acumulador actual).
//! 3. Se comprueba el tipo JSON; si no coincide no se escribe nada.
//! 4. Se escribe el valor.
//! 5. El validador (si hay) corre sobre el acumulador YA actualizado; si
//!    falla el valor permanece escrito (no hay rollback).

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::BuilderError;
use crate::schema::{FieldKind, FieldSpec, Schema};

/// Forma en curso del value object.
pub type Shape = Map<String, Value>;

/// Valor a asignar: directo o derivado del acumulador hasta el momento.
pub enum Assign<'a> {
    Value(Value),
    Derive(Box<dyn FnOnce(&Shape) -> Value + 'a>),
}

impl<'a> Assign<'a> {
    pub fn value(value: impl Into<Value>) -> Self {
        Assign::Value(value.into())
    }

    pub fn derive<F>(func: F) -> Self
        where F: FnOnce(&Shape) -> Value + 'a
    {
        Assign::Derive(Box::new(func))
    }
}

impl From<Value> for Assign<'_> {
    fn from(value: Value) -> Self {
        Assign::Value(value)
    }
}

/// Convierte un parcial serializable en objeto JSON.
pub(crate) fn to_object<P>(partial: &P) -> Result<Shape, BuilderError>
    where P: Serialize + ?Sized
{
    match serde_json::to_value(partial)? {
        Value::Object(entries) => Ok(entries),
        _ => Err(BuilderError::NotAnObject),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    schema: &'static Schema,
    type_name: &'static str,
    shape: Shape,
}

impl Accumulator {
    pub(crate) fn new(schema: &'static Schema, type_name: &'static str) -> Self {
        Self { schema,
               type_name,
               shape: Map::new() }
    }

    pub(crate) fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Resuelve el nombre canónico (estático) del campo.
    pub(crate) fn spec(&self, field: &str) -> Result<&'static FieldSpec, BuilderError> {
        self.schema.get(field).ok_or_else(|| BuilderError::UnknownField { type_name: self.type_name,
                                                                          field: field.to_string() })
    }

    /// Pasos 1–4: escribe el valor y devuelve el nombre canónico del campo.
    pub(crate) fn write(&mut self, field: &str, assign: Assign<'_>) -> Result<&'static str, BuilderError> {
        let spec = self.spec(field)?;
        let value = match assign {
            Assign::Value(value) => value,
            Assign::Derive(derive) => derive(&self.shape),
        };
        if !spec.accepts(&value) {
            return Err(BuilderError::Kind { field: spec.name.to_string(),
                                            expected: spec.kind,
                                            found: FieldKind::name_of(&value) });
        }
        debug!("{}.{} <- {}", self.type_name, spec.name, value);
        self.shape.insert(spec.name.to_string(), value);
        Ok(spec.name)
    }

    /// Paso 5: valida contra el acumulador actualizado.
    pub(crate) fn check<V>(&self, field: &'static str, validate: V) -> Result<(), BuilderError>
        where V: FnOnce(&Shape) -> Result<(), String>
    {
        validate(&self.shape).map_err(|message| {
                                 warn!("{}.{} rejected by validator: {}", self.type_name, field, message);
                                 BuilderError::Validation { field: field.to_string(),
                                                            message }
                             })
    }

    /// Fusiona un objeto parcial ya convertido; devuelve los campos escritos.
    /// Todo o nada: si alguna entrada no pasa las comprobaciones no se
    /// escribe ninguna.
    pub(crate) fn merge(&mut self, entries: Shape) -> Result<Vec<&'static str>, BuilderError> {
        let mut accepted = Vec::with_capacity(entries.len());
        for (field, value) in entries {
            let spec = self.spec(&field)?;
            if !spec.accepts(&value) {
                return Err(BuilderError::Kind { field: spec.name.to_string(),
                                                expected: spec.kind,
                                                found: FieldKind::name_of(&value) });
            }
            accepted.push((spec.name, value));
        }
        let mut written = Vec::with_capacity(accepted.len());
        for (field, value) in accepted {
            written.push(self.write(field, Assign::Value(value))?);
        }
        Ok(written)
    }

    pub(crate) fn get(&self, field: &str) -> Option<&Value> {
        self.shape.get(field)
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn missing_required(&self) -> Vec<String> {
        self.schema
            .required_names()
            .filter(|name| !self.shape.contains_key(*name))
            .map(str::to_string)
            .collect()
    }

    /// Forma final: campos asignados + defaults de los opcionales sin asignar.
    pub(crate) fn finish(&self) -> Result<Value, BuilderError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(BuilderError::MissingFields(missing));
        }
        let mut out = Map::with_capacity(self.schema.len());
        for spec in self.schema.fields() {
            let value = self.shape.get(spec.name).cloned().unwrap_or_else(|| spec.default.clone());
            out.insert(spec.name.to_string(), value);
        }
        Ok(Value::Object(out))
    }
}
