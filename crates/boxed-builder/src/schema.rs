//! Esquema de campos de un value object.
//!
//! Cada tipo declara estáticamente su tabla de campos (nombre → tipo,
//! obligatoriedad y valor por defecto). La tabla se construye una sola vez
//! por tipo y se reutiliza en todos los builders.

use std::fmt;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Tipo JSON esperado para un campo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Array,
    Object,
    Any,
}

impl FieldKind {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Any => true,
        }
    }

    /// Nombre del tipo JSON de `value`, usado en mensajes de error.
    pub fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "bool",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Valor aplicado en `build()` si el campo opcional no fue asignado.
    pub default: Value,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name,
               kind,
               required: true,
               default: Value::Null }
    }

    pub fn optional(name: &'static str, kind: FieldKind, default: Value) -> Self {
        Self { name,
               kind,
               required: false,
               default }
    }

    /// `null` sólo es válido para campos opcionales.
    pub fn accepts(&self, value: &Value) -> bool {
        self.kind.accepts(value) || (value.is_null() && !self.required)
    }
}

/// Tabla ordenada de campos (el orden es el de declaración).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<&'static str, FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade (o reemplaza) un campo.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(spec.name, spec);
        self
    }

    pub fn required(self, name: &'static str, kind: FieldKind) -> Self {
        self.field(FieldSpec::required(name, kind))
    }

    pub fn optional(self, name: &'static str, kind: FieldKind, default: Value) -> Self {
        self.field(FieldSpec::optional(name, kind, default))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields().filter(|f| f.required).map(|f| f.name)
    }

    /// Tabla de valores por defecto de los campos opcionales.
    pub fn defaults(&self) -> Map<String, Value> {
        self.fields()
            .filter(|f| !f.required)
            .map(|f| (f.name.to_string(), f.default.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Tipo construible por los builders: serializable y con esquema estático.
pub trait ValueObject: Serialize + DeserializeOwned {
    fn schema() -> &'static Schema;

    /// Nombre usado en errores.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
