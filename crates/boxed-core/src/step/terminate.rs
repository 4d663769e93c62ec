use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use super::Outcome;

/// Señal de terminación de una invocación.
///
/// Cada ejecución de un pipe crea una señal nueva y la entrega (clonada) a
/// cada step. El valor registrado es de escritura única: la primera
/// terminación gana y no puede deshacerse dentro de la misma invocación.
/// Valores "falsy" (`0`, `false`, `""`, `null`) son terminaciones válidas;
/// lo que cuenta es la presencia de la marca.
#[derive(Debug, Clone, Default)]
pub struct Terminate {
    recorded: Arc<OnceCell<Value>>,
}

impl Terminate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra `value` como resultado final y devuelve el marcador que el
    /// step debe retornar. Los steps restantes no se ejecutan.
    pub fn with(&self, value: impl Into<Value>) -> Outcome {
        Outcome::Terminated(self.settle(value.into()))
    }

    /// Termina sin valor (`null`).
    pub fn now(&self) -> Outcome {
        self.with(Value::Null)
    }

    pub fn is_set(&self) -> bool {
        self.recorded.get().is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.recorded.get()
    }

    /// Registra `value` si no había terminación previa y devuelve el valor
    /// efectivamente registrado.
    pub(crate) fn settle(&self, value: Value) -> Value {
        self.recorded.get_or_init(|| value).clone()
    }

    pub(crate) fn recorded(&self) -> Value {
        self.recorded.get().cloned().unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_termination_wins() {
        let t = Terminate::new();
        assert!(!t.is_set());
        assert!(matches!(t.with(400), Outcome::Terminated(v) if v == json!(400)));
        assert!(matches!(t.with(500), Outcome::Terminated(v) if v == json!(400)));
        assert_eq!(t.value(), Some(&json!(400)));
    }

    #[test]
    fn clones_share_the_same_signal() {
        let t = Terminate::new();
        let inner = t.clone();
        let _ = inner.with(false);
        assert!(t.is_set());
        assert_eq!(t.recorded(), json!(false));
    }

    #[test]
    fn terminate_without_value_records_null() {
        let t = Terminate::new();
        let _ = t.now();
        assert!(t.is_set());
        assert_eq!(t.value(), Some(&Value::Null));
    }
}
