use std::sync::Arc;

use crate::step::{Entry, Step};

/// Secuencia inmutable de pasos que define el comportamiento de un pipe.
///
/// `append` nunca modifica la cadena original: produce una nueva
/// (`old ++ [step]`). Los steps se comparten por `Arc`, así que dos pipes
/// derivados del mismo prefijo comparten esas funciones sin riesgo.
#[derive(Debug, Clone)]
pub struct Chain {
    entry: Entry,
    steps: Arc<[Step]>,
}

impl Chain {
    pub fn new(entry: Entry) -> Self {
        Self { entry,
               steps: Arc::from(Vec::new()) }
    }

    pub fn append(&self, step: Step) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(step);
        Self { entry: self.entry.clone(),
               steps: steps.into() }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Steps posteriores a la entrada, en orden.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step en la posición `index` (0 es la entrada, que no es un `Step`).
    pub(crate) fn step_at(&self, index: usize) -> Option<&Step> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub(crate) fn label_at(&self, index: usize) -> Option<&str> {
        match index {
            0 => self.entry.label(),
            _ => self.step_at(index).and_then(Step::label),
        }
    }

    /// Número de pasos, contando la entrada.
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    /// Una cadena siempre tiene al menos la entrada.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn labels(&self) -> Vec<Option<&str>> {
        (0..self.len()).map(|i| self.label_at(i)).collect()
    }

    /// `true` si `self` es prefijo (por identidad de entrada y steps) de
    /// `other`.
    pub fn is_prefix_of(&self, other: &Chain) -> bool {
        self.entry.ptr_eq(&other.entry)
        && self.steps.len() <= other.steps.len()
        && self.steps.iter().zip(other.steps.iter()).all(|(a, b)| a.ptr_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn identity() -> Step {
        Step::map(|v: Value| v)
    }

    #[test]
    fn append_returns_new_chain_and_keeps_original() {
        let base = Chain::new(Entry::map(|_| Value::Null));
        let longer = base.append(identity().labeled("a"));
        assert_eq!(base.len(), 1);
        assert_eq!(longer.len(), 2);
        assert!(base.is_prefix_of(&longer));
    }

    #[test]
    fn divergent_chains_share_prefix() {
        let base = Chain::new(Entry::map(|_| Value::Null)).append(identity().labeled("shared"));
        let left = base.append(identity().labeled("left"));
        let right = base.append(identity().labeled("right"));
        assert!(base.is_prefix_of(&left));
        assert!(base.is_prefix_of(&right));
        assert!(!left.is_prefix_of(&right));
        assert_eq!(left.labels(), vec![None, Some("shared"), Some("left")]);
        assert_eq!(right.labels(), vec![None, Some("shared"), Some("right")]);
    }

    #[test]
    fn chains_with_different_entries_are_not_prefixes() {
        let left = Chain::new(Entry::map(|_| Value::Null));
        let right = Chain::new(Entry::map(|_| Value::Null));
        assert!(!left.is_prefix_of(&right));
        assert!(!right.is_prefix_of(&left));
        assert!(left.is_prefix_of(&left.clone()));
        assert!(!left.append(identity()).is_prefix_of(&right.append(identity())));
    }

    #[test]
    fn step_positions_skip_the_entry() {
        let chain = Chain::new(Entry::map(|_| Value::Null).labeled("entry")).append(identity().labeled("first"));
        assert!(chain.step_at(0).is_none());
        assert_eq!(chain.step_at(1).and_then(Step::label), Some("first"));
        assert!(chain.step_at(2).is_none());
        assert_eq!(chain.label_at(0), Some("entry"));
    }
}
