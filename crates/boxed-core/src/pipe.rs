use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::chain::Chain;
use crate::completion::Completion;
use crate::errors::PipeError;
use crate::executor;
use crate::step::{Entry, Step};
use crate::Args;

/// Pipe: valor invocable que envuelve una `Chain`.
///
/// `then` nunca muta el pipe original; devuelve uno nuevo cuya cadena es la
/// anterior más el step añadido. Un pipe no guarda estado entre
/// invocaciones, por lo que puede clonarse y llamarse desde varios sitios
/// (o tareas) a la vez.
///
/// Usage:
///   let pipe = Pipe::new(Entry::map(sum)).then(Step::map(is_positive));
///   let out = pipe.call(args![10, 20])?.await?;
#[derive(Debug, Clone)]
pub struct Pipe {
    chain: Chain,
}

impl Pipe {
    /// Crea un pipe de un solo paso. La semilla recibe todos los argumentos
    /// de la llamada; acepta `Entry`, `Step` o un `Pipe` (anidado).
    pub fn new(seed: impl Into<Entry>) -> Self {
        Self { chain: Chain::new(seed.into()) }
    }

    /// Añade un step al final devolviendo un pipe nuevo. Acepta `Step` o un
    /// `Pipe` (anidado).
    pub fn then(&self, step: impl Into<Step>) -> Self {
        Self { chain: self.chain.append(step.into()) }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn labels(&self) -> Vec<Option<&str>> {
        self.chain.labels()
    }

    /// Invoca el pipe. Devuelve `Err` si un step falla de forma síncrona;
    /// si algún step difiere su resultado, la `Completion` queda pendiente.
    pub fn call(&self, args: Args) -> Result<Completion, PipeError> {
        executor::execute(&self.chain, args)
    }

    /// Atajo para pipes unarios.
    pub fn apply(&self, input: impl Into<Value>) -> Result<Completion, PipeError> {
        self.call(vec![input.into()])
    }

    /// Invoca y espera el resultado, sea inmediato o diferido.
    pub async fn run(&self, args: Args) -> Result<Value, PipeError> {
        self.call(args)?.await
    }

    pub async fn run_as<T>(&self, args: Args) -> Result<T, PipeError>
        where T: DeserializeOwned
    {
        self.call(args)?.into_typed().await
    }

    /// Invoca bloqueando el hilo actual hasta obtener el valor final. Los
    /// steps no pueden depender del reactor de tokio (ver `Completion::block`).
    pub fn call_blocking(&self, args: Args) -> Result<Value, PipeError> {
        self.call(args)?.block()
    }
}

// -------------------------------------------------------------
// Anidamiento: un `Pipe` usado como step es una caja opaca. Se ejecuta
// completo (asincronía y terminación internas incluidas) y sólo su valor
// resuelto llega a la cadena exterior.
// -------------------------------------------------------------
impl From<Pipe> for Step {
    fn from(pipe: Pipe) -> Self {
        let label = format!("pipe[{}]", pipe.len());
        Step::new(move |input, _outer| pipe.apply(input).map(Completion::into_outcome)).labeled(label)
    }
}

impl From<&Pipe> for Step {
    fn from(pipe: &Pipe) -> Self {
        Step::from(pipe.clone())
    }
}

impl From<Pipe> for Entry {
    fn from(pipe: Pipe) -> Self {
        let label = format!("pipe[{}]", pipe.len());
        Entry::new(move |args, _outer| pipe.call(args).map(Completion::into_outcome)).labeled(label)
    }
}

impl From<&Pipe> for Entry {
    fn from(pipe: &Pipe) -> Self {
        Entry::from(pipe.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Outcome;
    use serde_json::json;

    fn multiply_by(factor: f64) -> Step {
        Step::map(move |v| json!(v.as_f64().unwrap_or(0.0) * factor))
    }

    #[test]
    fn then_does_not_mutate_the_base_pipe() {
        let base = Pipe::new(multiply_by(2.0));
        let extended = base.then(multiply_by(3.0));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(base.call_blocking(vec![json!(1.0)]).expect("base"), json!(2.0));
        assert_eq!(extended.call_blocking(vec![json!(1.0)]).expect("extended"), json!(6.0));
    }

    #[test]
    fn nested_pipe_hides_inner_termination() {
        let inner = Pipe::new(Step::new(|_, t| Ok(t.with(1.0))));
        let outer = Pipe::new(multiply_by(1.0)).then(&inner).then(multiply_by(10.0));
        let out = outer.apply(json!(5.0)).expect("outer");
        assert_eq!(out.ready(), Some(json!(10.0)));
    }

    #[test]
    fn nested_pipe_label_reports_inner_length() {
        let inner = Pipe::new(multiply_by(1.0)).then(multiply_by(1.0));
        let outer = Pipe::new(&inner).then(inner);
        assert_eq!(outer.labels(), vec![Some("pipe[2]"), Some("pipe[2]")]);
    }

    #[test]
    fn nested_async_pipe_defers_the_outer_chain() {
        let inner = Pipe::new(Step::future(|v| async move { Ok(v) }));
        let outer = Pipe::new(multiply_by(2.0)).then(inner);
        let out = outer.apply(json!(2.0)).expect("outer");
        assert!(out.is_pending());
        assert_eq!(out.block().expect("resolves"), json!(4.0));
    }

    #[test]
    fn nested_entry_receives_every_argument() {
        let sum = Pipe::new(Entry::map(|args| json!(args.iter().filter_map(Value::as_i64).sum::<i64>())));
        let outer = Pipe::new(sum).then(Step::new(|v, _| Ok(Outcome::Immediate(json!(v.as_i64() == Some(6))))));
        assert_eq!(outer.call_blocking(vec![json!(1), json!(2), json!(3)]).expect("outer"), json!(true));
    }
}
