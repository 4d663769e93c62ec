//! Executor: evalúa una `Chain` contra los argumentos de una llamada.
//!
//! Mientras todos los steps producen valores inmediatos la ejecución es
//! síncrona y el resultado es `Completion::Ready`. En cuanto un step devuelve
//! un valor diferido, el resto de la invocación se convierte en una única
//! continuación asíncrona (`Completion::Pending`): todos los steps
//! siguientes, sean síncronos o no, se ejecutan dentro de ella.
//!
//! La señal de terminación se crea al inicio de cada invocación y se
//! consulta después de cada step (y después de cada resolución diferida);
//! una vez registrada, los steps restantes no se ejecutan.

use futures::FutureExt;
use log::{debug, trace};
use serde_json::Value;
use uuid::Uuid;

use crate::chain::Chain;
use crate::completion::Completion;
use crate::config;
use crate::errors::PipeError;
use crate::step::{DeferredOutcome, Outcome, Step, Terminate};
use crate::Args;

const TARGET: &str = "boxed::executor";

/// Estado transitorio de una invocación. Nunca forma parte de la cadena.
struct Invocation {
    id: Uuid,
    signal: Terminate,
    trace_steps: bool,
}

/// Resultado de un step ya clasificado frente a la señal de terminación.
enum Settled {
    Value(Value),
    Deferred(DeferredOutcome),
    Terminated(Value),
}

/// Ejecuta `chain` con `args`.
///
/// Un fallo síncrono de un step se devuelve como `Err` inmediatamente; un
/// fallo dentro de un valor diferido se devuelve al resolver la
/// `Completion::Pending`.
pub fn execute(chain: &Chain, args: Args) -> Result<Completion, PipeError> {
    let invocation = Invocation::start(chain);
    let entry = chain.entry();
    invocation.trace(0, entry.label());

    let mut current = entry.invoke(args, invocation.signal.clone())
                           .map_err(|e| e.at(0, entry.label()))?;
    let mut index = 0;
    loop {
        let value = match invocation.settle(index, current) {
            Settled::Terminated(value) => return Ok(Completion::Ready(value)),
            Settled::Deferred(pending) => {
                debug!(target: TARGET, "[{}] step #{} deferred, continuing asynchronously", invocation.id, index);
                let continuation = invocation.resume(chain.clone(), pending, index);
                return Ok(Completion::Pending(continuation.boxed()));
            }
            Settled::Value(value) => value,
        };

        index += 1;
        let Some(step) = chain.step_at(index) else {
            return Ok(Completion::Ready(value));
        };
        current = invocation.apply(index, step, value)?;
    }
}

impl Invocation {
    fn start(chain: &Chain) -> Self {
        let invocation = Self { id: Uuid::new_v4(),
                                signal: Terminate::new(),
                                trace_steps: config::current().trace_steps };
        if invocation.trace_steps {
            trace!(target: TARGET, "[{}] invoking chain of {} steps", invocation.id, chain.len());
        }
        invocation
    }

    fn trace(&self, index: usize, label: Option<&str>) {
        if self.trace_steps {
            trace!(target: TARGET, "[{}] step #{} ({})", self.id, index, label.unwrap_or("anonymous"));
        }
    }

    fn apply(&self, index: usize, step: &Step, input: Value) -> Result<Outcome, PipeError> {
        self.trace(index, step.label());
        step.invoke(input, self.signal.clone()).map_err(|e| e.at(index, step.label()))
    }

    /// Clasifica el `Outcome` del step `index`. La señal tiene prioridad:
    /// si el step terminó (por handle o devolviendo `Terminated`) el valor
    /// registrado es el resultado final, aunque además haya devuelto un
    /// diferido.
    fn settle(&self, index: usize, outcome: Outcome) -> Settled {
        match outcome {
            Outcome::Terminated(value) => {
                let value = self.signal.settle(value);
                debug!(target: TARGET, "[{}] terminated at step #{}", self.id, index);
                Settled::Terminated(value)
            }
            _ if self.signal.is_set() => {
                debug!(target: TARGET, "[{}] terminated at step #{}", self.id, index);
                Settled::Terminated(self.signal.recorded())
            }
            Outcome::Immediate(value) => Settled::Value(value),
            Outcome::Deferred(pending) => Settled::Deferred(pending),
        }
    }

    /// Continuación asíncrona a partir del diferido producido por el step
    /// `index`. Los diferidos que resuelven a otro diferido se aplanan.
    async fn resume(self, chain: Chain, pending: DeferredOutcome, mut index: usize) -> Result<Value, PipeError> {
        let mut current = Outcome::Deferred(pending);
        loop {
            let value = match self.settle(index, current) {
                Settled::Terminated(value) => return Ok(value),
                Settled::Deferred(pending) => {
                    current = pending.await.map_err(|e| e.at(index, chain.label_at(index)))?;
                    continue;
                }
                Settled::Value(value) => value,
            };

            index += 1;
            let Some(step) = chain.step_at(index) else {
                return Ok(value);
            };
            current = self.apply(index, step, value)?;
        }
    }
}
