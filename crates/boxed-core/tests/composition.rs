//! Escenarios de composición: síncronos, asíncronos, corto-circuito y
//! anidamiento.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use boxed_core::{args, Entry, Outcome, Pipe, PipeError, Step};
use serde_json::{json, Value};

const ERROR: i64 = 400;

fn positive() -> Step {
    Step::map(|x| json!(x.as_f64().unwrap_or(0.0) > 0.0)).labeled("positive")
}

fn negate() -> Step {
    Step::map(|x| json!(!x.as_bool().unwrap_or(false))).labeled("negate")
}

fn multiply_by(factor: f64) -> Step {
    Step::map(move |y| json!(factor * y.as_f64().unwrap_or(0.0)))
}

fn async_multiply_by(factor: f64) -> Step {
    Step::future(move |y| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(json!(factor * y.as_f64().unwrap_or(0.0)))
    })
}

fn reject() -> Step {
    Step::new(|_, terminate| Ok(terminate.with(ERROR)))
}

fn counted(calls: &Arc<AtomicUsize>) -> Step {
    let calls = Arc::clone(calls);
    Step::map(move |v| {
        calls.fetch_add(1, Ordering::SeqCst);
        v
    })
}

// ---------------- Síncronos ----------------

#[test]
fn unary() {
    assert_eq!(Pipe::new(positive()).apply(10).unwrap().ready(), Some(json!(true)));
}

#[test]
fn compose_functions() {
    assert_eq!(Pipe::new(positive()).then(negate()).apply(10).unwrap().ready(), Some(json!(false)));
}

#[test]
fn composition_law_matches_nested_application() {
    let f = |x: f64| x + 1.0;
    let g = |x: f64| x * 3.0;
    let h = |x: f64| x - 2.0;
    let pipe = Pipe::new(Step::map(move |v| json!(f(v.as_f64().unwrap()))))
        .then(Step::map(move |v| json!(g(v.as_f64().unwrap()))))
        .then(Step::map(move |v| json!(h(v.as_f64().unwrap()))));
    for x in [-3.0, 0.0, 1.5, 10.0] {
        assert_eq!(pipe.apply(x).unwrap().ready(), Some(json!(h(g(f(x))))));
    }
}

#[test]
fn compose_pipes() {
    // Área de un triángulo
    let base = 10.0;
    let height = 5.0;
    let area = Pipe::new(Pipe::new(multiply_by(0.5))).then(multiply_by(height));
    assert_eq!(area.apply(base).unwrap().ready(), Some(json!(25.0)));
}

#[test]
fn variadic_entry() {
    let sum = Entry::map(|args| json!(args.iter().filter_map(Value::as_f64).sum::<f64>()));
    let pipe = Pipe::new(sum).then(positive());
    assert_eq!(pipe.call(args![10, 20]).unwrap().ready(), Some(json!(true)));
}

#[test]
fn repeated_invocations_are_independent() {
    let pipe = Pipe::new(multiply_by(2.0)).then(Step::new(|v, t| {
                                              if v.as_f64() == Some(0.0) {
                                                  Ok(t.with("zero"))
                                              } else {
                                                  Ok(Outcome::Immediate(v))
                                              }
                                          }));
    assert_eq!(pipe.apply(3).unwrap().ready(), Some(json!(6.0)));
    assert_eq!(pipe.apply(0).unwrap().ready(), Some(json!("zero")));
    assert_eq!(pipe.apply(3).unwrap().ready(), Some(json!(6.0)));
}

#[test]
fn shared_prefix_extends_into_divergent_pipes() {
    let base = Pipe::new(multiply_by(2.0));
    let doubled_positive = base.then(positive());
    let doubled_then_tripled = base.then(multiply_by(3.0));

    assert_eq!(base.apply(-1).unwrap().ready(), Some(json!(-2.0)));
    assert_eq!(doubled_positive.apply(-1).unwrap().ready(), Some(json!(false)));
    assert_eq!(doubled_then_tripled.apply(-1).unwrap().ready(), Some(json!(-6.0)));
    assert!(base.chain().is_prefix_of(doubled_positive.chain()));
    assert!(base.chain().is_prefix_of(doubled_then_tripled.chain()));
}

#[test]
fn terminate_entry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipe = Pipe::new(reject()).then(counted(&calls)).then(positive());
    assert_eq!(pipe.apply(1).unwrap().ready(), Some(json!(ERROR)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn terminate_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipe = Pipe::new(positive()).then(reject()).then(counted(&calls)).then(negate());
    assert_eq!(pipe.apply(-1).unwrap().ready(), Some(json!(ERROR)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn terminate_end_of_chain() {
    let pipe = Pipe::new(positive()).then(negate()).then(reject());
    assert_eq!(pipe.apply(10).unwrap().ready(), Some(json!(ERROR)));
}

#[test]
fn falsy_terminal_values_still_short_circuit() {
    let calls = Arc::new(AtomicUsize::new(0));
    for terminal in [json!(0), json!(false), json!(""), json!([]), Value::Null] {
        let value = terminal.clone();
        let pipe = Pipe::new(Step::new(move |_, t| Ok(t.with(value.clone())))).then(counted(&calls));
        assert_eq!(pipe.apply(1).unwrap().ready(), Some(terminal));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn inner_termination_does_not_stop_the_outer_pipe() {
    let inner = Pipe::new(reject()).then(negate());
    let outer = Pipe::new(inner).then(multiply_by(2.0));
    assert_eq!(outer.apply(1).unwrap().ready(), Some(json!(800.0)));
}

#[test]
fn sync_fault_propagates_synchronously() {
    let pipe = Pipe::new(positive()).then(Step::try_map(|_| Err(PipeError::failed("nope"))));
    let err = pipe.apply(1).unwrap_err();
    assert_eq!(err.index(), Some(1));
}

#[test]
fn nested_fault_reports_the_outer_position_first() {
    let inner = Pipe::new(multiply_by(1.0)).then(Step::try_map(|_| Err(PipeError::failed("inner"))));
    let outer = Pipe::new(positive()).then(negate()).then(inner);
    let err = outer.apply(1).unwrap_err();
    assert_eq!(err.index(), Some(2));
    assert_eq!(err.path(), vec![2, 1]);
    assert_eq!(err.root().to_string(), "inner");
}

// ---------------- Asíncronos ----------------

#[tokio::test]
async fn async_entry() {
    let completion = Pipe::new(async_multiply_by(5.0)).apply(4).unwrap();
    assert!(completion.is_pending());
    assert_eq!(completion.await.unwrap(), json!(20.0));
}

#[tokio::test]
async fn async_composite_pipes() {
    let pipe = Pipe::new(async_multiply_by(5.0)).then(Pipe::new(async_multiply_by(5.0)));
    assert_eq!(pipe.run(args![4]).await.unwrap(), json!(100.0));
}

#[tokio::test]
async fn mix_chain() {
    let sync_then_async = Pipe::new(multiply_by(5.0)).then(async_multiply_by(5.0));
    assert_eq!(sync_then_async.run(args![4]).await.unwrap(), json!(100.0));

    let async_then_sync = Pipe::new(async_multiply_by(5.0)).then(multiply_by(5.0));
    let completion = async_then_sync.apply(4).unwrap();
    assert!(completion.is_pending(), "a later sync step must not make the call immediate");
    assert_eq!(completion.await.unwrap(), json!(100.0));
}

#[tokio::test]
async fn async_contagion_with_variadic_entry() {
    let async_add = Entry::future(|args| async move {
        Ok(json!(args.iter().filter_map(Value::as_i64).sum::<i64>()))
    });
    let to_n_list = |n: usize| Step::map(move |v| json!(vec![v; n]));

    let completion = Pipe::new(async_add).then(to_n_list(3)).call(args![1, 1]).unwrap();
    assert!(completion.is_pending());
    assert_eq!(completion.await.unwrap(), json!([2, 2, 2]));
}

#[tokio::test]
async fn reject_async_entry() {
    let pipe = Pipe::new(Step::new(|_, t| Ok(Outcome::deferred(async move { Ok(t.with(ERROR)) }))));
    assert_eq!(pipe.run(args![1]).await.unwrap(), json!(ERROR));
}

#[tokio::test]
async fn reject_async_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipe = Pipe::new(async_multiply_by(5.0))
        .then(Step::new(|_, t| Ok(Outcome::deferred(async move { Ok(t.with(ERROR)) }))))
        .then(counted(&calls));
    assert_eq!(pipe.run(args![1]).await.unwrap(), json!(ERROR));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sync_termination_after_async_boundary() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipe = Pipe::new(async_multiply_by(2.0)).then(reject()).then(counted(&calls));
    assert_eq!(pipe.run(args![3]).await.unwrap(), json!(ERROR));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn async_fault_rejects_the_result() {
    let pipe = Pipe::new(multiply_by(1.0)).then(Step::future(|_| async {
                                                 Err(PipeError::failed("remote failure"))
                                             }));
    let completion = pipe.apply(1).expect("no synchronous fault");
    let err = completion.await.unwrap_err();
    assert_eq!(err.index(), Some(1));
    assert_eq!(err.root().to_string(), "remote failure");
}

#[tokio::test]
async fn nested_async_fault_reports_the_outer_position_first() {
    let inner = Pipe::new(Step::future(|_| async { Err(PipeError::failed("late")) }));
    let outer = Pipe::new(multiply_by(1.0)).then(inner).then(multiply_by(2.0));
    let err = outer.run(args![1]).await.unwrap_err();
    assert_eq!(err.path(), vec![1, 0]);
}

#[tokio::test]
async fn pipes_can_be_invoked_concurrently() {
    let pipe = Pipe::new(async_multiply_by(2.0)).then(multiply_by(10.0));
    let handles: Vec<_> = (0..8).map(|i| {
                                    let pipe = pipe.clone();
                                    tokio::spawn(async move { pipe.run(args![i]).await })
                                })
                                .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.await.expect("task").expect("pipe");
        assert_eq!(out, json!(i as f64 * 20.0));
    }
}
