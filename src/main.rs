use std::time::Duration;

use boxed::{args, config, typed, value_object, Blueprint, BoxedError, Entry, Outcome, Pipe, Step};
use log::info;
use serde_json::{json, Value};

value_object! {
    #[derive(Debug, Clone)]
    pub struct Student {
        pub name: String as String,
        pub location: String as String,
        pub age: Option<u32> as Number = None::<u32>,
    }
}

value_object! {
    #[derive(Debug, Clone)]
    pub struct University {
        pub state: String as String,
        pub students: Vec<Student> as Array,
    }
}

fn multiply_by(factor: f64) -> Step {
    typed::map(move |x: f64| x * factor)
}

fn async_multiply_by(factor: f64) -> Step {
    typed::future(move |x: f64| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(x * factor)
    })
}

/// Pipes síncronos, asíncronos, con corto-circuito y anidados.
async fn run_pipes() -> Result<(), BoxedError> {
    let sum = Entry::map(|args| json!(args.iter().filter_map(Value::as_f64).sum::<f64>())).labeled("sum");
    let is_positive = typed::map(|x: f64| x > 0.0);

    let sync_pipe = Pipe::new(sum).then(is_positive);
    let out = sync_pipe.call(args![10, 20])?;
    info!("sum > 0 (sync, ready={}): {:?}", out.is_ready(), out.ready());

    let area = Pipe::new(Pipe::new(multiply_by(0.5))).then(multiply_by(5.0));
    info!("triangle area: {}", area.call_blocking(args![10])?);

    let mixed = Pipe::new(async_multiply_by(5.0)).then(multiply_by(5.0));
    let pending = mixed.apply(4)?;
    info!("mixed pipe pending={}", pending.is_pending());
    info!("mixed pipe result: {}", pending.await?);

    let guarded = Pipe::new(multiply_by(1.0)).then(Step::new(|v, terminate| {
                                                     if v.as_f64().unwrap_or(0.0) < 0.0 {
                                                         Ok(terminate.with(400))
                                                     } else {
                                                         Ok(Outcome::Immediate(v))
                                                     }
                                                 }))
                                                 .then(multiply_by(2.0));
    for input in [3, -3] {
        info!("guarded({input}) = {}", guarded.run(args![input]).await?);
    }
    info!("guarded labels: {:?}", guarded.labels());

    // invocaciones concurrentes del mismo pipe
    let runs = (1..=4).map(|i| mixed.run(args![i]));
    let results = futures::future::try_join_all(runs).await?;
    info!("concurrent mixed runs: {:?}", results);
    Ok(())
}

/// Builders directo, por etapas y forward.
fn run_builders() -> Result<(), BoxedError> {
    let students = Blueprint::<Student>::new();

    let mut builder = students.builder();
    builder.set("name", "nickbar01234")?
           .derive("location", |shape| {
               Value::from(if shape.get("name") == Some(&json!("nickbar01234")) { "Tufts" } else { "" })
           })?;
    info!("student: {:?}", builder.build()?);

    let mut staged = Blueprint::<University>::new().staged_builder(&["state", "students"])?;
    staged.set("state", "MA")?;
    info!("next stage: {:?}", staged.next_stage());
    staged.set("students", serde_json::to_value(vec![builder.build()?])?)?;
    info!("university: {:?}", staged.build()?);

    let mut forward = students.forward_builder();
    forward.from_partial(&json!({"name": "ada", "location": "London"}))?;
    info!("forward remaining: {:?}", forward.remaining());
    if let Err(err) = forward.set("name", "grace") {
        info!("second set rejected: {err}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    config::init_dotenv();
    env_logger::init();
    info!("trace_steps={}", config::current().trace_steps);

    run_pipes().await?;
    run_builders()?;
    Ok(())
}
