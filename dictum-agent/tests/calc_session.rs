//! End-to-end session over a small arithmetic capability set.

use std::sync::Arc;

use dictum_agent::{
    FinishReason, MemorySink, RunController, ScriptedProvider, SessionBudget, SessionError,
};
use dictum_core::builtins::{Reasoning, Stop};
use dictum_core::{Capability, CapabilityCx, CapabilityError, Engine, Role, Value};

struct Add;
struct Subtract;
struct Multiply;
struct Power;

fn two_ints(positional: &[Value]) -> Result<(i64, i64), CapabilityError> {
    let a = positional[0]
        .as_i64()
        .ok_or_else(|| CapabilityError::new("a must be an integer"))?;
    let b = positional[1]
        .as_i64()
        .ok_or_else(|| CapabilityError::new("b must be an integer"))?;
    Ok((a, b))
}

impl Capability for Add {
    fn name(&self) -> &str {
        "Add"
    }
    fn description(&self) -> &str {
        "Use Add(a, b) to compute the sum of two integers."
    }
    fn example_args(&self) -> Vec<Value> {
        vec![Value::Int(2), Value::Int(2)]
    }
    fn invoke(
        &self,
        _cx: &mut CapabilityCx<'_>,
        positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        let (a, b) = two_ints(positional)?;
        Ok((a + b).to_string())
    }
}

impl Capability for Subtract {
    fn name(&self) -> &str {
        "Subtract"
    }
    fn description(&self) -> &str {
        "Use Subtract(a, b) to compute the difference of two integers."
    }
    fn example_args(&self) -> Vec<Value> {
        vec![Value::Int(5), Value::Int(3)]
    }
    fn invoke(
        &self,
        _cx: &mut CapabilityCx<'_>,
        positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        let (a, b) = two_ints(positional)?;
        Ok((a - b).to_string())
    }
}

impl Capability for Multiply {
    fn name(&self) -> &str {
        "Multiply"
    }
    fn description(&self) -> &str {
        "Use Multiply(a, b) to compute the product of two integers."
    }
    fn example_args(&self) -> Vec<Value> {
        vec![Value::Int(2), Value::Int(3)]
    }
    fn invoke(
        &self,
        _cx: &mut CapabilityCx<'_>,
        positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        let (a, b) = two_ints(positional)?;
        Ok((a * b).to_string())
    }
}

impl Capability for Power {
    fn name(&self) -> &str {
        "Power"
    }
    fn description(&self) -> &str {
        "Use Power(a, b) to raise a to the power of b."
    }
    fn example_args(&self) -> Vec<Value> {
        vec![Value::Int(2), Value::Int(3)]
    }
    fn invoke(
        &self,
        _cx: &mut CapabilityCx<'_>,
        positional: &[Value],
        _keyword: &[(String, Value)],
    ) -> Result<String, CapabilityError> {
        let base = positional[0]
            .as_f64()
            .ok_or_else(|| CapabilityError::new("a must be a number"))?;
        let exponent = positional[1]
            .as_f64()
            .ok_or_else(|| CapabilityError::new("b must be a number"))?;
        Ok(base.powf(exponent).to_string())
    }
}

fn calculator_engine() -> (Engine, String) {
    let mut engine = Engine::new();
    engine.register(Box::new(Reasoning));
    engine.register(Box::new(Stop));
    engine.register(Box::new(Add));
    engine.register(Box::new(Subtract));
    engine.register(Box::new(Multiply));
    engine.register(Box::new(Power));
    let help = engine.help();
    let system_prompt = format!(
        "Act as a calculator. You can use the following functions:\n\n{help}\n\nOnly output valid function calls."
    );
    (engine, system_prompt)
}

#[tokio::test]
async fn evaluates_an_expression_and_stops() {
    let (engine, system_prompt) = calculator_engine();
    let provider = Arc::new(ScriptedProvider::from_lines(
        &["Multiply(2, 3)", "Add(6, 4)", "Stop()"],
        25,
    ));
    let sink = Arc::new(MemorySink::new());
    let mut controller = RunController::new(engine, provider.clone(), system_prompt)
        .with_prompt("Evaluate (2*3+4)")
        .with_bootstrap(vec![
            "Reasoning(\"I will compute the product first, then the sum.\")".into(),
        ])
        .with_sink(sink.clone());

    let outcome = controller.run().await.expect("run");

    assert_eq!(outcome.finish_reason, FinishReason::Completed);
    assert_eq!(outcome.final_output, "10");
    assert_eq!(outcome.step_count, 2);
    assert_eq!(outcome.total_tokens, 75);
    assert_eq!(provider.calls(), 3);

    // system, bootstrap pair, goal, two step pairs; the stop command's own
    // pair is never appended.
    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 8);
    assert_eq!(transcript[0].role, Role::System);
    assert_eq!(
        transcript[1].content,
        "Reasoning(\"I will compute the product first, then the sum.\")"
    );
    assert_eq!(
        transcript[2].content,
        "Proceed to the next step towards the goal."
    );
    assert_eq!(transcript[3].content, "Evaluate (2*3+4)");
    assert_eq!(transcript[4].content, "Multiply(2, 3)");
    assert_eq!(transcript[5].content, "6");
    assert_eq!(transcript[6].content, "Add(6, 4)");
    assert_eq!(transcript[7].content, "10");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].session_id, outcome.session_id);
    assert_eq!(records[0].model, "scripted");
    assert_eq!(records[0].final_answer, "10");
    assert_eq!(records[0].transcript.len(), 8);
}

#[tokio::test]
async fn failed_tries_never_reach_the_persistent_transcript() {
    let (engine, system_prompt) = calculator_engine();
    // Two rejected attempts, then a valid command, then stop.
    let provider = Arc::new(ScriptedProvider::from_lines(
        &["Multiply(2)", "Divide(6, 3)", "Multiply(2, 3)", "Stop()"],
        10,
    ));
    let mut controller = RunController::new(engine, provider.clone(), system_prompt)
        .with_prompt("Evaluate (2*3)");

    let outcome = controller.run().await.expect("run");

    assert_eq!(outcome.finish_reason, FinishReason::Completed);
    assert_eq!(outcome.final_output, "6");
    assert_eq!(outcome.step_count, 1);
    assert_eq!(outcome.total_tokens, 40);

    // system, goal, one step pair: the rejected replies stayed in scratch.
    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[2].content, "Multiply(2, 3)");
    assert_eq!(transcript[3].content, "6");
}

#[tokio::test]
async fn a_zero_token_budget_aborts_without_provider_traffic() {
    let (engine, system_prompt) = calculator_engine();
    let provider = Arc::new(ScriptedProvider::from_lines(&["Add(1, 2)"], 10));
    let mut controller = RunController::new(engine, provider.clone(), system_prompt)
        .with_prompt("Evaluate (1+2)")
        .with_budget(SessionBudget {
            max_session_tokens: 0,
            ..SessionBudget::default()
        });

    let outcome = controller.run().await.expect("run");

    assert_eq!(outcome.finish_reason, FinishReason::Aborted);
    assert_eq!(outcome.total_tokens, 0);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn a_bootstrap_command_naming_an_unknown_function_is_fatal() {
    let (engine, system_prompt) = calculator_engine();
    let provider = Arc::new(ScriptedProvider::from_lines(&["Add(1, 2)"], 10));
    let mut controller = RunController::new(engine, provider.clone(), system_prompt)
        .with_prompt("Evaluate (1+2)")
        .with_bootstrap(vec!["Observe()".into()]);

    match controller.run().await {
        Err(SessionError::Bootstrap { command, .. }) => assert_eq!(command, "Observe()"),
        other => panic!("expected a bootstrap failure, got {other:?}"),
    }
    assert_eq!(provider.calls(), 0);
}
