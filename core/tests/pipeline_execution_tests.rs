// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use stepflow::{ContextData, Control, Outcome, Pipeline};

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1", false, None), ("step2", false, None), ("step3", false, None)]);

  pipeline.on("step1", recording_handler("step1", " S1"));
  pipeline.on("step2", recording_handler("step2", " S2"));
  pipeline.on("step3", recording_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  let outcome = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, Outcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_phases_run_before_on_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false, None)]);

  // Registered out of order on purpose.
  pipeline.after("only", recording_handler("after", "A"));
  pipeline.on("only", recording_handler("on", "O"));
  pipeline.before("only", recording_handler("before", "B"));

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "BOA");
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_control_stop() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("stepA", false, None),
    ("stopStep", false, None),
    ("stepC", false, None),
  ]);

  pipeline.on("stepA", recording_handler("stepA", "A"));
  pipeline.on("stopStep", |ctx: ContextData<TestContext>| async move {
    ctx.write().steps_executed.push("stopStep".to_string());
    Ok::<_, TestError>(Control::Stop)
  });
  pipeline.on("stepC", recording_handler("stepC", "C"));

  let ctx = ContextData::new(TestContext::default());
  let outcome = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, Outcome::Stopped);
  let guard = ctx.read();
  assert_eq!(guard.message, "A");
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
#[serial]
async fn test_stop_in_before_phase_skips_on_handlers() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("guarded", false, None)]);
  pipeline.before("guarded", recording_handler("guard", "G"));
  pipeline.on("guarded", recording_handler("body", "B"));

  let ctx = ContextData::new(TestContext {
    should_stop_at: Some("guard".to_string()),
    ..Default::default()
  });
  let outcome = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, Outcome::Stopped);
  assert_eq!(ctx.read().message, "G");
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("good_step", false, None),
    ("bad_step", false, None),
    ("another_step", false, None),
  ]);

  pipeline.on("good_step", recording_handler("good_step", "Good"));
  pipeline.on("bad_step", failing_handler("bad_step", "I am a bad step!"));
  pipeline.on("another_step", recording_handler("another_step", "NeverRun"));

  let ctx = ContextData::new(TestContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  assert_eq!(err, TestError::Handler("I am a bad step!".to_string()));
  let guard = ctx.read();
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_skips_step_if_condition_met() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("step1", false, None),
    (
      "step_to_skip",
      false,
      Some(Arc::new(|ctx: &ContextData<TestContext>| ctx.read().counter > 0)),
    ),
    ("step3", false, None),
  ]);

  pipeline.on("step1", recording_handler("step1", " S1"));
  pipeline.on("step_to_skip", recording_handler("step_to_skip", " SKIPPED"));
  pipeline.on("step3", recording_handler("step3", " S3"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), Outcome::Completed);

  let guard = ctx.read();
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handlers_is_passed_over() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("first", false, None), ("notify", true, None), ("last", false, None)]);
  pipeline.on("first", recording_handler("first", "1"));
  pipeline.on("last", recording_handler("last", "2"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), Outcome::Completed);
  assert_eq!(ctx.read().message, "12");
}

#[tokio::test]
#[serial]
async fn test_insert_step_after_runs_in_new_position() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("c", false, None)]);
  pipeline.insert_step_after("a", "b", false, None).unwrap();
  pipeline.on("a", recording_handler("a", "a"));
  pipeline.on("b", recording_handler("b", "b"));
  pipeline.on("c", recording_handler("c", "c"));

  assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().message, "abc");
}

#[tokio::test]
#[serial]
async fn test_remove_step_drops_its_handlers() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("keep", false, None), ("drop", false, None)]);
  pipeline.on("keep", recording_handler("keep", "k"));
  pipeline.on("drop", recording_handler("drop", "d"));
  pipeline.remove_step("drop");

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().message, "k");
  assert!(!pipeline.has_step("drop"));
}
