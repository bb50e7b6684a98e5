//! The bounded think/act/observe loop.

use super::engine::{NextStep, ReasoningEngine, ThinkContext};
use super::types::{Query, ResolutionResult, ResolutionStep, Termination};
use crate::error::ScoutError;
use crate::tools::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Replaces an empty answer so an answered result always carries text.
pub const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I could not find an answer.";

const CANCELLED_ANSWER: &str = "Resolution cancelled.";

/// Drives a reasoning engine against a tool registry until it answers,
/// runs out of iterations, fails, or is stopped.
pub struct QueryResolver {
    engine: Arc<dyn ReasoningEngine>,
    tools: Arc<ToolRegistry>,
    max_iterations: usize,
    timeout: Option<Duration>,
}

enum LoopOutcome {
    Answered(String),
    Exhausted,
    Failed(ScoutError),
    Cancelled,
    TimedOut(Duration),
}

impl QueryResolver {
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        tools: Arc<ToolRegistry>,
        max_iterations: usize,
    ) -> Self {
        Self {
            engine,
            tools,
            max_iterations,
            timeout: None,
        }
    }

    /// Bound the whole resolution, engine and tool calls included.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Resolve a query. Never fails; failures are reported in the result.
    pub async fn resolve(&self, query: &Query) -> ResolutionResult {
        self.resolve_with_cancel(query, CancellationToken::new()).await
    }

    /// Resolve a query, stopping early when `cancel` fires.
    #[instrument(skip(self, query, cancel), fields(max_iterations = self.max_iterations))]
    pub async fn resolve_with_cancel(
        &self,
        query: &Query,
        cancel: CancellationToken,
    ) -> ResolutionResult {
        let mut steps = Vec::new();

        let outcome = {
            let run = self.run_loop(query, &mut steps);
            let deadline = async {
                match self.timeout {
                    Some(limit) => {
                        tokio::time::sleep(limit).await;
                        limit
                    }
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => LoopOutcome::Cancelled,
                limit = deadline => LoopOutcome::TimedOut(limit),
                outcome = run => outcome,
            }
        };

        let (final_answer, terminated) = match outcome {
            LoopOutcome::Answered(answer) => {
                let answer = if answer.trim().is_empty() {
                    EMPTY_ANSWER_FALLBACK.to_string()
                } else {
                    answer
                };
                (answer, Termination::Answered)
            }
            LoopOutcome::Exhausted => (
                format!(
                    "I could not reach a final answer within {} step(s).",
                    self.max_iterations
                ),
                Termination::MaxIterations,
            ),
            LoopOutcome::Failed(e) => {
                warn!("Resolution failed: {}", e);
                (format!("An error occurred: {}", e), Termination::Error)
            }
            LoopOutcome::TimedOut(limit) => {
                warn!("Resolution timed out after {:?}", limit);
                (
                    format!(
                        "An error occurred: resolution timed out after {:?}",
                        limit
                    ),
                    Termination::Error,
                )
            }
            LoopOutcome::Cancelled => {
                info!("Resolution cancelled after {} step(s)", steps.len());
                (CANCELLED_ANSWER.to_string(), Termination::Cancelled)
            }
        };

        info!(
            "Resolution finished: {} after {} step(s)",
            terminated,
            steps.len()
        );

        ResolutionResult {
            final_answer,
            steps,
            terminated,
        }
    }

    async fn run_loop(&self, query: &Query, steps: &mut Vec<ResolutionStep>) -> LoopOutcome {
        while steps.len() < self.max_iterations {
            debug!("Iteration {}", steps.len() + 1);

            let next = self
                .engine
                .think(ThinkContext {
                    query,
                    steps: steps.as_slice(),
                    tools: &self.tools,
                })
                .await;

            match next {
                Ok(NextStep::Finish {
                    thought,
                    final_answer,
                }) => {
                    steps.push(ResolutionStep::concluded(thought));
                    return LoopOutcome::Answered(final_answer);
                }
                Ok(NextStep::Act {
                    thought,
                    action,
                    action_input,
                }) => {
                    // Steps only ever name registered tools
                    let step = match self.tools.resolve(&action) {
                        Ok(_) => {
                            let observation = self.observe(&action, &action_input).await;
                            ResolutionStep::acted(thought, action, action_input, observation)
                        }
                        Err(e) => {
                            warn!("Engine chose an unknown tool: {}", action);
                            ResolutionStep::observed(
                                attempted_action(&thought, &action, &action_input),
                                e.to_string(),
                            )
                        }
                    };
                    steps.push(step);
                }
                Err(ScoutError::OutputParse { detail, output }) => {
                    warn!("Could not parse engine output: {}", detail);
                    steps.push(ResolutionStep::observed(
                        output,
                        format!("Invalid format: {}", detail),
                    ));
                }
                Err(e) => return LoopOutcome::Failed(e),
            }
        }

        LoopOutcome::Exhausted
    }

    /// Run a tool; any failure becomes the observation text.
    async fn observe(&self, action: &str, action_input: &str) -> String {
        info!("Calling tool: {} with input: {}", action, action_input);

        match self.tools.invoke(action, action_input).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool '{}' failed: {}", action, e);
                e.to_string()
            }
        }
    }
}

/// Keep an unregistered action in the thought so the engine sees what it tried.
fn attempted_action(thought: &str, action: &str, action_input: &str) -> String {
    let attempt = format!("Action: {}\nAction Input: {}", action, action_input);
    if thought.is_empty() {
        attempt
    } else {
        format!("{}\n{}", thought, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ToolError};
    use crate::tools::{FieldSpec, InputSchema, Tool, ToolInput};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed list of decisions, then repeats `fallback` if set.
    struct ScriptedEngine {
        script: Mutex<VecDeque<Result<NextStep>>>,
        fallback: Option<NextStep>,
        calls: AtomicUsize,
        seen_steps: Mutex<Vec<usize>>,
    }

    impl ScriptedEngine {
        fn new(script: Vec<Result<NextStep>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback: None,
                calls: AtomicUsize::new(0),
                seen_steps: Mutex::new(Vec::new()),
            })
        }

        fn repeating(step: NextStep) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Some(step),
                calls: AtomicUsize::new(0),
                seen_steps: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReasoningEngine for ScriptedEngine {
        async fn think(&self, ctx: ThinkContext<'_>) -> Result<NextStep> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_steps.lock().unwrap().push(ctx.steps.len());
            let next = self.script.lock().unwrap().pop_front();
            match (next, &self.fallback) {
                (Some(step), _) => step,
                (None, Some(step)) => Ok(step.clone()),
                (None, None) => Err(ScoutError::Reasoning("script exhausted".to_string())),
            }
        }
    }

    /// Never answers within a test's lifetime.
    struct StallingEngine;

    #[async_trait]
    impl ReasoningEngine for StallingEngine {
        async fn think(&self, _ctx: ThinkContext<'_>) -> Result<NextStep> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(finish("too late"))
        }
    }

    struct EchoTool {
        schema: InputSchema,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                schema: InputSchema::new(vec![FieldSpec::text("text", "Text to echo").required()]),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the input."
        }
        fn input_schema(&self) -> &InputSchema {
            &self.schema
        }
        async fn invoke(&self, input: ToolInput) -> std::result::Result<String, ToolError> {
            Ok(format!("echo: {}", input.require_text("text")?))
        }
    }

    struct BrokenTool {
        schema: InputSchema,
    }

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always fails."
        }
        fn input_schema(&self) -> &InputSchema {
            &self.schema
        }
        async fn invoke(&self, _input: ToolInput) -> std::result::Result<String, ToolError> {
            Err(ToolError::Execution("upstream unavailable".to_string()))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool::new()).unwrap();
        registry
            .register(BrokenTool {
                schema: InputSchema::empty(),
            })
            .unwrap();
        Arc::new(registry)
    }

    fn act(action: &str, input: &str) -> NextStep {
        NextStep::Act {
            thought: format!("I should use {}", action),
            action: action.to_string(),
            action_input: input.to_string(),
        }
    }

    fn finish(answer: &str) -> NextStep {
        NextStep::Finish {
            thought: "I now know the final answer".to_string(),
            final_answer: answer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let engine = ScriptedEngine::new(vec![Ok(finish("Paris"))]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 5);

        let result = resolver.resolve(&Query::new("Capital of France?")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.final_answer, "Paris");
        assert_eq!(result.steps.len(), 1);
        assert!(result.steps[0].action.is_none());
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let engine = ScriptedEngine::new(vec![Ok(act("echo", "hello")), Ok(finish("done"))]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 5);

        let result = resolver.resolve(&Query::new("say hello")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].action.as_deref(), Some("echo"));
        assert_eq!(result.steps[0].action_input.as_deref(), Some("hello"));
        assert_eq!(result.steps[0].observation.as_deref(), Some("echo: hello"));
        assert_eq!(*engine.seen_steps.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_observed() {
        let engine = ScriptedEngine::new(vec![Ok(act("teleport", "mars")), Ok(finish("ok"))]);
        let resolver = QueryResolver::new(engine, registry(), 5);

        let result = resolver.resolve(&Query::new("go")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.steps.len(), 2);
        assert!(result.steps[0].action.is_none());
        assert_eq!(
            result.steps[0].thought,
            "I should use teleport\nAction: teleport\nAction Input: mars"
        );
        assert_eq!(
            result.steps[0].observation.as_deref(),
            Some("teleport is not a valid tool, try one of [echo, broken].")
        );
    }

    #[tokio::test]
    async fn test_tool_errors_become_observations() {
        let engine = ScriptedEngine::new(vec![
            Ok(act("broken", "")),
            Ok(act("echo", "{}")),
            Ok(finish("recovered")),
        ]);
        let resolver = QueryResolver::new(engine, registry(), 5);

        let result = resolver.resolve(&Query::new("try things")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.final_answer, "recovered");
        assert_eq!(result.steps[0].observation.as_deref(), Some("upstream unavailable"));
        assert!(result.steps[1]
            .observation
            .as_deref()
            .unwrap()
            .starts_with("Invalid tool input:"));
    }

    #[tokio::test]
    async fn test_zero_iterations_never_thinks() {
        let engine = ScriptedEngine::new(vec![Ok(finish("unused"))]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 0);

        let result = resolver.resolve(&Query::new("anything")).await;

        assert_eq!(result.terminated, Termination::MaxIterations);
        assert!(result.steps.is_empty());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_iteration_limit() {
        let engine = ScriptedEngine::repeating(act("echo", "again"));
        let resolver = QueryResolver::new(engine.clone(), registry(), 3);

        let result = resolver.resolve(&Query::new("loop forever")).await;

        assert_eq!(result.terminated, Termination::MaxIterations);
        assert_eq!(result.steps.len(), 3);
        assert_eq!(engine.calls(), 3);
        assert_eq!(
            result.final_answer,
            "I could not reach a final answer within 3 step(s)."
        );
    }

    #[tokio::test]
    async fn test_engine_error_keeps_steps() {
        let engine = ScriptedEngine::new(vec![
            Ok(act("echo", "first")),
            Err(ScoutError::OpenAI("quota exceeded".to_string())),
        ]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 5);

        let result = resolver.resolve(&Query::new("q")).await;

        assert_eq!(result.terminated, Termination::Error);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.final_answer, "An error occurred: LLM API error: quota exceeded");
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_engine_failure_on_first_call() {
        let engine = ScriptedEngine::new(vec![Err(ScoutError::OpenAI(
            "operation timed out".to_string(),
        ))]);
        let resolver = QueryResolver::new(engine, registry(), 5);

        let result = resolver.resolve(&Query::new("q")).await;

        assert_eq!(result.terminated, Termination::Error);
        assert!(result.steps.is_empty());
        assert!(result.final_answer.starts_with("An error occurred: "));
        assert!(result.final_answer.contains("operation timed out"));
    }

    #[tokio::test]
    async fn test_parse_errors_are_recoverable() {
        let engine = ScriptedEngine::new(vec![
            Err(ScoutError::OutputParse {
                detail: "Missing 'Action:' after 'Thought:'".to_string(),
                output: "I am confused".to_string(),
            }),
            Ok(finish("fine")),
        ]);
        let resolver = QueryResolver::new(engine, registry(), 5);

        let result = resolver.resolve(&Query::new("q")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].thought, "I am confused");
        assert_eq!(
            result.steps[0].observation.as_deref(),
            Some("Invalid format: Missing 'Action:' after 'Thought:'")
        );
    }

    #[tokio::test]
    async fn test_empty_answer_uses_fallback() {
        let engine = ScriptedEngine::new(vec![Ok(finish("   "))]);
        let resolver = QueryResolver::new(engine, registry(), 5);

        let result = resolver.resolve(&Query::new("")).await;

        assert_eq!(result.terminated, Termination::Answered);
        assert_eq!(result.final_answer, EMPTY_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_empty_query_still_thinks() {
        let engine = ScriptedEngine::new(vec![Ok(finish("Ask me something."))]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 2);

        let result = resolver.resolve(&Query::new("")).await;

        assert_eq!(engine.calls(), 1);
        assert_eq!(result.final_answer, "Ask me something.");
    }

    #[tokio::test]
    async fn test_timeout() {
        let resolver = QueryResolver::new(Arc::new(StallingEngine), registry(), 5)
            .with_timeout(Some(Duration::from_millis(50)));

        let result = resolver.resolve(&Query::new("slow")).await;

        assert_eq!(result.terminated, Termination::Error);
        assert_eq!(
            result.final_answer,
            "An error occurred: resolution timed out after 50ms"
        );
    }

    #[tokio::test]
    async fn test_cancellation() {
        let resolver = QueryResolver::new(Arc::new(StallingEngine), registry(), 5);
        let token = CancellationToken::new();

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = resolver.resolve_with_cancel(&Query::new("slow"), token).await;

        assert_eq!(result.terminated, Termination::Cancelled);
        assert_eq!(result.final_answer, "Resolution cancelled.");
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_token() {
        let engine = ScriptedEngine::new(vec![Ok(finish("unused"))]);
        let resolver = QueryResolver::new(engine.clone(), registry(), 5);
        let token = CancellationToken::new();
        token.cancel();

        let result = resolver.resolve_with_cancel(&Query::new("q"), token).await;

        assert_eq!(result.terminated, Termination::Cancelled);
        assert_eq!(engine.calls(), 0);
    }
}
