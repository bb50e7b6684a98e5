//! Reasoning engine that prompts a chat model in the ReAct text format.

use super::engine::{NextStep, ReasoningEngine, ThinkContext};
use super::memory::render_turns;
use super::types::ResolutionStep;
use crate::config::{LlmSettings, Prompts};
use crate::error::{Result, ScoutError};
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, instrument};

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const STOP_SEQUENCE: &str = "\nObservation:";

/// Splits model output into an action or a final answer.
pub struct ReactOutputParser {
    action_regex: Regex,
}

impl Default for ReactOutputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactOutputParser {
    pub fn new() -> Self {
        let action_regex =
            Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
                .expect("Invalid regex");

        Self { action_regex }
    }

    pub fn parse(&self, text: &str) -> Result<NextStep> {
        let includes_answer = text.contains(FINAL_ANSWER_MARKER);

        if let Some(caps) = self.action_regex.captures(text) {
            if includes_answer {
                return Err(parse_error(
                    "Parsing LLM output produced both a final answer and a parse-able action",
                    text,
                ));
            }

            let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let action = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let action_input = caps
                .get(2)
                .map(|m| m.as_str().trim().trim_matches('"'))
                .unwrap_or_default();

            return Ok(NextStep::Act {
                thought: text[..whole].trim().to_string(),
                action: action.to_string(),
                action_input: action_input.to_string(),
            });
        }

        if let Some(idx) = text.rfind(FINAL_ANSWER_MARKER) {
            return Ok(NextStep::Finish {
                thought: text[..idx].trim().to_string(),
                final_answer: text[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string(),
            });
        }

        let detail = if !text.contains("Action:") {
            "Missing 'Action:' after 'Thought:'"
        } else if !text.contains("Action Input:") {
            "Missing 'Action Input:' after 'Action:'"
        } else {
            "Could not parse LLM output"
        };
        Err(parse_error(detail, text))
    }
}

fn parse_error(detail: &str, output: &str) -> ScoutError {
    ScoutError::OutputParse {
        detail: detail.to_string(),
        output: output.trim().to_string(),
    }
}

/// ReAct engine backed by any OpenAI-compatible chat completion endpoint.
pub struct ReactEngine {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
    parser: ReactOutputParser,
}

impl ReactEngine {
    pub fn new(client: Client<OpenAIConfig>, settings: &LlmSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompts: Prompts::default(),
            parser: ReactOutputParser::new(),
        }
    }

    /// Use custom prompt templates.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn render_prompt(&self, ctx: &ThinkContext<'_>) -> String {
        let chat_history = if ctx.query.conversation_context.is_empty() {
            "(none)".to_string()
        } else {
            render_turns(&ctx.query.conversation_context)
        };

        let mut vars = HashMap::new();
        vars.insert("tools".to_string(), ctx.tools.describe());
        vars.insert("tool_names".to_string(), ctx.tools.tool_names());
        vars.insert("chat_history".to_string(), chat_history);
        vars.insert("input".to_string(), ctx.query.text.clone());
        vars.insert("agent_scratchpad".to_string(), scratchpad(ctx.steps));

        self.prompts
            .render_with_custom(&self.prompts.react.template, &vars)
    }
}

/// Replay earlier steps in the format the model produced them.
fn scratchpad(steps: &[ResolutionStep]) -> String {
    let mut out = String::new();
    for step in steps {
        out.push(' ');
        out.push_str(&step.thought);
        if let (Some(action), Some(input)) = (&step.action, &step.action_input) {
            if !step.thought.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("Action: {}\nAction Input: {}", action, input));
        }
        if let Some(observation) = &step.observation {
            out.push_str(&format!("\nObservation: {}\nThought: ", observation));
        }
    }
    out
}

#[async_trait]
impl ReasoningEngine for ReactEngine {
    #[instrument(skip(self, ctx), fields(model = %self.model, step = ctx.steps.len() + 1))]
    async fn think(&self, ctx: ThinkContext<'_>) -> Result<NextStep> {
        let prompt = self.render_prompt(&ctx);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .stop(vec![STOP_SEQUENCE.to_string()])
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| ScoutError::Reasoning(e.to_string()))?
                .into()])
            .build()
            .map_err(|e| ScoutError::Reasoning(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ScoutError::OpenAI(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ScoutError::Reasoning("No response from model".to_string()))?;

        debug!("Model output: {}", text);
        self.parser.parse(&text)
    }
}
