//! Values flowing in and out of a resolution.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "Human"),
            Role::Assistant => write!(f, "AI"),
        }
    }
}

/// One prior exchange in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A user question plus any earlier conversation. Owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub text: String,
    pub conversation_context: Vec<Turn>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conversation_context: Vec::new(),
        }
    }

    pub fn with_context(mut self, turns: Vec<Turn>) -> Self {
        self.conversation_context = turns;
        self
    }
}

/// One think/act/observe iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionStep {
    pub thought: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl ResolutionStep {
    /// A tool call and what it returned.
    pub fn acted(thought: String, action: String, action_input: String, observation: String) -> Self {
        Self {
            thought,
            action: Some(action),
            action_input: Some(action_input),
            observation: Some(observation),
        }
    }

    /// The concluding step of an answered resolution.
    pub fn concluded(thought: String) -> Self {
        Self {
            thought,
            action: None,
            action_input: None,
            observation: None,
        }
    }

    /// A step that produced only feedback: unparseable output or an unknown tool.
    pub fn observed(thought: String, observation: String) -> Self {
        Self {
            thought,
            action: None,
            action_input: None,
            observation: Some(observation),
        }
    }
}

/// How a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Answered,
    MaxIterations,
    Error,
    Cancelled,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Termination::Answered => "answered",
            Termination::MaxIterations => "iteration limit reached",
            Termination::Error => "error",
            Termination::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    pub final_answer: String,
    pub steps: Vec<ResolutionStep>,
    pub terminated: Termination,
}

impl ResolutionResult {
    /// Number of steps that invoked a tool.
    pub fn tool_calls(&self) -> usize {
        self.steps.iter().filter(|s| s.action.is_some()).count()
    }
}
