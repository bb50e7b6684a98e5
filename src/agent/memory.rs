//! Conversation memory owned by the caller of a resolution.

use super::types::{Role, Turn};

/// Stores turns of a conversation and renders them for a prompt.
pub trait ConversationMemory: Send + Sync {
    /// Record one turn.
    fn append_turn(&mut self, role: Role, text: &str);

    /// Render the stored turns as prompt context.
    fn render_context(&self) -> String;

    /// Stored turns, oldest first.
    fn turns(&self) -> Vec<Turn>;

    /// Forget everything.
    fn clear(&mut self);
}

/// Keeps the most recent `max_turns` turns.
#[derive(Debug, Clone)]
pub struct ConversationBuffer {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl ConversationBuffer {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn trim(&mut self) {
        if self.turns.len() > self.max_turns {
            let excess = self.turns.len() - self.max_turns;
            self.turns.drain(..excess);
        }
    }
}

impl ConversationMemory for ConversationBuffer {
    fn append_turn(&mut self, role: Role, text: &str) {
        self.turns.push(Turn {
            role,
            text: text.to_string(),
        });
        self.trim();
    }

    fn render_context(&self) -> String {
        render_turns(&self.turns)
    }

    fn turns(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Render turns as `Human: ...` / `AI: ...` lines.
pub fn render_turns(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_context() {
        let mut memory = ConversationBuffer::new(10);
        memory.append_turn(Role::User, "What's the weather in Oslo?");
        memory.append_turn(Role::Assistant, "Overcast, 4°C.");

        assert_eq!(
            memory.render_context(),
            "Human: What's the weather in Oslo?\nAI: Overcast, 4°C."
        );
    }

    #[test]
    fn test_keeps_most_recent_turns() {
        let mut memory = ConversationBuffer::new(2);
        memory.append_turn(Role::User, "one");
        memory.append_turn(Role::Assistant, "two");
        memory.append_turn(Role::User, "three");

        let turns = memory.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::assistant("two"));
        assert_eq!(turns[1], Turn::user("three"));
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationBuffer::new(4);
        memory.append_turn(Role::User, "hi");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.render_context(), "");
    }
}
