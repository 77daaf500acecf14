//! Append-only conversation and response logs owned by one session.

use serde::Serialize;
use serde_json::Value;

use crate::{Role, Turn};

/// The ordered turn history sent with every request.
///
/// Opens with the system turn and only ever grows; nothing outside this
/// crate can reorder or edit a turn.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub(crate) fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    pub(crate) fn set_system(&mut self, system_prompt: impl Into<String>) {
        self.turns[0] = Turn::system(system_prompt);
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        debug_assert!(turn.role != Role::System, "only the opening turn is a system turn");
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn system(&self) -> &Turn {
        &self.turns[0]
    }

    pub fn last(&self) -> &Turn {
        // Never empty: constructed with the system turn.
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true: the system turn is always present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Every raw model response, in arrival order. Kept for inspection only.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResponseLog {
    entries: Vec<Value>,
}

impl ResponseLog {
    pub(crate) fn record(&mut self, raw: Value) {
        self.entries.push(raw);
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Value> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_opens_with_system_turn() {
        let transcript = Transcript::new("be brief");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.system().role, Role::System);
        assert_eq!(transcript.system().content, "be brief");
        assert_eq!(transcript.last(), transcript.system());
    }

    #[test]
    fn transcript_appends_in_order() {
        let mut transcript = Transcript::new("sys");
        transcript.push(Turn::user("a"));
        transcript.push(Turn::function("f", "b"));
        transcript.push(Turn::assistant("c"));

        let roles: Vec<Role> = transcript.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Function, Role::Assistant]
        );
        assert_eq!(transcript.last().content, "c");
    }

    #[test]
    fn transcript_serializes_as_message_array() {
        let mut transcript = Transcript::new("sys");
        transcript.push(Turn::user("hi"));
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["role"], "user");
    }

    #[test]
    fn response_log_records_raw_values() {
        let mut log = ResponseLog::default();
        assert!(log.is_empty());
        log.record(serde_json::json!({"id": 1}));
        log.record(serde_json::json!({"id": 2}));
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(&serde_json::json!({"id": 2})));
    }
}
