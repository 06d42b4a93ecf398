//! State abstraction and the generic `BasicState` observation.

use std::{collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::identifiers::StateId;

/// An immutable observation of an episode.
///
/// A state's identifier is a pure function of its attribute map and terminal
/// flag; the reward is carried alongside but does not participate in the
/// identifier. Non-terminal states carry reward 0 by convention; only the
/// terminal state of an episode carries the realized return.
pub trait State {
    /// Canonical identifier for this observation.
    fn id(&self) -> StateId;

    /// Whether the episode has ended at this observation.
    fn is_terminal(&self) -> bool;

    /// The attribute map the identifier is rendered from.
    fn context(&self) -> &BTreeMap<String, String>;

    /// Realized reward. Zero unless the state is terminal.
    fn reward(&self) -> i64;
}

/// Shared handle to a state observation.
///
/// Episodes are single-threaded, so observations are reference-counted
/// rather than atomically shared; every outcome of an episode holds the same
/// terminal observation.
pub type SharedState = Rc<dyn State>;

impl std::fmt::Debug for dyn State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("dyn State").field("id", &self.id()).finish()
    }
}

/// Generic state backed by a string-to-string attribute map.
///
/// The identifier renders the attributes in ascending key order as
/// `[k1:v1 k2:v2 terminal:<true|false>]`, so insertion order never affects
/// it. An empty attribute map renders as `[terminal:false]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicState {
    pub context: BTreeMap<String, String>,
    pub terminal: bool,
    pub reward: i64,
}

impl BasicState {
    /// Create an empty, non-terminal state with reward 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, returning the state for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Wrap the state in a shared handle.
    pub fn into_shared(self) -> SharedState {
        Rc::new(self)
    }
}

impl State for BasicState {
    fn id(&self) -> StateId {
        let mut entries: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        entries.push(format!("terminal:{}", self.terminal));
        StateId::new(format!("[{}]", entries.join(" ")))
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    fn reward(&self) -> i64 {
        self.reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_sorts_attribute_keys() {
        let state = BasicState::new().with("b", "2").with("a", "1");
        assert_eq!(state.id(), "[a:1 b:2 terminal:false]");
    }

    #[test]
    fn identifier_is_insertion_order_independent() {
        let forward = BasicState::new().with("a", "1").with("b", "2").with("c", "3");
        let reverse = BasicState::new().with("c", "3").with("b", "2").with("a", "1");
        assert_eq!(forward.id(), reverse.id());
    }

    #[test]
    fn empty_context_renders_terminal_flag_only() {
        let mut state = BasicState::new();
        assert_eq!(state.id(), "[terminal:false]");

        state.terminal = true;
        assert_eq!(state.id(), "[terminal:true]");
    }

    #[test]
    fn terminal_flag_distinguishes_identifiers() {
        let open = BasicState::new().with("count", "4");
        let mut done = BasicState::new().with("count", "4");
        done.terminal = true;

        assert_ne!(open.id(), done.id());
        assert_eq!(done.id(), "[count:4 terminal:true]");
    }

    #[test]
    fn reward_does_not_affect_identifier() {
        let mut poor = BasicState::new().with("count", "4");
        let mut rich = BasicState::new().with("count", "4");
        poor.reward = 0;
        rich.reward = 100;
        assert_eq!(poor.id(), rich.id());
    }
}
