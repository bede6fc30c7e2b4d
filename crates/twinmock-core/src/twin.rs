//! Device twin document with its history
//!
//! The twin holds whatever JSON document the harness last wrote. The document
//! a device is created with is only the starting value; every later update is
//! appended to the history, oldest first.

use crate::Document;
use serde::{Deserialize, Serialize};

/// Twin state of a single device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Twin {
    value: Document,
    history: Vec<Document>,
}

impl Twin {
    /// Create a twin holding `initial` with an empty history
    pub fn new(initial: Document) -> Self {
        Self {
            value: initial,
            history: Vec::new(),
        }
    }

    /// Current document
    pub fn value(&self) -> &Document {
        &self.value
    }

    /// Every document written since creation
    pub fn history(&self) -> &[Document] {
        &self.history
    }

    /// Replace the current document and record it in the history
    pub fn update(&mut self, value: Document) {
        self.history.push(value.clone());
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_twin_creation() {
        let twin = Twin::new(json!({"reported": {"fw": "1.0"}}));
        assert_eq!(twin.value(), &json!({"reported": {"fw": "1.0"}}));
        assert!(twin.history().is_empty());
    }

    #[test]
    fn test_update_appends_history() {
        let mut twin = Twin::new(json!({"v": 1}));
        twin.update(json!({"v": 2}));
        twin.update(json!(null));

        assert_eq!(twin.value(), &json!(null));
        assert_eq!(
            twin.history(),
            &[json!({"v": 2}), json!(null)]
        );
    }
}
