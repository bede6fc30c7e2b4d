//! Scripted direct-method responses and the per-method response queue
//!
//! A queue is walked strictly from the head. Each response carries a `count`
//! that decides what an invocation does to it:
//!
//! | `count` | on invocation |
//! |---------|---------------|
//! | `> 1`   | decremented, stays at the head |
//! | `== 1`  | removed after being returned |
//! | `<= 0`  | returned forever, never touched |

use crate::Document;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;

/// A response a test author queued for a direct method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedResponse {
    /// Remaining uses; zero, negative or `null` means unlimited
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: i64,

    /// Status reported back to the caller, omitted when not scripted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    /// Payload reported back to the caller
    #[serde(default)]
    pub payload: Document,
}

/// What an invocation does to the response at the head of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// More than one use left; the count drops by one
    Decrement,
    /// Last use; the response leaves the queue
    Once,
    /// Never consumed
    Unlimited,
}

impl ScriptedResponse {
    /// Response that is returned `count` times (unlimited when `count <= 0`)
    pub fn new(count: i64, status: i64, payload: impl Into<Document>) -> Self {
        Self {
            count,
            status: Some(status),
            payload: payload.into(),
        }
    }

    /// Response that never leaves the queue
    pub fn unlimited(status: i64, payload: impl Into<Document>) -> Self {
        Self::new(0, status, payload)
    }

    /// Response returned exactly once
    pub fn once(status: i64, payload: impl Into<Document>) -> Self {
        Self::new(1, status, payload)
    }

    pub fn consumption(&self) -> Consumption {
        match self.count {
            c if c > 1 => Consumption::Decrement,
            1 => Consumption::Once,
            _ => Consumption::Unlimited,
        }
    }
}

/// FIFO of scripted responses for one method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseQueue {
    responses: VecDeque<ScriptedResponse>,
}

impl ResponseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a response at the tail
    pub fn push(&mut self, response: ScriptedResponse) {
        self.responses.push_back(response);
    }

    /// Peek at the head without consuming it
    pub fn head(&self) -> Option<&ScriptedResponse> {
        self.responses.front()
    }

    /// Take one use of the head response.
    ///
    /// Returns the response as it was before the use was taken, so a
    /// decremented response still reports the status and payload it was
    /// scripted with.
    pub fn consume(&mut self) -> Option<ScriptedResponse> {
        let head = self.responses.front_mut()?;
        let served = head.clone();

        match head.consumption() {
            Consumption::Decrement => head.count -= 1,
            Consumption::Once => {
                self.responses.pop_front();
            }
            Consumption::Unlimited => {}
        }

        Some(served)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl FromIterator<ScriptedResponse> for ResponseQueue {
    fn from_iter<T: IntoIterator<Item = ScriptedResponse>>(iter: T) -> Self {
        Self {
            responses: iter.into_iter().collect(),
        }
    }
}

/// Accept `null` as unlimited and whole-valued floats such as `2.0`
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(count) = number.as_i64() {
        return Ok(count);
    }

    let float = number.as_f64().unwrap_or(f64::NAN);
    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
        Ok(float as i64)
    } else {
        Err(de::Error::invalid_value(
            Unexpected::Float(float),
            &"an integral count",
        ))
    }
}
