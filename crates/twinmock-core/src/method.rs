//! Direct-method records owned by a device
//!
//! A record is keyed by the method name plus an optional module name. A
//! record registered without a module never matches a lookup that names one,
//! and vice versa.

use crate::response::{ResponseQueue, ScriptedResponse};
use crate::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Exact-match key of a direct method
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodKey {
    pub method_name: String,
    pub module_name: Option<String>,
}

impl MethodKey {
    /// Key for a method addressed on the device itself
    pub fn device(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            module_name: None,
        }
    }

    /// Key for a method addressed on a module of the device
    pub fn module(module_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            module_name: Some(module_name.into()),
        }
    }

    pub fn new(method_name: impl Into<String>, module_name: Option<String>) -> Self {
        Self {
            method_name: method_name.into(),
            module_name,
        }
    }

    fn matches(&self, method_name: &str, module_name: Option<&str>) -> bool {
        self.method_name == method_name && self.module_name.as_deref() == module_name
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module_name {
            Some(module) => write!(f, "{module}/{}", self.method_name),
            None => write!(f, "{}", self.method_name),
        }
    }
}

/// One registered direct method: its response script and what it received
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRecord {
    key: MethodKey,
    responses: ResponseQueue,
    call_history: Vec<Document>,
}

impl MethodRecord {
    /// Fresh record with an empty queue and no recorded calls
    pub fn new(key: MethodKey) -> Self {
        Self {
            key,
            responses: ResponseQueue::new(),
            call_history: Vec::new(),
        }
    }

    pub fn key(&self) -> &MethodKey {
        &self.key
    }

    pub fn method_name(&self) -> &str {
        &self.key.method_name
    }

    pub fn module_name(&self) -> Option<&str> {
        self.key.module_name.as_deref()
    }

    pub fn responses(&self) -> &ResponseQueue {
        &self.responses
    }

    pub(crate) fn responses_mut(&mut self) -> &mut ResponseQueue {
        &mut self.responses
    }

    /// Payloads received by this method, oldest first
    pub fn call_history(&self) -> &[Document] {
        &self.call_history
    }

    pub(crate) fn record_call(&mut self, payload: Document) {
        self.call_history.push(payload);
    }
}

/// All direct methods of one device, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodRegistry {
    records: Vec<MethodRecord>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response` for the method, creating its record on first use.
    ///
    /// Returns the queue length after the append.
    pub fn register_response(&mut self, key: MethodKey, response: ScriptedResponse) -> usize {
        let index = match self.position(&key.method_name, key.module_name.as_deref()) {
            Some(index) => index,
            None => {
                tracing::debug!(method = %key, "creating direct method record");
                self.records.push(MethodRecord::new(key));
                self.records.len() - 1
            }
        };

        let queue = self.records[index].responses_mut();
        queue.push(response);
        queue.len()
    }

    /// Exact lookup on (method, module)
    pub fn find(&self, method_name: &str, module_name: Option<&str>) -> Option<&MethodRecord> {
        self.records
            .iter()
            .find(|r| r.key.matches(method_name, module_name))
    }

    pub fn find_mut(
        &mut self,
        method_name: &str,
        module_name: Option<&str>,
    ) -> Option<&mut MethodRecord> {
        self.records
            .iter_mut()
            .find(|r| r.key.matches(method_name, module_name))
    }

    /// Records whose module equals `module_filter`; `None` selects the
    /// module-less methods
    pub fn list<'a>(
        &'a self,
        module_filter: Option<&'a str>,
    ) -> impl Iterator<Item = &'a MethodRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.module_name() == module_filter)
    }

    /// Method name to call history for every record matching the filter
    pub fn call_history(&self, module_filter: Option<&str>) -> BTreeMap<String, Vec<Document>> {
        self.list(module_filter)
            .map(|r| (r.method_name().to_string(), r.call_history.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, method_name: &str, module_name: Option<&str>) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.key.matches(method_name, module_name))
    }
}
