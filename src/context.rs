//! Per-request attribute sink.
//!
//! On accepting a bearer token, the introspection gate attaches three named
//! attributes (scopes, subject, client identifier) to the request so
//! downstream handlers can make authorization decisions. The crate depends
//! only on this trait, not on any framework's context object; the hosting
//! framework implements it over whatever per-request storage it has.

use std::collections::{HashMap, HashSet};

use serde_json::{Value, json};

/// A place to put the three attributes of an accepted token, visible to
/// later request processing.
pub trait RequestContext {
    /// Record the set of scope tokens the presented token carries.
    fn set_scopes(&mut self, scopes: &HashSet<String>);

    /// Record the identifier of the user who delegated the authority the
    /// token represents.
    fn set_subject(&mut self, subject: &str);

    /// Record the identifier of the client issuing the request.
    fn set_client_id(&mut self, client_id: &str);
}

/// Map-backed [`RequestContext`] for hosting code without a framework
/// context, and for tests.
///
/// Attribute names match what downstream handlers conventionally read:
/// `scopes` (sorted array), `subject`, and `clientID`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapContext {
    values: HashMap<String, Value>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// All attributes attached so far.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
}

impl RequestContext for MapContext {
    fn set_scopes(&mut self, scopes: &HashSet<String>) {
        let mut sorted: Vec<&String> = scopes.iter().collect();
        sorted.sort();
        self.values.insert("scopes".to_string(), json!(sorted));
    }

    fn set_subject(&mut self, subject: &str) {
        self.values.insert("subject".to_string(), json!(subject));
    }

    fn set_client_id(&mut self, client_id: &str) {
        self.values.insert("clientID".to_string(), json!(client_id));
    }
}
