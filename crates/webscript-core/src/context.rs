/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Request parameters visible to executing documents.

use std::collections::{BTreeMap, HashMap};

/// The request-parameter mapping a document runs against.
///
/// Owned by the caller and borrowed for the duration of one execution.
/// Parameters are kept in key order so iteration from document code is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    params: BTreeMap<String, String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a `KEY=VALUE` assignment. The value may itself contain `=`;
    /// an empty key is rejected.
    pub fn parse_assignment(assignment: &str) -> Option<(String, String)> {
        let (key, value) = assignment.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }

    pub(crate) fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExecutionContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for ExecutionContext {
    fn from(params: HashMap<String, String>) -> Self {
        params.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for ExecutionContext {
    fn from(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }
}
