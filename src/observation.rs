//! Metric observations
//!
//! This module defines the typed records handed to the metrics registry:
//! - Metric kinds (gauge, counter)
//! - Ordered label sets
//! - Observations and state records

use serde::Serialize;
use std::fmt;

/// Metric type of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Value may go up and down between scrapes
    #[default]
    Gauge,
    /// Value is expected to only grow
    Counter,
}

impl MetricKind {
    /// Prometheus type name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered label set with unique keys.
///
/// Inserting an existing key overwrites its value and keeps its position,
/// so iteration order is deterministic for a given sequence of inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    /// Create an empty label set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, overwriting any earlier value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Insert every label of `other`, overwriting on collision
    pub fn extend_from(&mut self, other: &Labels) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    /// Get a label value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Label keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs sorted by key, used to compare label sets regardless of order
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable();
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for (k, v) in iter {
            labels.insert(k, v);
        }
        labels
    }
}

/// One typed, labeled metric sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Gauge or counter
    pub kind: MetricKind,
    /// Fully prefixed metric name
    pub name: String,
    /// Help text, if any
    pub documentation: Option<String>,
    /// Sample value
    pub value: f64,
    /// Label set
    pub labels: Labels,
}

impl Observation {
    /// Create a gauge observation
    pub fn gauge(name: impl Into<String>, value: f64, labels: Labels) -> Self {
        Self {
            kind: MetricKind::Gauge,
            name: name.into(),
            documentation: None,
            value,
            labels,
        }
    }

    /// Create a counter observation
    pub fn counter(name: impl Into<String>, value: f64, labels: Labels) -> Self {
        Self {
            kind: MetricKind::Counter,
            name: name.into(),
            documentation: None,
            value,
            labels,
        }
    }

    /// Create a state record: an always-1 gauge carrying text in its labels
    pub fn state(name: impl Into<String>, labels: Labels) -> Self {
        Self::gauge(name, 1.0, labels)
    }

    /// Attach help text
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Identity used for duplicate detection: name plus key-sorted labels
    pub fn identity(&self) -> (String, Vec<(String, String)>) {
        (
            self.name.clone(),
            self.labels
                .sorted()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_insertion_order() {
        let mut labels = Labels::new();
        labels.insert("channel_id", "1");
        labels.insert("frequency", "549000000 Hz");
        labels.insert("channel_id", "2");

        let keys: Vec<_> = labels.keys().collect();
        assert_eq!(keys, vec!["channel_id", "frequency"]);
        assert_eq!(labels.get("channel_id"), Some("2"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_labels_extend_overwrites() {
        let mut state: Labels = [("lock_status", "Locked"), ("channel_id", "x")]
            .into_iter()
            .collect();
        let ids: Labels = [("channel_id", "7")].into_iter().collect();
        state.extend_from(&ids);
        assert_eq!(state.get("channel_id"), Some("7"));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_identity_ignores_label_order() {
        let a: Labels = [("a", "1"), ("b", "2")].into_iter().collect();
        let b: Labels = [("b", "2"), ("a", "1")].into_iter().collect();
        let oa = Observation::gauge("x", 1.0, a);
        let ob = Observation::gauge("x", 5.0, b);
        assert_eq!(oa.identity(), ob.identity());
    }

    #[test]
    fn test_state_record() {
        let obs = Observation::state("sb8200_state", Labels::new());
        assert_eq!(obs.kind, MetricKind::Gauge);
        assert_eq!(obs.value, 1.0);
        assert!(obs.documentation.is_none());
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(MetricKind::Gauge.as_str(), "gauge");
        assert_eq!(MetricKind::Counter.to_string(), "counter");
    }
}
