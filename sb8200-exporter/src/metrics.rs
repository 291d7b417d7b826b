// SB8200 Exporter - Prometheus metric families
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Prometheus encoding of collected observations.
//!
//! A fresh [`FamilyRegistry`] is built for every scrape: observations are
//! grouped by name into metric families (first-seen order) and encoded
//! with the Prometheus text format. Nothing is kept between scrapes, so a
//! channel that disappears from the page disappears from `/metrics` too.
//!
//! Counter families are exposed with the conventional `_total` suffix.

use crate::error::{ExporterError, Result};
use prometheus::proto::{self, MetricFamily, MetricType};
use prometheus::{Encoder, TextEncoder};
use sb8200::{MetricKind, Observation};
use std::collections::HashMap;

/// Help text for observations without documentation
pub const NO_DOCUMENTATION: &str = "No Documentation";

/// Exposed family name of an observation
pub fn family_name(observation: &Observation) -> String {
    match observation.kind {
        MetricKind::Counter if !observation.name.ends_with("_total") => {
            format!("{}_total", observation.name)
        }
        _ => observation.name.clone(),
    }
}

fn metric_type(kind: MetricKind) -> MetricType {
    match kind {
        MetricKind::Gauge => MetricType::GAUGE,
        MetricKind::Counter => MetricType::COUNTER,
    }
}

fn to_metric(observation: &Observation) -> proto::Metric {
    let mut metric = proto::Metric::default();
    for (key, value) in observation.labels.iter() {
        let mut pair = proto::LabelPair::default();
        pair.set_name(key.to_string());
        pair.set_value(value.to_string());
        metric.mut_label().push(pair);
    }

    match observation.kind {
        MetricKind::Gauge => {
            let mut gauge = proto::Gauge::default();
            gauge.set_value(observation.value);
            metric.set_gauge(gauge);
        }
        MetricKind::Counter => {
            let mut counter = proto::Counter::default();
            counter.set_value(observation.value);
            metric.set_counter(counter);
        }
    }
    metric
}

/// Per-scrape registry of metric families
#[derive(Debug, Default)]
pub struct FamilyRegistry {
    families: Vec<MetricFamily>,
    kinds: Vec<MetricKind>,
    index: HashMap<String, usize>,
}

impl FamilyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one observation under its family
    pub fn register(&mut self, observation: &Observation) -> Result<()> {
        let name = family_name(observation);

        let slot = match self.index.get(&name) {
            Some(&slot) => {
                if self.kinds[slot] != observation.kind {
                    return Err(ExporterError::KindMismatch { name });
                }
                slot
            }
            None => {
                let mut family = MetricFamily::default();
                family.set_name(name.clone());
                family.set_help(
                    observation
                        .documentation
                        .clone()
                        .unwrap_or_else(|| NO_DOCUMENTATION.to_string()),
                );
                family.set_field_type(metric_type(observation.kind));
                self.families.push(family);
                self.kinds.push(observation.kind);
                self.index.insert(name, self.families.len() - 1);
                self.families.len() - 1
            }
        };

        self.families[slot].mut_metric().push(to_metric(observation));
        Ok(())
    }

    /// Register every observation in order
    pub fn register_all<'a, I>(&mut self, observations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        for observation in observations {
            self.register(observation)?;
        }
        Ok(())
    }

    /// Registered families
    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Check whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Encode all families to Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Content type of the text exposition format
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_string()
}
