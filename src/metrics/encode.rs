//! Prometheus text exposition of a batch of [`MetricPoint`]s.
//!
//! Every scrape builds a fresh [`prometheus::Registry`], so no sample outlives
//! the cycle that produced it and concurrent scrapes never share state.

use std::collections::{HashMap, HashSet};

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};

use super::{MetricKind, MetricPoint};

/// Content type of [`encode_text`] output.
pub const TEXT_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to build metric family `{name}`: {source}")]
    Family {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },
    #[error("counter `{name}` has invalid value {value}")]
    InvalidCounterValue { name: &'static str, value: f64 },
    #[error("failed to encode metrics: {0}")]
    Encode(#[source] prometheus::Error),
    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

impl Family {
    fn new(point: &MetricPoint, label_names: &[&str]) -> prometheus::Result<Self> {
        let opts = Opts::new(point.name, point.help);
        Ok(match point.kind {
            MetricKind::Gauge => Self::Gauge(GaugeVec::new(opts, label_names)?),
            MetricKind::Counter => Self::Counter(CounterVec::new(opts, label_names)?),
        })
    }

    fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        match self {
            Self::Gauge(vec) => registry.register(Box::new(vec.clone())),
            Self::Counter(vec) => registry.register(Box::new(vec.clone())),
        }
    }

    fn observe(&self, point: &MetricPoint) -> Result<()> {
        let values: Vec<&str> = point.labels.values().map(String::as_str).collect();
        let family_error = |source| Error::Family {
            name: point.name,
            source,
        };
        match self {
            Self::Gauge(vec) => vec
                .get_metric_with_label_values(&values)
                .map_err(family_error)?
                .set(point.value),
            Self::Counter(vec) => {
                if !point.value.is_finite() || point.value < 0.0 {
                    return Err(Error::InvalidCounterValue {
                        name: point.name,
                        value: point.value,
                    });
                }
                vec.get_metric_with_label_values(&values)
                    .map_err(family_error)?
                    .inc_by(point.value)
            }
        }
        Ok(())
    }
}

/// Encodes `points` in the Prometheus text format.
///
/// Points sharing a name form one family; their label names are taken from
/// the first point of that family. A point repeating the name and labels of an
/// earlier point is logged and dropped, since two containers whose names
/// normalize to the same value would otherwise add up into one counter.
pub fn encode_text(points: &[MetricPoint]) -> Result<String> {
    let registry = Registry::new();
    let mut families: HashMap<&'static str, Family> = HashMap::new();
    let mut seen = HashSet::with_capacity(points.len());

    for point in points {
        if !seen.insert((point.name, &point.labels)) {
            log::warn!(
                "dropping duplicate sample of `{}` with labels {:?}",
                point.name,
                point.labels
            );
            continue;
        }
        if !families.contains_key(point.name) {
            let label_names: Vec<&str> = point.labels.keys().map(String::as_str).collect();
            let family = Family::new(point, &label_names).map_err(|source| Error::Family {
                name: point.name,
                source,
            })?;
            family.register(&registry).map_err(|source| Error::Family {
                name: point.name,
                source,
            })?;
            families.insert(point.name, family);
        }
        if let Some(family) = families.get(point.name) {
            family.observe(point)?;
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .map_err(Error::Encode)?;
    String::from_utf8(buffer).map_err(Error::Utf8)
}
