//! Filtering and grouping of metadata records
//!
//! Records are grouped as `timestamp -> device -> stream type -> video name`.
//! Groups are collected unordered and sorted once, newest timestamp first,
//! when the aggregation is finished.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

use super::record::MetadataRecord;

/// Stream type -> video name
pub type StreamMap = BTreeMap<String, String>;

/// Device id -> streams recorded by that device
pub type DeviceMap = BTreeMap<String, StreamMap>;

/// Optional query filters, all of which must hold for a record to match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Inclusive lower bound on timestamp
    pub tstart: Option<i64>,
    /// Inclusive upper bound on timestamp
    pub tend: Option<i64>,
    /// Exact device id
    pub nest: Option<String>,
}

impl QueryFilter {
    /// Check whether a record passes every active filter
    pub fn matches(&self, record: &MetadataRecord) -> bool {
        if self.tstart.is_some_and(|t| record.timestamp < t) {
            return false;
        }
        if self.tend.is_some_and(|t| record.timestamp > t) {
            return false;
        }
        if let Some(nest) = &self.nest {
            if record.device_id != *nest {
                return false;
            }
        }
        true
    }
}

/// Collects records before the final sort
#[derive(Debug, Default)]
pub struct AggregationBuilder {
    groups: HashMap<i64, DeviceMap>,
}

impl AggregationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same
    /// (timestamp, device, stream type)
    pub fn insert(&mut self, record: MetadataRecord) {
        self.groups
            .entry(record.timestamp)
            .or_default()
            .entry(record.device_id)
            .or_default()
            .insert(record.stream_type, record.video_name);
    }

    /// Sort by timestamp, descending
    pub fn finish(self) -> Aggregation {
        let mut entries: Vec<_> = self.groups.into_iter().collect();
        entries.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        Aggregation { entries }
    }
}

/// Aggregated query result, newest timestamp first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    entries: Vec<(i64, DeviceMap)>,
}

impl Aggregation {
    /// Number of distinct timestamps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamps in result order
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|(ts, _)| *ts)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &DeviceMap)> + '_ {
        self.entries.iter().map(|(ts, devices)| (*ts, devices))
    }

    /// Look up the video name stored for a (timestamp, device, stream type)
    pub fn get(&self, timestamp: i64, device_id: &str, stream_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(ts, _)| *ts == timestamp)
            .and_then(|(_, devices)| devices.get(device_id))
            .and_then(|streams| streams.get(stream_type))
            .map(String::as_str)
    }

    /// Render as JSON with 4-space indentation
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (timestamp, devices) in &self.entries {
            map.serialize_entry(timestamp, devices)?;
        }
        map.end()
    }
}

/// Group every record passing `filter`
pub fn aggregate<I>(records: I, filter: &QueryFilter) -> Aggregation
where
    I: IntoIterator<Item = MetadataRecord>,
{
    let mut builder = AggregationBuilder::new();
    for record in records.into_iter().filter(|r| filter.matches(r)) {
        builder.insert(record);
    }
    builder.finish()
}
