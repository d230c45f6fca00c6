use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::inventory::{Instance, Snapshot};
use crate::tags::{TagFilter, TagSet};

/// Maps each attached EBS volume to the tags of the instance it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeTagIndex {
    by_volume: HashMap<String, TagSet>,
}

impl VolumeTagIndex {
    /// A volume seen on more than one instance resolves to the last one.
    pub fn build(instances: &[Instance]) -> Self {
        let mut by_volume = HashMap::new();
        for instance in instances {
            for volume_id in instance.ebs_volume_ids() {
                by_volume.insert(volume_id.to_string(), instance.tags.clone());
            }
        }
        Self { by_volume }
    }

    pub fn tags_for(&self, volume_id: &str) -> Option<&TagSet> {
        self.by_volume.get(volume_id)
    }

    pub fn len(&self) -> usize {
        self.by_volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_volume.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReapDecision {
    Delete,
    WithinAgeThreshold,
    /// The owning instance is gone or no longer carries the tag.
    TagMismatch,
}

/// Snapshots that started strictly before the returned instant are old enough
/// to delete. A threshold too large to represent yields the earliest instant.
pub fn deletion_cutoff(now: DateTime<Utc>, age_threshold_seconds: u64) -> DateTime<Utc> {
    i64::try_from(age_threshold_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn reap_decision(
    snapshot: &Snapshot,
    cutoff: DateTime<Utc>,
    index: &VolumeTagIndex,
    filter: &TagFilter,
) -> ReapDecision {
    if snapshot.start_time >= cutoff {
        return ReapDecision::WithinAgeThreshold;
    }

    let owner_matches = index
        .tags_for(&snapshot.volume_id)
        .is_some_and(|tags| filter.matches(tags));
    if owner_matches {
        ReapDecision::Delete
    } else {
        ReapDecision::TagMismatch
    }
}
