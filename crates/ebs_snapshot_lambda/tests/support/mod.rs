#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use ebs_snapshot_lambda::adapters::ec2::Ec2Api;
use ebs_snapshot_lambda::runtime::inventory::{BlockDevice, Instance, Snapshot};
use ebs_snapshot_lambda::runtime::tags::TagSet;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap()
}

pub fn instance(id: &str, tags: &[(&str, &str)], volumes: &[&str]) -> Instance {
    Instance {
        instance_id: id.to_string(),
        tags: tags.iter().copied().collect(),
        block_devices: volumes
            .iter()
            .enumerate()
            .map(|(index, volume)| BlockDevice::ebs(format!("/dev/xvd{index}"), *volume))
            .collect(),
    }
}

pub fn snapshot_aged(id: &str, volume_id: &str, age_seconds: i64) -> Snapshot {
    Snapshot {
        snapshot_id: id.to_string(),
        volume_id: volume_id.to_string(),
        start_time: fixed_now() - TimeDelta::seconds(age_seconds),
        description: None,
        tags: TagSet::new(),
    }
}

pub fn env_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[derive(Debug, Default)]
struct FleetState {
    instances: Vec<Instance>,
    snapshots: Vec<Snapshot>,
    next_snapshot: usize,
    remote_calls: usize,
    create_calls: Vec<String>,
    delete_calls: Vec<String>,
}

/// In-memory EC2 account: instances are static, snapshots are created,
/// tagged and deleted in place.
#[derive(Debug, Default)]
pub struct InMemoryFleet {
    state: Mutex<FleetState>,
    fail_create_for_volume: Option<String>,
    fail_delete_for_snapshot: Option<String>,
}

impl InMemoryFleet {
    pub fn new(instances: Vec<Instance>, snapshots: Vec<Snapshot>) -> Self {
        Self {
            state: Mutex::new(FleetState {
                instances,
                snapshots,
                ..FleetState::default()
            }),
            ..Self::default()
        }
    }

    pub fn failing_create_for(mut self, volume_id: &str) -> Self {
        self.fail_create_for_volume = Some(volume_id.to_string());
        self
    }

    pub fn failing_delete_for(mut self, snapshot_id: &str) -> Self {
        self.fail_delete_for_snapshot = Some(snapshot_id.to_string());
        self
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.state.lock().expect("poisoned mutex").snapshots.clone()
    }

    pub fn snapshot_ids(&self) -> Vec<String> {
        self.snapshots()
            .into_iter()
            .map(|snapshot| snapshot.snapshot_id)
            .collect()
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.state.lock().expect("poisoned mutex").create_calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.state.lock().expect("poisoned mutex").delete_calls.clone()
    }

    pub fn remote_calls(&self) -> usize {
        self.state.lock().expect("poisoned mutex").remote_calls
    }
}

impl Ec2Api for InMemoryFleet {
    fn describe_instances(&self) -> Result<Vec<Instance>, String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.remote_calls += 1;
        Ok(state.instances.clone())
    }

    fn describe_owned_snapshots(&self) -> Result<Vec<Snapshot>, String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.remote_calls += 1;
        Ok(state.snapshots.clone())
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.remote_calls += 1;
        state.create_calls.push(volume_id.to_string());
        if self.fail_create_for_volume.as_deref() == Some(volume_id) {
            return Err(format!("SnapshotLimitExceeded for {volume_id}"));
        }

        state.next_snapshot += 1;
        let snapshot_id = format!("snap-{:04}", state.next_snapshot);
        state.snapshots.push(Snapshot {
            snapshot_id: snapshot_id.clone(),
            volume_id: volume_id.to_string(),
            start_time: fixed_now(),
            description: Some(description.to_string()),
            tags: TagSet::new(),
        });
        Ok(snapshot_id)
    }

    fn create_tags(&self, resource_id: &str, tags: &TagSet) -> Result<(), String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.remote_calls += 1;
        let snapshot = state
            .snapshots
            .iter_mut()
            .find(|snapshot| snapshot.snapshot_id == resource_id)
            .ok_or_else(|| format!("InvalidSnapshot.NotFound: {resource_id}"))?;
        snapshot.tags.extend(tags.iter());
        Ok(())
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.remote_calls += 1;
        state.delete_calls.push(snapshot_id.to_string());
        if self.fail_delete_for_snapshot.as_deref() == Some(snapshot_id) {
            return Err(format!("InvalidSnapshot.InUse: {snapshot_id}"));
        }

        let before = state.snapshots.len();
        state
            .snapshots
            .retain(|snapshot| snapshot.snapshot_id != snapshot_id);
        if state.snapshots.len() == before {
            return Err(format!("InvalidSnapshot.NotFound: {snapshot_id}"));
        }
        Ok(())
    }
}
