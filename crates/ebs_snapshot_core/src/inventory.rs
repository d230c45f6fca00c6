use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tags::TagSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDevice {
    pub device_name: Option<String>,
    /// Present only for provider-managed (EBS) volumes.
    pub volume_id: Option<String>,
}

impl BlockDevice {
    pub fn ebs(device_name: impl Into<String>, volume_id: impl Into<String>) -> Self {
        Self {
            device_name: Some(device_name.into()),
            volume_id: Some(volume_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    pub instance_id: String,
    pub tags: TagSet,
    pub block_devices: Vec<BlockDevice>,
}

impl Instance {
    pub fn ebs_volume_ids(&self) -> impl Iterator<Item = &str> {
        self.block_devices
            .iter()
            .filter_map(|device| device.volume_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub volume_id: String,
    pub start_time: DateTime<Utc>,
    pub description: Option<String>,
    pub tags: TagSet,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn snapshot_serializes_start_time_as_rfc3339() {
        let snapshot = Snapshot {
            snapshot_id: "snap-1".to_string(),
            volume_id: "vol-1".to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap(),
            description: None,
            tags: TagSet::from_iter([("Env", "prod")]),
        };

        let value = serde_json::to_value(&snapshot).expect("snapshot should serialize");

        assert_eq!(value["start_time"], "2026-02-14T12:00:00Z");
        assert_eq!(value["tags"]["Env"], "prod");
    }

    #[test]
    fn ebs_volume_ids_skip_non_ebs_mappings() {
        let instance = Instance {
            instance_id: "i-1".to_string(),
            tags: TagSet::new(),
            block_devices: vec![
                BlockDevice::ebs("/dev/xvda", "vol-root"),
                BlockDevice {
                    device_name: Some("/dev/sdb".to_string()),
                    volume_id: None,
                },
                BlockDevice::ebs("/dev/sdf", "vol-data"),
            ],
        };

        let ids: Vec<_> = instance.ebs_volume_ids().collect();
        assert_eq!(ids, vec!["vol-root", "vol-data"]);
    }
}
