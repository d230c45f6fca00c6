use serde::Serialize;

use crate::inventory::Instance;
use crate::tags::{TagFilter, TagSet};

/// A volume that should be snapshotted, with the instance it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeTarget {
    pub volume_id: String,
    pub instance_id: String,
    pub instance_tags: TagSet,
}

pub fn select_volume_targets(instances: &[Instance], filter: &TagFilter) -> Vec<VolumeTarget> {
    instances
        .iter()
        .filter(|instance| filter.matches(&instance.tags))
        .flat_map(|instance| {
            instance.ebs_volume_ids().map(move |volume_id| VolumeTarget {
                volume_id: volume_id.to_string(),
                instance_id: instance.instance_id.clone(),
                instance_tags: instance.tags.clone(),
            })
        })
        .collect()
}

pub fn snapshot_description(target: &VolumeTarget, filter: &TagFilter) -> String {
    format!(
        "Snapshot of volume {} from instance {} with tag {}: {}",
        target.volume_id, target.instance_id, filter.key, filter.value
    )
}

/// Tags applied to a freshly created snapshot.
///
/// Instance tags are applied after the synthetic `Name` and filter tags, so an
/// instance tag with either key replaces the synthetic value.
pub fn snapshot_tags(target: &VolumeTarget, filter: &TagFilter) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert("Name", format!("Snapshot of {}", target.volume_id));
    tags.insert(filter.key.clone(), filter.value.clone());
    tags.extend(target.instance_tags.iter());
    tags
}

#[cfg(test)]
mod tests {
    use crate::inventory::BlockDevice;

    use super::*;

    fn instance(id: &str, tags: &[(&str, &str)], volumes: &[&str]) -> Instance {
        Instance {
            instance_id: id.to_string(),
            tags: tags.iter().copied().collect(),
            block_devices: volumes
                .iter()
                .enumerate()
                .map(|(index, volume)| BlockDevice::ebs(format!("/dev/sd{index}"), *volume))
                .collect(),
        }
    }

    #[test]
    fn selects_only_volumes_of_matching_instances() {
        let instances = vec![
            instance("i1", &[("Env", "prod")], &["v1", "v2"]),
            instance("i2", &[("Env", "dev")], &["v3"]),
        ];

        let targets = select_volume_targets(&instances, &TagFilter::new("Env", "prod"));

        let volumes: Vec<_> = targets.iter().map(|t| t.volume_id.as_str()).collect();
        assert_eq!(volumes, vec!["v1", "v2"]);
        assert!(targets.iter().all(|t| t.instance_id == "i1"));
    }

    #[test]
    fn description_embeds_volume_instance_and_filter() {
        let target = VolumeTarget {
            volume_id: "vol-1".to_string(),
            instance_id: "i-1".to_string(),
            instance_tags: TagSet::new(),
        };

        assert_eq!(
            snapshot_description(&target, &TagFilter::new("Backup", "daily")),
            "Snapshot of volume vol-1 from instance i-1 with tag Backup: daily"
        );
    }

    #[test]
    fn instance_name_tag_overrides_synthetic_name() {
        let target = VolumeTarget {
            volume_id: "vol-1".to_string(),
            instance_id: "i-1".to_string(),
            instance_tags: TagSet::from_iter([("Env", "prod"), ("Name", "web-1")]),
        };

        let tags = snapshot_tags(&target, &TagFilter::new("Env", "prod"));

        assert_eq!(tags.get("Name"), Some("web-1"));
        assert_eq!(tags.get("Env"), Some("prod"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn synthetic_tags_precede_copied_instance_tags() {
        let target = VolumeTarget {
            volume_id: "vol-9".to_string(),
            instance_id: "i-9".to_string(),
            instance_tags: TagSet::from_iter([("Team", "storage"), ("Env", "prod")]),
        };

        let tags = snapshot_tags(&target, &TagFilter::new("Env", "prod"));

        let collected: Vec<_> = tags.iter().collect();
        assert_eq!(
            collected,
            vec![
                ("Name", "Snapshot of vol-9"),
                ("Env", "prod"),
                ("Team", "storage"),
            ]
        );
    }
}
