use std::future::Future;

use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Tag;
use chrono::{DateTime, Utc};

use crate::adapters::ec2::Ec2Api;
use crate::runtime::inventory::{BlockDevice, Instance, Snapshot};
use crate::runtime::tags::TagSet;

/// `Ec2Api` backed by the AWS SDK.
///
/// Calls block the current worker thread, so this must run inside a
/// multi-threaded tokio runtime.
#[derive(Clone)]
pub struct AwsEc2Client {
    client: aws_sdk_ec2::Client,
}

impl AwsEc2Client {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }

    pub async fn from_default_config() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_ec2::Client::new(&aws_config))
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

impl Ec2Api for AwsEc2Client {
    fn describe_instances(&self) -> Result<Vec<Instance>, String> {
        let client = self.client.clone();
        let output = block_on(async move { client.describe_instances().send().await }).map_err(
            |error| format!("failed to describe instances: {}", DisplayErrorContext(&error)),
        )?;

        output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .map(instance_from_sdk)
            .collect()
    }

    fn describe_owned_snapshots(&self) -> Result<Vec<Snapshot>, String> {
        let client = self.client.clone();
        let output = block_on(async move {
            client.describe_snapshots().owner_ids("self").send().await
        })
        .map_err(|error| format!("failed to describe snapshots: {}", DisplayErrorContext(&error)))?;

        output.snapshots().iter().map(snapshot_from_sdk).collect()
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String> {
        let client = self.client.clone();
        let volume_id = volume_id.to_string();
        let description = description.to_string();
        let output = block_on(async move {
            client
                .create_snapshot()
                .volume_id(volume_id)
                .description(description)
                .send()
                .await
        })
        .map_err(|error| format!("failed to create snapshot: {}", DisplayErrorContext(&error)))?;

        output
            .snapshot_id()
            .map(str::to_string)
            .ok_or_else(|| "create snapshot response did not include a snapshot id".to_string())
    }

    fn create_tags(&self, resource_id: &str, tags: &TagSet) -> Result<(), String> {
        let client = self.client.clone();
        let resource_id = resource_id.to_string();
        let sdk_tags: Vec<Tag> = tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect();

        block_on(async move {
            client
                .create_tags()
                .resources(resource_id)
                .set_tags(Some(sdk_tags))
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| format!("failed to create tags: {}", DisplayErrorContext(&error)))
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), String> {
        let client = self.client.clone();
        let snapshot_id = snapshot_id.to_string();

        block_on(async move {
            client
                .delete_snapshot()
                .snapshot_id(snapshot_id)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| format!("failed to delete snapshot: {}", DisplayErrorContext(&error)))
    }
}

fn tags_from_sdk(tags: &[Tag]) -> TagSet {
    tags.iter()
        .filter_map(|tag| Some((tag.key()?, tag.value().unwrap_or_default())))
        .collect()
}

fn instance_from_sdk(instance: &aws_sdk_ec2::types::Instance) -> Result<Instance, String> {
    let instance_id = instance
        .instance_id()
        .ok_or_else(|| "instance in describe response is missing an instance id".to_string())?;

    let block_devices = instance
        .block_device_mappings()
        .iter()
        .map(|mapping| BlockDevice {
            device_name: mapping.device_name().map(str::to_string),
            volume_id: mapping
                .ebs()
                .and_then(|ebs| ebs.volume_id())
                .map(str::to_string),
        })
        .collect();

    Ok(Instance {
        instance_id: instance_id.to_string(),
        tags: tags_from_sdk(instance.tags()),
        block_devices,
    })
}

fn snapshot_from_sdk(snapshot: &aws_sdk_ec2::types::Snapshot) -> Result<Snapshot, String> {
    let snapshot_id = snapshot
        .snapshot_id()
        .ok_or_else(|| "snapshot in describe response is missing a snapshot id".to_string())?;
    let volume_id = snapshot
        .volume_id()
        .ok_or_else(|| format!("snapshot {snapshot_id} is missing a volume id"))?;
    let start_time = snapshot
        .start_time()
        .and_then(|time| DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos()))
        .ok_or_else(|| format!("snapshot {snapshot_id} is missing a valid start time"))?;

    Ok(Snapshot {
        snapshot_id: snapshot_id.to_string(),
        volume_id: volume_id.to_string(),
        start_time,
        description: snapshot.description().map(str::to_string),
        tags: tags_from_sdk(snapshot.tags()),
    })
}
