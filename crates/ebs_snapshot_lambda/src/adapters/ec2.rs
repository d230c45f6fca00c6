use crate::runtime::inventory::{Instance, Snapshot};
use crate::runtime::tags::TagSet;

/// The remote EC2 operations the handlers depend on.
pub trait Ec2Api {
    /// All instances across every reservation.
    fn describe_instances(&self) -> Result<Vec<Instance>, String>;

    /// Snapshots owned by the calling account.
    fn describe_owned_snapshots(&self) -> Result<Vec<Snapshot>, String>;

    /// Returns the provider-assigned snapshot id.
    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String>;

    fn create_tags(&self, resource_id: &str, tags: &TagSet) -> Result<(), String>;

    fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), String>;
}
