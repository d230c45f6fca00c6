use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::adapters::ec2::Ec2Api;
use crate::handlers::{log_error, log_info, remote, HandlerError, HandlerResponse, RemoteOperation};
use crate::runtime::config::ReaperConfig;
use crate::runtime::retention::{deletion_cutoff, reap_decision, ReapDecision, VolumeTagIndex};

const COMPONENT: &str = "snapshot_reaper";
pub const REAPER_SUCCESS_BODY: &str = "Old snapshots deleted successfully.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSnapshot {
    pub snapshot_id: String,
    pub reason: ReapDecision,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReaperOutcome {
    pub deleted: Vec<String>,
    pub skipped: Vec<SkippedSnapshot>,
}

impl ReaperOutcome {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn response(&self) -> HandlerResponse {
        HandlerResponse::ok(REAPER_SUCCESS_BODY)
    }
}

/// Reads configuration through `lookup`, then deletes expired snapshots of
/// tagged instances relative to `now`.
pub fn handle_reaper_event(
    lookup: impl Fn(&str) -> Option<String>,
    now: DateTime<Utc>,
    ec2: &impl Ec2Api,
) -> Result<HandlerResponse, HandlerError> {
    let config = ReaperConfig::from_lookup(lookup).inspect_err(|error| {
        log_error(COMPONENT, "configuration_invalid", json!({ "error": error.message() }));
    })?;
    run_reaper(&config, now, ec2).map(|outcome| outcome.response())
}

pub fn run_reaper(
    config: &ReaperConfig,
    now: DateTime<Utc>,
    ec2: &impl Ec2Api,
) -> Result<ReaperOutcome, HandlerError> {
    let started_at = Instant::now();
    let cutoff = deletion_cutoff(now, config.age_threshold_seconds);
    log_info(
        COMPONENT,
        "snapshot_reaping_started",
        json!({
            "age_threshold_seconds": config.age_threshold_seconds,
            "cutoff": cutoff.to_rfc3339(),
            "tag_filter": config.tag_filter,
        }),
    );

    match reap_snapshots(config, cutoff, ec2) {
        Ok(outcome) => {
            log_info(
                COMPONENT,
                "snapshot_reaping_completed",
                json!({
                    "deleted_count": outcome.deleted_count(),
                    "skipped_count": outcome.skipped.len(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Ok(outcome)
        }
        Err(error) => {
            log_error(
                COMPONENT,
                "snapshot_reaping_failed",
                json!({
                    "duration_ms": started_at.elapsed().as_millis(),
                    "error": error.to_string(),
                }),
            );
            Err(error)
        }
    }
}

fn reap_snapshots(
    config: &ReaperConfig,
    cutoff: DateTime<Utc>,
    ec2: &impl Ec2Api,
) -> Result<ReaperOutcome, HandlerError> {
    let filter = &config.tag_filter;
    let snapshots = remote(
        RemoteOperation::DescribeSnapshots,
        ec2.describe_owned_snapshots(),
    )?;
    let instances = remote(RemoteOperation::DescribeInstances, ec2.describe_instances())?;
    let index = VolumeTagIndex::build(&instances);

    let mut outcome = ReaperOutcome::default();
    for snapshot in snapshots {
        let decision = reap_decision(&snapshot, cutoff, &index, filter);
        let details = json!({
            "snapshot_id": snapshot.snapshot_id.clone(),
            "volume_id": snapshot.volume_id.clone(),
            "start_time": snapshot.start_time.to_rfc3339(),
        });

        if decision == ReapDecision::Delete {
            log_info(COMPONENT, "snapshot_deleting", details);
            remote(
                RemoteOperation::DeleteSnapshot,
                ec2.delete_snapshot(&snapshot.snapshot_id),
            )?;
            outcome.deleted.push(snapshot.snapshot_id);
        } else {
            log_info(
                COMPONENT,
                "snapshot_skipped",
                json!({ "snapshot": details, "reason": decision }),
            );
            outcome.skipped.push(SkippedSnapshot {
                snapshot_id: snapshot.snapshot_id,
                reason: decision,
            });
        }
    }

    Ok(outcome)
}
