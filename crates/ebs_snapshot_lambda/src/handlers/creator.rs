use std::time::Instant;

use serde::Serialize;
use serde_json::json;

use crate::adapters::ec2::Ec2Api;
use crate::handlers::{log_error, log_info, remote, HandlerError, HandlerResponse, RemoteOperation};
use crate::runtime::config::CreatorConfig;
use crate::runtime::selection::{select_volume_targets, snapshot_description, snapshot_tags};

const COMPONENT: &str = "snapshot_creator";
pub const CREATOR_SUCCESS_BODY: &str = "Snapshots created successfully.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedSnapshot {
    pub snapshot_id: String,
    pub volume_id: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatorOutcome {
    pub created: Vec<CreatedSnapshot>,
}

impl CreatorOutcome {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn response(&self) -> HandlerResponse {
        HandlerResponse::ok(CREATOR_SUCCESS_BODY)
    }
}

/// Reads configuration through `lookup`, then snapshots every EBS volume of
/// the matching instances.
pub fn handle_creator_event(
    lookup: impl Fn(&str) -> Option<String>,
    ec2: &impl Ec2Api,
) -> Result<HandlerResponse, HandlerError> {
    let config = CreatorConfig::from_lookup(lookup).inspect_err(|error| {
        log_error(COMPONENT, "configuration_invalid", json!({ "error": error.message() }));
    })?;
    run_creator(&config, ec2).map(|outcome| outcome.response())
}

pub fn run_creator(
    config: &CreatorConfig,
    ec2: &impl Ec2Api,
) -> Result<CreatorOutcome, HandlerError> {
    let started_at = Instant::now();
    log_info(
        COMPONENT,
        "snapshot_creation_started",
        json!({ "tag_filter": config.tag_filter }),
    );

    match create_snapshots(config, ec2) {
        Ok(outcome) => {
            log_info(
                COMPONENT,
                "snapshot_creation_completed",
                json!({
                    "created_count": outcome.created_count(),
                    "duration_ms": started_at.elapsed().as_millis(),
                }),
            );
            Ok(outcome)
        }
        Err(error) => {
            log_error(
                COMPONENT,
                "snapshot_creation_failed",
                json!({
                    "duration_ms": started_at.elapsed().as_millis(),
                    "error": error.to_string(),
                }),
            );
            Err(error)
        }
    }
}

fn create_snapshots(
    config: &CreatorConfig,
    ec2: &impl Ec2Api,
) -> Result<CreatorOutcome, HandlerError> {
    let filter = &config.tag_filter;
    let instances = remote(RemoteOperation::DescribeInstances, ec2.describe_instances())?;
    let targets = select_volume_targets(&instances, filter);

    let mut outcome = CreatorOutcome::default();
    for target in targets {
        log_info(
            COMPONENT,
            "snapshot_creating",
            json!({
                "volume_id": target.volume_id.clone(),
                "instance_id": target.instance_id.clone(),
            }),
        );

        let description = snapshot_description(&target, filter);
        let snapshot_id = remote(
            RemoteOperation::CreateSnapshot,
            ec2.create_snapshot(&target.volume_id, &description),
        )?;
        remote(
            RemoteOperation::CreateTags,
            ec2.create_tags(&snapshot_id, &snapshot_tags(&target, filter)),
        )?;

        log_info(
            COMPONENT,
            "snapshot_created",
            json!({
                "snapshot_id": snapshot_id.clone(),
                "volume_id": target.volume_id.clone(),
                "instance_id": target.instance_id.clone(),
            }),
        );
        outcome.created.push(CreatedSnapshot {
            snapshot_id,
            volume_id: target.volume_id,
            instance_id: target.instance_id,
        });
    }

    Ok(outcome)
}
