use chrono::Utc;
use ebs_snapshot_lambda::adapters::aws_ec2::AwsEc2Client;
use ebs_snapshot_lambda::handlers::reaper::handle_reaper_event;
use ebs_snapshot_lambda::handlers::HandlerResponse;
use ebs_snapshot_lambda::runtime::config::env_lookup;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(_event: LambdaEvent<Value>) -> Result<HandlerResponse, Error> {
    let ec2 = AwsEc2Client::from_default_config().await;
    handle_reaper_event(env_lookup, Utc::now(), &ec2).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
