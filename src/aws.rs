//! EC2 provider backed by the AWS SDK.
//!
//! The SDK is async; this type owns a current-thread tokio runtime and blocks on
//! each request so the rest of the tool stays sequential.

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::client::Waiters;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::primitives::DateTime as SdkDateTime;
use aws_sdk_ec2::types::Filter;
use aws_smithy_runtime_api::client::waiters::error::WaiterError;
use chrono::{DateTime, Utc};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use crate::error::{Result, ShottyError};
use crate::provider::{Ec2Provider, InstanceQuery};
use crate::types::{
    Instance, InstanceState, PROJECT_TAG, Snapshot, SnapshotState, Volume, VolumeState,
};

/// [`Ec2Provider`] talking to the real EC2 API.
pub struct AwsProvider {
    client: Client,
    runtime: Runtime,
}

impl AwsProvider {
    /// Build a client from the named credential profile.
    ///
    /// `region` overrides the region configured for the profile.
    pub fn connect(profile: &str, region: Option<&str>) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).profile_name(profile);
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = runtime.block_on(loader.load());

        match sdk_config.region() {
            Some(region) => info!("Using profile '{}' in region {}", profile, region),
            None => {
                return Err(ShottyError::config(format!(
                    "no region configured for profile '{}' (set one in the profile or pass --region)",
                    profile
                )));
            }
        }

        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
        })
    }
}

impl Ec2Provider for AwsProvider {
    fn instances(&self, query: &InstanceQuery) -> Result<Vec<Instance>> {
        let mut request = self.client.describe_instances();
        if let InstanceQuery::Project(project) = query {
            request = request.filters(
                Filter::builder()
                    .name(format!("tag:{}", PROJECT_TAG))
                    .values(project)
                    .build(),
            );
        }

        let reservations = self
            .runtime
            .block_on(
                request
                    .into_paginator()
                    .items()
                    .send()
                    .collect::<std::result::Result<Vec<_>, _>>(),
            )
            .map_err(|e| {
                ShottyError::provider("describe", "instances", DisplayErrorContext(&e).to_string())
            })?;

        let instances: Vec<Instance> = reservations
            .iter()
            .flat_map(|r| r.instances())
            .filter_map(instance_from_sdk)
            .collect();
        debug!("describe instances returned {} instances", instances.len());
        Ok(instances)
    }

    fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>> {
        let volumes = self
            .runtime
            .block_on(
                self.client
                    .describe_volumes()
                    .filters(
                        Filter::builder()
                            .name("attachment.instance-id")
                            .values(instance_id)
                            .build(),
                    )
                    .into_paginator()
                    .items()
                    .send()
                    .collect::<std::result::Result<Vec<_>, _>>(),
            )
            .map_err(|e| {
                ShottyError::provider(
                    "describe volumes of",
                    instance_id,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(volumes
            .iter()
            .filter_map(|v| volume_from_sdk(v, instance_id))
            .collect())
    }

    fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>> {
        let snapshots = self
            .runtime
            .block_on(
                self.client
                    .describe_snapshots()
                    .filters(Filter::builder().name("volume-id").values(volume_id).build())
                    .into_paginator()
                    .items()
                    .send()
                    .collect::<std::result::Result<Vec<_>, _>>(),
            )
            .map_err(|e| {
                ShottyError::provider(
                    "describe snapshots of",
                    volume_id,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        let mut snapshots: Vec<Snapshot> = snapshots
            .iter()
            .filter_map(|s| {
                snapshot_from_parts(
                    s.snapshot_id(),
                    s.volume_id().unwrap_or(volume_id),
                    s.state().map(|st| st.as_str()),
                    s.progress(),
                    s.start_time(),
                )
            })
            .collect();
        // EC2 does not guarantee an order
        snapshots.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(snapshots)
    }

    fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.runtime
            .block_on(self.client.start_instances().instance_ids(instance_id).send())
            .map_err(|e| {
                ShottyError::provider("start", instance_id, DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }

    fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.runtime
            .block_on(self.client.stop_instances().instance_ids(instance_id).send())
            .map_err(|e| {
                ShottyError::provider("stop", instance_id, DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }

    fn wait_until_stopped(&self, instance_id: &str, timeout: Duration) -> Result<()> {
        let outcome = self.runtime.block_on(
            self.client
                .wait_until_instance_stopped()
                .instance_ids(instance_id)
                .wait(timeout),
        );
        wait_result(outcome, instance_id, "stopped")
    }

    fn wait_until_running(&self, instance_id: &str, timeout: Duration) -> Result<()> {
        let outcome = self.runtime.block_on(
            self.client
                .wait_until_instance_running()
                .instance_ids(instance_id)
                .wait(timeout),
        );
        wait_result(outcome, instance_id, "running")
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .create_snapshot()
                    .volume_id(volume_id)
                    .description(description)
                    .send(),
            )
            .map_err(|e| {
                ShottyError::provider(
                    "create snapshot of",
                    volume_id,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        snapshot_from_parts(
            output.snapshot_id(),
            output.volume_id().unwrap_or(volume_id),
            output.state().map(|st| st.as_str()),
            output.progress(),
            output.start_time(),
        )
        .ok_or_else(|| {
            ShottyError::provider(
                "create snapshot of",
                volume_id,
                "response carried no snapshot id",
            )
        })
    }
}

fn instance_from_sdk(instance: &aws_sdk_ec2::types::Instance) -> Option<Instance> {
    let Some(id) = instance.instance_id() else {
        warn!("Skipping instance without an id");
        return None;
    };

    Some(Instance {
        id: id.to_string(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        availability_zone: instance
            .placement()
            .and_then(|p| p.availability_zone())
            .unwrap_or_default()
            .to_string(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .and_then(|name| name.as_str().parse().ok())
            .unwrap_or_else(|| InstanceState::Other("unknown".to_string())),
        public_dns_name: instance.public_dns_name().unwrap_or_default().to_string(),
        tags: instance
            .tags()
            .iter()
            .filter_map(|t| Some((t.key()?, t.value().unwrap_or_default())))
            .collect(),
    })
}

fn volume_from_sdk(volume: &aws_sdk_ec2::types::Volume, instance_id: &str) -> Option<Volume> {
    Some(Volume {
        id: volume.volume_id()?.to_string(),
        instance_id: instance_id.to_string(),
        size_gib: volume.size().unwrap_or_default(),
        state: volume
            .state()
            .and_then(|s| s.as_str().parse().ok())
            .unwrap_or_else(|| VolumeState::Other("unknown".to_string())),
        encrypted: volume.encrypted().unwrap_or(false),
    })
}

fn snapshot_from_parts(
    id: Option<&str>,
    volume_id: &str,
    state: Option<&str>,
    progress: Option<&str>,
    start_time: Option<&SdkDateTime>,
) -> Option<Snapshot> {
    Some(Snapshot {
        id: id?.to_string(),
        volume_id: volume_id.to_string(),
        state: state
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SnapshotState::Other("unknown".to_string())),
        progress: progress.unwrap_or_default().to_string(),
        start_time: start_time.map(to_chrono).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    })
}

/// Map a waiter result onto [`ShottyError::WaitTimeout`] or a provider error.
fn wait_result<T, O, E>(
    outcome: std::result::Result<T, WaiterError<O, E>>,
    instance_id: &str,
    target: &str,
) -> Result<()>
where
    WaiterError<O, E>: std::error::Error,
{
    match outcome {
        Ok(_) => Ok(()),
        Err(WaiterError::ExceededMaxWait(_)) => {
            Err(ShottyError::wait_timeout(instance_id, target))
        }
        Err(e) => Err(ShottyError::provider(
            "wait for",
            instance_id,
            DisplayErrorContext(&e).to_string(),
        )),
    }
}

fn to_chrono(time: &SdkDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos()).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
