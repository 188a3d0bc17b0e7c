//! `instances start`, `instances stop` and `instances snapshot`.
//!
//! All three walk the filtered instance set once, in provider order, and hand
//! per-instance failures to [`for_each_instance`] so one [`ErrorPolicy`] governs
//! every command.
//!
//! # Snapshot sequence
//!
//! 1. stop the instance and wait until it is `stopped`
//! 2. create one snapshot per attached volume
//! 3. if the instance was `pending`/`running` beforehand, start it and wait
//!    until it is `running` again
//!
//! Step 3 runs even when a snapshot in step 2 failed.

use std::io::Write;

use tracing::{info, warn};

use super::{Outcome, for_each_instance};
use crate::config::{ErrorPolicy, Settings};
use crate::error::Result;
use crate::filter::filter_instances;
use crate::provider::Ec2Provider;
use crate::types::Instance;

pub fn start_instances<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    policy: ErrorPolicy,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    for_each_instance(&instances, "start", policy, out, |instance, out| {
        writeln!(out, "Starting {}...", instance.id)?;
        provider.start_instance(&instance.id)
    })
}

pub fn stop_instances<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    policy: ErrorPolicy,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    for_each_instance(&instances, "stop", policy, out, |instance, out| {
        writeln!(out, "Stopping {}...", instance.id)?;
        provider.stop_instance(&instance.id)
    })
}

pub fn snapshot_instances<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    settings: &Settings,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    let outcome = for_each_instance(
        &instances,
        "snapshot",
        settings.on_error,
        out,
        |instance, out| snapshot_instance(provider, instance, settings, out),
    )?;
    writeln!(out, "Done!")?;
    Ok(outcome)
}

fn snapshot_instance<W: Write>(
    provider: &dyn Ec2Provider,
    instance: &Instance,
    settings: &Settings,
    out: &mut W,
) -> Result<()> {
    let timeout = settings.wait_timeout();
    let resume = instance.state.is_active();

    writeln!(out, "Stopping instance {}...", instance.id)?;
    provider.stop_instance(&instance.id)?;
    provider.wait_until_stopped(&instance.id, timeout)?;

    let snapshotted = snapshot_volumes(provider, instance, &settings.snapshot_description, out);

    if !resume {
        info!(instance_id = %instance.id, state = %instance.state, "leaving instance stopped");
        return snapshotted;
    }

    writeln!(out, "Starting instance {}...", instance.id)?;
    let resumed = provider
        .start_instance(&instance.id)
        .and_then(|()| provider.wait_until_running(&instance.id, timeout));

    match (snapshotted, resumed) {
        (Err(error), Err(resume_error)) => {
            warn!(instance_id = %instance.id, %resume_error, "restart after failed snapshot also failed");
            Err(error)
        }
        (snapshotted, resumed) => snapshotted.and(resumed),
    }
}

fn snapshot_volumes<W: Write>(
    provider: &dyn Ec2Provider,
    instance: &Instance,
    description: &str,
    out: &mut W,
) -> Result<()> {
    for volume in provider.volumes(&instance.id)? {
        writeln!(out, "Creating snapshot of {}...", volume.id)?;
        let snapshot = provider.create_snapshot(&volume.id, description)?;
        info!(volume_id = %volume.id, snapshot_id = %snapshot.id, "snapshot requested");
    }
    Ok(())
}
