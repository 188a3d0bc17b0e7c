//! `instances list`, `volumes list` and `snapshots list`.

use std::io::Write;

use tracing::debug;

use super::Outcome;
use crate::error::Result;
use crate::filter::filter_instances;
use crate::provider::Ec2Provider;
use crate::types::{Instance, Snapshot, Volume};

/// Printed in place of a missing `Project` tag.
pub const NO_PROJECT: &str = "<no project>";

/// strftime `%c`, e.g. `Mon Oct 19 12:00:00 2026`
const START_TIME_FORMAT: &str = "%c";

pub fn instance_row(instance: &Instance) -> String {
    format!(
        "{}, {}, {}, {}, {}, {}",
        instance.id,
        instance.instance_type,
        instance.availability_zone,
        instance.state,
        instance.public_dns_name,
        instance.project().unwrap_or(NO_PROJECT),
    )
}

pub fn volume_row(volume: &Volume) -> String {
    let encryption = if volume.encrypted {
        "Encrypted"
    } else {
        "Not Encrypted"
    };
    format!(
        "{}, {}, {}GiB, {}, {}",
        volume.id, volume.instance_id, volume.size_gib, volume.state, encryption,
    )
}

pub fn snapshot_row(snapshot: &Snapshot, volume: &Volume) -> String {
    format!(
        "{}, {}, {}, {}, {}, {}",
        snapshot.id,
        volume.id,
        volume.instance_id,
        snapshot.state,
        snapshot.progress,
        snapshot.start_time.format(START_TIME_FORMAT),
    )
}

pub fn list_instances<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    for instance in &instances {
        writeln!(out, "{}", instance_row(instance))?;
    }
    Ok(Outcome {
        processed: instances.len(),
        ..Outcome::default()
    })
}

pub fn list_volumes<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    for instance in &instances {
        for volume in provider.volumes(&instance.id)? {
            writeln!(out, "{}", volume_row(&volume))?;
        }
    }
    Ok(Outcome {
        processed: instances.len(),
        ..Outcome::default()
    })
}

/// List snapshots per volume, newest first.
///
/// Unless `all` is set, a volume's listing ends after its first completed
/// snapshot; older ones are skipped.
pub fn list_snapshots<W: Write>(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
    all: bool,
    out: &mut W,
) -> Result<Outcome> {
    let instances = filter_instances(provider, project)?;
    for instance in &instances {
        for volume in provider.volumes(&instance.id)? {
            for snapshot in provider.snapshots(&volume.id)? {
                writeln!(out, "{}", snapshot_row(&snapshot, &volume))?;

                if snapshot.is_completed() && !all {
                    debug!(volume_id = %volume.id, "stopping at latest completed snapshot");
                    break;
                }
            }
        }
    }
    Ok(Outcome {
        processed: instances.len(),
        ..Outcome::default()
    })
}
