//! Command layer: maps a noun/verb pair onto the filtered instance set.
//!
//! # Modules
//!
//! - `list`: row formatting and the three `list` commands
//! - `lifecycle`: start, stop and snapshot under an [`ErrorPolicy`]
//!
//! Progress lines and rows are written to the caller's `Write`; diagnostics go
//! through `tracing`.

pub mod lifecycle;
pub mod list;

use std::io::Write;

use tracing::{info, warn};

use crate::config::{ErrorPolicy, Settings};
use crate::error::{Result, ShottyError};
use crate::provider::Ec2Provider;
use crate::types::Instance;

/// One resolved CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListInstances { project: Option<String> },
    ListVolumes { project: Option<String> },
    ListSnapshots { project: Option<String>, all: bool },
    StartInstances { project: Option<String> },
    StopInstances { project: Option<String> },
    SnapshotInstances { project: Option<String> },
}

impl Action {
    pub fn project(&self) -> Option<&str> {
        match self {
            Self::ListInstances { project }
            | Self::ListVolumes { project }
            | Self::ListSnapshots { project, .. }
            | Self::StartInstances { project }
            | Self::StopInstances { project }
            | Self::SnapshotInstances { project } => project.as_deref(),
        }
    }
}

/// An instance the command could not handle.
#[derive(Debug)]
pub struct Failure {
    pub instance_id: String,
    pub error: ShottyError,
}

/// What a command did.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Instances visited
    pub processed: usize,
    /// Failures recorded under [`ErrorPolicy::Continue`]
    pub failures: Vec<Failure>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run `action` against `provider`, writing user-facing output to `out`.
pub fn dispatch<W: Write>(
    action: &Action,
    provider: &dyn Ec2Provider,
    settings: &Settings,
    out: &mut W,
) -> Result<Outcome> {
    info!(?action, policy = %settings.on_error, "dispatching command");

    let project = action.project();
    match action {
        Action::ListInstances { .. } => list::list_instances(provider, project, out),
        Action::ListVolumes { .. } => list::list_volumes(provider, project, out),
        Action::ListSnapshots { all, .. } => list::list_snapshots(provider, project, *all, out),
        Action::StartInstances { .. } => {
            lifecycle::start_instances(provider, project, settings.on_error, out)
        }
        Action::StopInstances { .. } => {
            lifecycle::stop_instances(provider, project, settings.on_error, out)
        }
        Action::SnapshotInstances { .. } => {
            lifecycle::snapshot_instances(provider, project, settings, out)
        }
    }
}

/// Run `step` for every instance, handling failures according to `policy`.
///
/// Only provider failures are recoverable; anything else (a closed stdout, say)
/// ends the command regardless of policy.
pub(crate) fn for_each_instance<W, F>(
    instances: &[Instance],
    verb: &str,
    policy: ErrorPolicy,
    out: &mut W,
    mut step: F,
) -> Result<Outcome>
where
    W: Write,
    F: FnMut(&Instance, &mut W) -> Result<()>,
{
    let mut outcome = Outcome::default();
    for instance in instances {
        outcome.processed += 1;
        match step(instance, out) {
            Ok(()) => {}
            Err(error) if error.is_provider() && policy == ErrorPolicy::Continue => {
                warn!(instance_id = %instance.id, %error, "could not {}", verb);
                writeln!(out, "could not {} {}: {}", verb, instance.id, error)?;
                outcome.failures.push(Failure {
                    instance_id: instance.id.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }
    Ok(outcome)
}
