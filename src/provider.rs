//! Cloud provider contract.
//!
//! The command layer talks to EC2 only through [`Ec2Provider`]. Every method is a
//! blocking call; implementations own whatever runtime they need underneath.
//!
//! # Contract
//!
//! - `instances()` returns instances in provider order, all pages included.
//! - `volumes()` returns the volumes currently attached to one instance.
//! - `snapshots()` returns a volume's snapshots, most recent first.
//! - `wait_until_*()` block until the state is reached or `timeout` elapses.

use std::time::Duration;

use crate::error::Result;
use crate::types::{Instance, Snapshot, Volume};

/// Which instances to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstanceQuery {
    #[default]
    All,
    /// Instances whose `Project` tag equals the value.
    Project(String),
}

impl InstanceQuery {
    pub fn from_project(project: Option<&str>) -> Self {
        match project {
            Some(p) => Self::Project(p.to_string()),
            None => Self::All,
        }
    }

    /// Whether `instance` satisfies this query.
    pub fn matches(&self, instance: &Instance) -> bool {
        match self {
            Self::All => true,
            Self::Project(p) => instance.project() == Some(p.as_str()),
        }
    }
}

/// Blocking access to EC2 resources.
pub trait Ec2Provider {
    fn instances(&self, query: &InstanceQuery) -> Result<Vec<Instance>>;

    fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>>;

    fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>>;

    fn start_instance(&self, instance_id: &str) -> Result<()>;

    fn stop_instance(&self, instance_id: &str) -> Result<()>;

    fn wait_until_stopped(&self, instance_id: &str, timeout: Duration) -> Result<()>;

    fn wait_until_running(&self, instance_id: &str, timeout: Duration) -> Result<()>;

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot>;
}
