//! Typed EC2 resource model
//!
//! Instances, volumes and snapshots as this tool sees them, detached from the SDK
//! types so the command layer can run against any [`crate::provider::Ec2Provider`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// Tag key used for grouping resources into projects.
pub const PROJECT_TAG: &str = "Project";

/// Key/value tags attached to a resource.
///
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of the `Project` tag, if any.
    pub fn project(&self) -> Option<&str> {
        self.get(PROJECT_TAG)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}

/// Instance run-state, as named by the EC2 API.
///
/// Parsing never fails: unknown names land in `Other` and display unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    #[strum(default)]
    Other(String),
}

impl InstanceState {
    /// True when the instance is up or on its way up.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

/// EBS volume state.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum VolumeState {
    Creating,
    Available,
    InUse,
    Deleting,
    Deleted,
    Error,
    #[strum(default)]
    Other(String),
}

/// EBS snapshot state.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SnapshotState {
    Pending,
    Completed,
    Error,
    Recoverable,
    Recovering,
    #[strum(default)]
    Other(String),
}

/// A compute instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub instance_type: String,
    pub availability_zone: String,
    pub state: InstanceState,
    /// Empty when the instance has no public address.
    pub public_dns_name: String,
    pub tags: Tags,
}

impl Instance {
    pub fn project(&self) -> Option<&str> {
        self.tags.project()
    }
}

/// An EBS volume attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: String,
    pub instance_id: String,
    pub size_gib: i32,
    pub state: VolumeState,
    pub encrypted: bool,
}

/// A point-in-time copy of a volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub id: String,
    pub volume_id: String,
    pub state: SnapshotState,
    /// Progress as reported by EC2, e.g. `"100%"`.
    pub progress: String,
    pub start_time: DateTime<Utc>,
}

impl Snapshot {
    pub fn is_completed(&self) -> bool {
        self.state == SnapshotState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_last_value_wins() {
        let tags: Tags = [("Project", "alpha"), ("Name", "web"), ("Project", "beta")]
            .into_iter()
            .collect();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.project(), Some("beta"));
        assert_eq!(tags.get("Name"), Some("web"));
        assert_eq!(tags.get("project"), None);
    }

    #[test]
    fn test_empty_tags_have_no_project() {
        let tags = Tags::new();
        assert!(tags.is_empty());
        assert_eq!(tags.project(), None);
    }

    #[test]
    fn test_instance_state_parse() {
        assert_eq!("running".parse::<InstanceState>().unwrap(), InstanceState::Running);
        assert_eq!(
            "shutting-down".parse::<InstanceState>().unwrap(),
            InstanceState::ShuttingDown
        );
        assert_eq!(
            "hibernating".parse::<InstanceState>().unwrap(),
            InstanceState::Other("hibernating".to_string())
        );
        assert!(InstanceState::Pending.is_active());
        assert!(!InstanceState::Stopped.is_active());
    }

    #[test]
    fn test_state_display_uses_api_names() {
        assert_eq!(InstanceState::ShuttingDown.to_string(), "shutting-down");
        assert_eq!(InstanceState::Other("hibernating".to_string()).to_string(), "hibernating");
        assert_eq!(VolumeState::InUse.to_string(), "in-use");
        assert_eq!("in-use".parse::<VolumeState>().unwrap(), VolumeState::InUse);
        assert_eq!("completed".parse::<SnapshotState>().unwrap(), SnapshotState::Completed);
        assert_eq!(SnapshotState::Recoverable.to_string(), "recoverable");
        assert_eq!(SnapshotState::Other("archived".to_string()).to_string(), "archived");
    }
}
