//! shotty library
//!
//! Lists and manipulates EC2 instances, volumes and snapshots, grouped by the
//! `Project` tag. The binary wires [`aws::AwsProvider`] into
//! [`commands::dispatch`]; everything else runs against the [`Ec2Provider`] trait.

pub mod aws;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod provider;
pub mod types;

// Re-export main types for convenience
pub use aws::AwsProvider;
pub use commands::{Action, Failure, Outcome, dispatch};
pub use config::{ErrorPolicy, Overrides, Settings};
pub use error::{Result, ShottyError};
pub use filter::filter_instances;
pub use provider::{Ec2Provider, InstanceQuery};
pub use types::{
    Instance, InstanceState, PROJECT_TAG, Snapshot, SnapshotState, Tags, Volume, VolumeState,
};
