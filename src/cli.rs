use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::Action;
use crate::config::{ErrorPolicy, Overrides};

/// shotty - manage EC2 instances, volumes and snapshots by project
#[derive(Parser, Debug)]
#[command(name = "shotty")]
#[command(about = "List, stop, start and snapshot EC2 instances grouped by their Project tag")]
#[command(version)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true, env = "SHOTTY_CONFIG")]
    pub config: Option<PathBuf>,

    /// AWS credential profile (default: shotty)
    #[arg(long, global = true, env = "SHOTTY_PROFILE")]
    pub profile: Option<String>,

    /// AWS region, overriding the profile's region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// What to do when one instance fails during start, stop or snapshot
    #[arg(long, global = true, value_enum)]
    pub on_error: Option<ErrorPolicy>,

    /// Maximum seconds to wait for an instance state change
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub wait_timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Commands for snapshots
    Snapshots {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
    /// Commands for volumes
    Volumes {
        #[command(subcommand)]
        command: VolumeCommands,
    },
    /// Commands for instances
    Instances {
        #[command(subcommand)]
        command: InstanceCommands,
    },
}

/// `--project` filter shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Only instances for project (tag Project:<name>)
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// List EC2 snapshots
    List {
        #[command(flatten)]
        filter: ProjectArgs,
        /// List all snapshots for each volume, not just the most recent completed one
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VolumeCommands {
    /// List EC2 volumes
    List {
        #[command(flatten)]
        filter: ProjectArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum InstanceCommands {
    /// List EC2 instances
    List {
        #[command(flatten)]
        filter: ProjectArgs,
    },
    /// Start EC2 instances
    Start {
        #[command(flatten)]
        filter: ProjectArgs,
    },
    /// Stop EC2 instances
    Stop {
        #[command(flatten)]
        filter: ProjectArgs,
    },
    /// Stop instances, snapshot every attached volume, then restart them
    Snapshot {
        #[command(flatten)]
        filter: ProjectArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Settings overrides given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            profile: self.profile.clone(),
            region: self.region.clone(),
            on_error: self.on_error,
            wait_timeout_secs: self.wait_timeout,
        }
    }

    /// Log filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

impl Commands {
    pub fn action(&self) -> Action {
        match self {
            Self::Snapshots {
                command: SnapshotCommands::List { filter, all },
            } => Action::ListSnapshots {
                project: filter.project.clone(),
                all: *all,
            },
            Self::Volumes {
                command: VolumeCommands::List { filter },
            } => Action::ListVolumes {
                project: filter.project.clone(),
            },
            Self::Instances { command } => match command {
                InstanceCommands::List { filter } => Action::ListInstances {
                    project: filter.project.clone(),
                },
                InstanceCommands::Start { filter } => Action::StartInstances {
                    project: filter.project.clone(),
                },
                InstanceCommands::Stop { filter } => Action::StopInstances {
                    project: filter.project.clone(),
                },
                InstanceCommands::Snapshot { filter } => Action::SnapshotInstances {
                    project: filter.project.clone(),
                },
            },
        }
    }
}
