// In-memory EC2 used by the integration tests.
//
// Records every mutating call so tests can assert on exactly what the command
// layer asked the provider to do.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use shotty::{
    Ec2Provider, Instance, InstanceQuery, InstanceState, Result, ShottyError, Snapshot,
    SnapshotState, Tags, Volume, VolumeState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Stop(String),
    WaitStopped(String),
    WaitRunning(String),
    CreateSnapshot { volume_id: String, description: String },
}

#[derive(Default)]
pub struct FakeEc2 {
    pub instances: Vec<Instance>,
    pub volumes: Vec<Volume>,
    /// Returned per volume in insertion order; tests insert newest first.
    pub snapshots: Vec<Snapshot>,
    /// When set, `instances()` ignores the query like a lax server would.
    pub ignore_query: bool,
    /// `(action, resource id)` pairs that fail with a provider error
    failures: HashSet<(&'static str, String)>,
    calls: RefCell<Vec<Call>>,
    queries: RefCell<Vec<InstanceQuery>>,
    next_snapshot: Cell<u32>,
}

impl FakeEc2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots.push(snapshot);
        self
    }

    pub fn failing(mut self, action: &'static str, resource: &str) -> Self {
        self.failures.insert((action, resource.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn queries(&self) -> Vec<InstanceQuery> {
        self.queries.borrow().clone()
    }

    fn check(&self, action: &'static str, resource: &str) -> Result<()> {
        if self.failures.contains(&(action, resource.to_string())) {
            Err(ShottyError::provider(action, resource, "simulated failure"))
        } else {
            Ok(())
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Ec2Provider for FakeEc2 {
    fn instances(&self, query: &InstanceQuery) -> Result<Vec<Instance>> {
        self.queries.borrow_mut().push(query.clone());
        self.check("describe", "instances")?;
        Ok(self
            .instances
            .iter()
            .filter(|i| self.ignore_query || query.matches(i))
            .cloned()
            .collect())
    }

    fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>> {
        self.check("describe volumes of", instance_id)?;
        Ok(self
            .volumes
            .iter()
            .filter(|v| v.instance_id == instance_id)
            .cloned()
            .collect())
    }

    fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>> {
        self.check("describe snapshots of", volume_id)?;
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.volume_id == volume_id)
            .cloned()
            .collect())
    }

    fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.record(Call::Start(instance_id.to_string()));
        self.check("start", instance_id)
    }

    fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.record(Call::Stop(instance_id.to_string()));
        self.check("stop", instance_id)
    }

    fn wait_until_stopped(&self, instance_id: &str, _timeout: Duration) -> Result<()> {
        self.record(Call::WaitStopped(instance_id.to_string()));
        if self.failures.contains(&("wait stopped", instance_id.to_string())) {
            return Err(ShottyError::wait_timeout(instance_id, "stopped"));
        }
        Ok(())
    }

    fn wait_until_running(&self, instance_id: &str, _timeout: Duration) -> Result<()> {
        self.record(Call::WaitRunning(instance_id.to_string()));
        self.check("wait running", instance_id)
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot> {
        self.record(Call::CreateSnapshot {
            volume_id: volume_id.to_string(),
            description: description.to_string(),
        });
        self.check("create snapshot of", volume_id)?;

        let n = self.next_snapshot.get() + 1;
        self.next_snapshot.set(n);
        Ok(snapshot(&format!("snap-new-{}", n), volume_id, SnapshotState::Pending, 0))
    }
}

pub fn instance(id: &str, project: Option<&str>, state: InstanceState) -> Instance {
    let mut tags = Tags::new();
    tags.insert("Name", id);
    if let Some(project) = project {
        tags.insert("Project", project);
    }
    Instance {
        id: id.to_string(),
        instance_type: "t3.micro".to_string(),
        availability_zone: "us-east-1a".to_string(),
        state,
        public_dns_name: format!("{}.compute.amazonaws.com", id),
        tags,
    }
}

pub fn volume(id: &str, instance_id: &str, size_gib: i32) -> Volume {
    Volume {
        id: id.to_string(),
        instance_id: instance_id.to_string(),
        size_gib,
        state: VolumeState::InUse,
        encrypted: false,
    }
}

/// `age_hours` counts back from a fixed reference time.
pub fn snapshot(id: &str, volume_id: &str, state: SnapshotState, age_hours: i64) -> Snapshot {
    Snapshot {
        id: id.to_string(),
        volume_id: volume_id.to_string(),
        progress: if state == SnapshotState::Completed {
            "100%".to_string()
        } else {
            "42%".to_string()
        },
        state,
        start_time: reference_time() - chrono::Duration::hours(age_hours),
    }
}

pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn output(buf: Vec<u8>) -> Vec<String> {
    String::from_utf8(buf)
        .expect("output is utf-8")
        .lines()
        .map(str::to_string)
        .collect()
}
