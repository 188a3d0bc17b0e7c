//! Instance selection by `Project` tag.

use tracing::debug;

use crate::error::Result;
use crate::provider::{Ec2Provider, InstanceQuery};
use crate::types::Instance;

/// Instances belonging to `project`, or every instance when `project` is `None`.
///
/// The provider is asked to filter server-side; the result is checked again here
/// so only exact `Project=<value>` matches come back, in provider order.
///
/// The result is collected eagerly: every page is fetched before this returns.
pub fn filter_instances(
    provider: &dyn Ec2Provider,
    project: Option<&str>,
) -> Result<Vec<Instance>> {
    let query = InstanceQuery::from_project(project);
    let instances: Vec<Instance> = provider
        .instances(&query)?
        .into_iter()
        .filter(|i| query.matches(i))
        .collect();

    debug!(?query, count = instances.len(), "filtered instances");
    Ok(instances)
}
