use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use deploy_gate_core::{DeploymentProperties, ExecutionResult, RunId, SystemError};
use tracing::debug;

/// Remote deployment service, as seen by the orchestrator.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Starts a deployment event and returns the id of the resulting run.
    async fn create_deployment_event(
        &self,
        environment_id: &str,
        application_id: &str,
        properties: &DeploymentProperties,
    ) -> Result<RunId, SystemError>;

    /// Latest execution detail for a run. `None` when the service has no record.
    async fn get_execution_results(
        &self,
        run_id: &RunId,
    ) -> Result<Option<ExecutionResult>, SystemError>;

    /// Releases connections and other resources.
    fn close(&mut self);
}

/// Owns a client for one invocation and closes it exactly once, on drop.
pub struct ClientGuard<C: DeploymentClient> {
    client: C,
}

impl<C: DeploymentClient> ClientGuard<C> {
    /// Takes ownership of `client`.
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: DeploymentClient> Deref for ClientGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}

impl<C: DeploymentClient> DerefMut for ClientGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.client
    }
}

impl<C: DeploymentClient> Drop for ClientGuard<C> {
    fn drop(&mut self) {
        self.client.close();
        debug!("deployment client closed");
    }
}
