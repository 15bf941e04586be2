use deploy_gate_core::{DeploymentConfig, DeploymentProperties, RunId, SystemError};
use tracing::{info, warn};

use crate::client::DeploymentClient;

/// Asks the service to start a run. Single attempt; retries belong to the client.
pub async fn trigger<C: DeploymentClient + ?Sized>(
    client: &C,
    config: &DeploymentConfig,
    properties: &DeploymentProperties,
) -> Result<RunId, SystemError> {
    match client
        .create_deployment_event(&config.environment_id, &config.application_id, properties)
        .await
    {
        Ok(run_id) => {
            info!(%run_id, "deployment event created");
            Ok(run_id)
        }
        Err(e) => {
            warn!("create deployment event failed: {e}");
            Err(e)
        }
    }
}
