use std::io::Write;

use deploy_gate_core::{ConfigError, DeploymentConfig, DeploymentProperties, Outcome};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::{ClientGuard, DeploymentClient};
use crate::poller::{PollError, Poller};
use crate::trigger::trigger;

/// One trigger-and-poll invocation.
///
/// The client is guarded from construction on, so it is closed exactly once
/// whether `call` returns, the future is dropped, or the runner is never
/// called at all.
pub struct DeploymentRunner<C: DeploymentClient, W: Write + Send> {
    client: ClientGuard<C>,
    sink: W,
    config: DeploymentConfig,
    properties: DeploymentProperties,
}

impl<C, W> DeploymentRunner<C, W>
where
    C: DeploymentClient,
    W: Write + Send,
{
    /// Guards `client`, then validates `config`.
    pub fn new(client: C, sink: W, config: DeploymentConfig) -> Result<Self, ConfigError> {
        let client = ClientGuard::new(client);
        config.validate()?;
        Ok(Self {
            client,
            sink,
            config,
            properties: DeploymentProperties::default(),
        })
    }

    /// Attaches build metadata sent with the deployment event.
    pub fn with_properties(mut self, properties: DeploymentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Runs the deployment and returns the verdict. Never fails.
    pub async fn call(self) -> bool {
        let span = info_span!(
            "deployment",
            invocation = %Uuid::new_v4(),
            environment_id = %self.config.environment_id,
            application_id = %self.config.application_id,
        );
        self.run().instrument(span).await
    }

    async fn run(mut self) -> bool {
        let outcome = self.execute().await;
        let flags = self.config.override_flags();
        let verdict = outcome.verdict(flags);

        if outcome.is_overridden(flags) {
            warn!(outcome = outcome.as_str(), "failure overridden by continue flag");
            emit(
                &mut self.sink,
                &format!("Deployment {}; continuing as configured", outcome.as_str()),
            );
        }
        info!(outcome = outcome.as_str(), verdict, "deployment finished");
        emit(
            &mut self.sink,
            &format!("Deployment result: {}", if verdict { "PASSED" } else { "FAILED" }),
        );
        verdict
        // `self.client` drops here and closes the client.
    }

    async fn execute(&mut self) -> Outcome {
        let run_id = match trigger(&*self.client, &self.config, &self.properties).await {
            Ok(run_id) => run_id,
            Err(e) => {
                emit(&mut self.sink, &format!("Error creating deployment event: {e}"));
                return Outcome::SystemErrored;
            }
        };
        emit(&mut self.sink, &format!("Created deployment event {run_id}"));

        let polled = Poller::new(&*self.client, &mut self.sink, &self.config)
            .poll_until_terminal(&run_id)
            .await;

        match polled {
            Ok(summary) => {
                emit(
                    &mut self.sink,
                    &format!("Run {run_id} ended with status {}", summary.run_status()),
                );
                if summary.success {
                    Outcome::Success
                } else {
                    Outcome::PlanFailure
                }
            }
            Err(e) => {
                warn!("polling stopped: {e}");
                emit(&mut self.sink, &format!("Error polling deployment: {e}"));
                match e {
                    PollError::System(_) => Outcome::SystemErrored,
                    PollError::NotFound { .. } => Outcome::NotFound,
                    PollError::Timeout { .. } => Outcome::TimedOut,
                }
            }
        }
    }
}

fn emit<W: Write>(sink: &mut W, line: &str) {
    if let Err(e) = writeln!(sink, "{line}") {
        warn!("progress write failed: {e}");
    }
}
