use std::io::Write;
use std::time::Duration;

use deploy_gate_core::{poll_delay, DeploymentConfig, ExecutionResult, ExecutionSummary, RunId, SystemError};
use thiserror::Error;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::client::DeploymentClient;

/// Why polling stopped without a terminal summary.
#[derive(Debug, Error)]
pub enum PollError {
    /// The status query itself failed.
    #[error("status query failed: {0}")]
    System(#[from] SystemError),
    /// The service has no result for the run.
    #[error("no execution result found for run {run_id}")]
    NotFound {
        /// Run that was queried.
        run_id: RunId,
    },
    /// No terminal status before the deadline.
    #[error("run {run_id} not finished after {elapsed:?}")]
    Timeout {
        /// Run that was queried.
        run_id: RunId,
        /// Time spent polling.
        elapsed: Duration,
    },
}

/// Queries run status until the latest summary is terminal.
pub struct Poller<'a, C: ?Sized, W> {
    client: &'a C,
    sink: &'a mut W,
    interval: Duration,
    max_interval: Duration,
    timeout: Duration,
}

impl<'a, C, W> Poller<'a, C, W>
where
    C: DeploymentClient + ?Sized,
    W: Write,
{
    /// Poller using the cadence and bound from `config`.
    pub fn new(client: &'a C, sink: &'a mut W, config: &DeploymentConfig) -> Self {
        Self {
            client,
            sink,
            interval: config.poll_interval(),
            max_interval: config.max_poll_interval(),
            timeout: config.poll_timeout(),
        }
    }

    /// Polls `run_id` until a terminal summary, a missing result, a failed
    /// query, or the timeout, whichever comes first.
    pub async fn poll_until_terminal(
        &mut self,
        run_id: &RunId,
    ) -> Result<ExecutionSummary, PollError> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let fetched = match timeout_at(deadline, self.client.get_execution_results(run_id)).await {
                Ok(r) => r?,
                Err(_) => {
                    return Err(PollError::Timeout {
                        run_id: run_id.clone(),
                        elapsed: started.elapsed(),
                    })
                }
            };

            let result = match fetched {
                Some(result) if !result.is_empty() => result,
                _ => {
                    warn!(%run_id, attempt, "no execution result");
                    return Err(PollError::NotFound {
                        run_id: run_id.clone(),
                    });
                }
            };

            self.report(&result);

            if let Some(latest) = result.latest().filter(|s| s.is_terminal()) {
                info!(%run_id, attempt, status = %latest.status, success = latest.success, "run finished");
                return Ok(latest.clone());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(PollError::Timeout {
                    run_id: run_id.clone(),
                    elapsed: now - started,
                });
            }

            let wait = poll_delay(self.interval, self.max_interval, attempt).min(deadline - now);
            debug!(%run_id, attempt, ?wait, "run still in progress");
            sleep(wait).await;
        }
    }

    fn report(&mut self, result: &ExecutionResult) {
        for summary in &result.executions {
            if let Err(e) = writeln!(self.sink, "{}: {}", summary.status, summary.status_cause) {
                warn!("progress write failed: {e}");
            }
        }
    }
}
