#![forbid(unsafe_code)]

//! Trigger a remote test run, poll it to a terminal state, and reduce the
//! result to a single pass/fail verdict.

pub mod client;
pub mod poller;
pub mod runner;
pub mod trigger;

pub use client::{ClientGuard, DeploymentClient};
pub use poller::{PollError, Poller};
pub use runner::DeploymentRunner;
pub use trigger::trigger;
