//! Callbacks around a kickoff.

use anyhow::Result;
use ck_protocol::crew_models::{CrewOutput, Inputs};
use tracing::info;

/// Hooks run around [`Crew::kickoff`](super::Crew::kickoff).
///
/// `before_kickoff` runs once, before any task, and may rewrite or reject the
/// inputs. `after_kickoff` runs on the complete output only; it is skipped
/// when the run fails.
pub trait KickoffHooks: Send + Sync {
    fn before_kickoff(&self, inputs: Inputs) -> Result<Inputs> {
        info!(
            topic = inputs.topic().unwrap_or("General Development"),
            "Crew is about to start"
        );
        Ok(inputs)
    }

    fn after_kickoff(&self, output: CrewOutput) -> Result<CrewOutput> {
        info!(chars = output.raw.chars().count(), "Crew has completed execution");
        Ok(output)
    }
}

/// The default hooks: log and pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHooks;

impl KickoffHooks for LoggingHooks {}
