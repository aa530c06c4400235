//! Progress reporting while a plan executes.

use crate::types::Completion;

/// Receives completion updates from [`crate::Client::wait_for_completion`].
pub trait ProgressReporter {
    /// Called once for every poll that is not yet complete.
    fn update(&mut self, completion: &Completion);

    /// Called once with the final completion.
    fn finish(&mut self, completion: &Completion);
}

/// Reports progress through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn update(&mut self, completion: &Completion) {
        log::info!("InProgress: {}% complete", completion.percent);
    }

    fn finish(&mut self, completion: &Completion) {
        log::info!("Completed : {}", completion.raw);
    }
}
