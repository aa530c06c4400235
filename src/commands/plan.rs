//! Plan actions: start, stop, bounce, deploy, undeploy, redeploy.

use crate::Context;
use crate::progress;
use anyhow::Result;
use glurest::{Action, Order, SystemFilter};

/// Create the plan, run it unless dry-running, and print the outcome.
///
/// Returns whether the plan succeeded.
pub fn run(
    ctx: &Context,
    action: Action,
    filter: Option<SystemFilter>,
    order: Order,
    dry_run: bool,
) -> Result<bool> {
    let mut reporter = progress::reporter(ctx.debug);
    let outcome = ctx
        .client
        .execute_plan(action, filter, order, dry_run, reporter.as_mut())?;

    println!("{outcome}");
    Ok(outcome.is_success())
}
