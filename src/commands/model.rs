//! Model commands: load and status.

use crate::{Context, ui};
use anyhow::Result;
use glurest::{ModelSource, StatusQuery};

/// Load a model and print what the console made of it.
pub fn load(ctx: &Context, source: &ModelSource) -> Result<bool> {
    let loaded = ctx.client.load_model(source)?;

    if loaded.is_success() {
        ui::success(&loaded.to_string());
    } else {
        ui::error(&loaded.to_string());
    }
    Ok(loaded.is_success())
}

/// Print the static or live model.
pub fn status(ctx: &Context, query: &StatusQuery) -> Result<bool> {
    let model = ctx.client.status(query)?;
    println!("{model}");
    Ok(true)
}
