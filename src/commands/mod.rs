pub mod model;
pub mod plan;

use crate::cli::Selection;
use anyhow::{Context as _, Result};
use glurest::SystemFilter;
use std::fs;

/// Filter for the selected entries: explicit DSL, DSL file, or shorthand selector.
pub fn resolve_filter(selection: &Selection) -> Result<Option<SystemFilter>> {
    if let Some(filter) = &selection.system_filter {
        return Ok(non_blank(filter));
    }

    if let Some(path) = &selection.system_filter_file {
        let filter = fs::read_to_string(path)
            .with_context(|| format!("Could not read filter file {}", path.display()))?;
        return Ok(non_blank(&filter));
    }

    Ok(selection.selector().system_filter())
}

/// A blank filter selects nothing and is dropped.
fn non_blank(filter: &str) -> Option<SystemFilter> {
    let filter = filter.trim();
    (!filter.is_empty()).then(|| SystemFilter::new(filter))
}
