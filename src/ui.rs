use colored::Colorize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message to stderr
pub fn hint(msg: &str) {
    eprintln!("  {}", msg.dimmed());
}

/// Report a failed run, with advice when the console client knows the cause.
pub fn report_error(err: &anyhow::Error) {
    error(&format!("{err:#}"));
    if let Some(console_err) = err.downcast_ref::<glurest::Error>() {
        hint(&advice(console_err));
    }
}

/// Category, HTTP status when there is one, and what to check next.
fn advice(err: &glurest::Error) -> String {
    let category = err.category();
    match err.status() {
        Some(status) => format!("{category} (HTTP {status}): {}", category.advice()),
        None => format!("{category}: {}", category.advice()),
    }
}
