//! Progress display while a plan executes.

use glurest::{Completion, LogReporter, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Percentage bar for interactive terminals.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(" {percent:>3}% [{bar:40.cyan/blue}] ETA {eta} ")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("** "),
        );
        Self { bar }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn update(&mut self, completion: &Completion) {
        self.bar.set_position(u64::from(completion.percent));
    }

    fn finish(&mut self, completion: &Completion) {
        self.bar.set_position(u64::from(completion.percent));
        self.bar.finish();
    }
}

/// Bar on a terminal, log lines otherwise or when debugging.
pub fn reporter(debug: bool) -> Box<dyn ProgressReporter> {
    if !debug && console::Term::stdout().is_term() {
        Box::new(BarReporter::new())
    } else {
        Box::new(LogReporter)
    }
}
