//! Spinner helpers using indicatif

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for indeterminate progress.
///
/// Hidden when stdout is not a terminal so piped output stays clean.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = if console::Term::stdout().is_term() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("    {spinner:.cyan} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Finish a spinner with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("{} {}", style("✓").green(), message));
}

/// Run `work` under a spinner, finishing it with `done` on success.
///
/// On failure the spinner is cleared and the error returned untouched.
pub fn with_spinner<T>(message: &str, done: &str, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = create_spinner(message);
    match work() {
        Ok(value) => {
            finish_with_success(&spinner, done);
            Ok(value)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}
