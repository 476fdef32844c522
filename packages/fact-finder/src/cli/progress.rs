use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::progress::Progress;
use crate::types::records::Warning;

fn bar_template() -> &'static str {
    match console::Term::stderr().size_checked() {
        Some((_, cols)) if cols < 80 => "{wide_bar:.cyan/blue} {percent}% {msg}",
        _ => "{bar:40.cyan/blue} {pos}/{len} {msg}",
    }
}

/// Terminal progress bar for one stage run.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    #[must_use]
    pub fn new(total: usize, message: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Progress for StageProgress {
    fn advance(&self, done: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(done as u64);
    }

    fn warn(&self, warning: &Warning) {
        self.bar
            .println(console::style(format!("  ! {warning}")).yellow().to_string());
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
