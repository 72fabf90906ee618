use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};
use crate::ui::{theme, Icons};

fn is_term() -> bool {
    console::Term::stdout().is_term()
}

/// Progress bar over a list of ids, hidden when stdout is not a terminal
pub struct ListingProgress {
    pb: ProgressBar,
    started: Instant,
}

impl ListingProgress {
    pub fn new(total: usize, label: &str) -> Self {
        let pb = if is_term() {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len}") {
            pb.set_style(style.progress_chars("=> "));
        }
        pb.set_message(label.to_string());
        Self { pb, started: Instant::now() }
    }

    pub fn inc(&self, current: &str) {
        self.pb.set_message(current.to_string());
        self.pb.inc(1);
    }

    pub fn finish(&self, count: usize) {
        self.pb.finish_and_clear();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("{} entries in {}", count, HumanDuration(self.started.elapsed())).style(theme().success.clone())
        );
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        if is_term() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
