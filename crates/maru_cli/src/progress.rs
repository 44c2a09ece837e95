use indicatif::{ProgressBar, ProgressStyle};
use maru_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Instant;

/// Draws one progress bar per download.
pub struct ConsoleReporter {
    pb: Mutex<Option<ProgressBar>>,
    started: Mutex<Option<Instant>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            pb: Mutex::new(None),
            started: Mutex::new(None),
        }
    }

    fn style(sized: bool) -> ProgressStyle {
        let template = if sized {
            "{spinner:.green} {msg} [{elapsed_precise}<{eta_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec}"
        } else {
            "{spinner:.green} {msg} [{elapsed_precise}] {bytes} {bytes_per_sec}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .progress_chars("#>-")
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_start(&self, name: &str, total: Option<u64>) {
        let pb = match total {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(Self::style(total.is_some()));
        pb.set_message(name.to_string());
        if let Ok(mut slot) = self.pb.lock() {
            if let Some(old) = slot.replace(pb) {
                old.finish_and_clear();
            }
        }
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
    }

    fn on_progress(&self, _name: &str, current: u64, _total: Option<u64>) {
        if let Ok(slot) = self.pb.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_position(current);
        }
    }

    fn on_complete(&self, name: &str, total: u64) {
        let elapsed = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|s| s.elapsed().as_secs_f64().max(1e-6));
        let summary = match elapsed {
            Some(secs) => format!(
                "{} done ({:.2} MiB/s)",
                name,
                total as f64 / secs / (1024.0 * 1024.0)
            ),
            None => format!("{} done", name),
        };
        if let Ok(mut slot) = self.pb.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(summary);
        }
    }
}
