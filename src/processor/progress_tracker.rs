use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Coarse run narration: one spinner, one message per phase.
pub struct ProgressTracker {
    pb: ProgressBar,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            start_time: Instant::now(),
        }
    }

    pub fn phase(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    pub fn finish(&self, count: usize) {
        self.pb.finish_with_message(format!(
            "Collected {} reviews in {:.2} seconds",
            count,
            self.start_time.elapsed().as_secs_f32()
        ));
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
