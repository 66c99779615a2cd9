use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::{Lazy, OnceCell};
use runbake_fetch::{FetchPhase, Progress, ProgressCallback};

const PB_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// Renders source archive download progress.
///
/// The bar only appears once bytes start flowing, so cached runs print
/// nothing.
#[derive(Default)]
pub struct DownloadTracker {
    bar: OnceCell<ProgressBar>,
}

impl DownloadTracker {
    pub fn callback(self: &Arc<Self>) -> ProgressCallback {
        let tracker = Arc::clone(self);
        Arc::new(move |progress: &Progress| tracker.update(progress))
    }

    pub fn update(&self, progress: &Progress) {
        match progress.phase {
            FetchPhase::Connecting if progress.retry_count > 0 => {
                if let Some(pb) = self.bar.get() {
                    pb.reset();
                }
            }
            FetchPhase::Downloading => {
                let pb = self.bar.get_or_init(|| new_bar(progress.total_bytes));
                if let Some(total) = progress.total_bytes {
                    pb.set_length(total);
                }
                pb.set_position(progress.bytes_downloaded);
            }
            FetchPhase::Completed => self.finish(),
            _ => {}
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = self.bar.get() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar.get().map(ProgressBar::position)
    }
}

fn new_bar(len: Option<u64>) -> ProgressBar {
    let pb = match len {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::no_length(),
    };
    if let Some(style) = PB_TEMPLATE.as_ref() {
        pb.set_style(style.clone());
    }
    pb
}
