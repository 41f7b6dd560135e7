use crate::facts::Progress;
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Instant;

const BAR_TEMPLATE: &str = "{prefix:>14.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const BAR_TEMPLATE_NO_COLOR: &str = "{prefix:>14} [{bar:25}] {pos}/{len} {msg}";

/// A progress bar per collection phase, shown only once a run has lasted longer than a delay.
pub struct ProgressReporter {
    visible_after: Instant,
    use_colors: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// Nothing is drawn until `delay` has elapsed. When `use_colors` is false the bar is
    /// rendered without ANSI styling.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        Self {
            visible_after: Instant::now() + delay,
            use_colors,
            bar: Mutex::new(None),
        }
    }

    fn reveal_if_due(&self, bar: &ProgressBar) {
        if bar.is_hidden() && Instant::now() >= self.visible_after {
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str, total: u64) {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
        let template = if self.use_colors { BAR_TEMPLATE } else { BAR_TEMPLATE_NO_COLOR };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );
        bar.set_prefix(phase.to_string());
        self.reveal_if_due(&bar);

        let previous = self.bar.lock().expect("lock poisoned").replace(bar);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, item: &str) {
        if let Some(bar) = self.bar.lock().expect("lock poisoned").as_ref() {
            self.reveal_if_due(bar);
            bar.set_message(item.to_string());
            bar.inc(1);
        }
    }

    fn done(&self) {
        if let Some(bar) = self.bar.lock().expect("lock poisoned").take() {
            bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("visible_after", &self.visible_after)
            .field("use_colors", &self.use_colors)
            .field("bar", &self.bar)
            .finish()
    }
}
