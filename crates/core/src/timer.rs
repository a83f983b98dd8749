use std::time::Instant;

/// Scoped measurement utility. Construct at the start of a phase, call `stop()` when it ends;
/// logs the elapsed duration under the given title.
pub struct Timer {
    title: String,
    start: Instant,
}

impl Timer {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        tracing::debug!(%title, "timer started");
        Timer {
            title,
            start: Instant::now(),
        }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    pub fn stop(&self) {
        let elapsed = self.start.elapsed();
        tracing::info!(title = %self.title, seconds = elapsed.as_secs_f64(), "{}: {:.3}s", self.title, elapsed.as_secs_f64());
    }
}
