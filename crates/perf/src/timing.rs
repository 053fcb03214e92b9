//! Timing utilities

use std::time::{Duration, Instant};

/// Category of operation being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCategory {
    /// Placement and pagination
    Layout,
    /// Symbol encoding and rasterization
    Encode,
    /// Document export
    Export,
    /// Interactive edits
    Edit,
    General,
}

impl TimerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerCategory::Layout => "layout",
            TimerCategory::Encode => "encode",
            TimerCategory::Export => "export",
            TimerCategory::Edit => "edit",
            TimerCategory::General => "general",
        }
    }
}

/// A timer that measures elapsed time from creation to drop.
///
/// With the `telemetry` feature enabled the elapsed time is emitted as a
/// `trace` event on drop.
pub struct PerfTimer {
    name: &'static str,
    category: TimerCategory,
    start: Instant,
}

impl PerfTimer {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::General)
    }

    #[inline]
    pub fn with_category(name: &'static str, category: TimerCategory) -> Self {
        Self {
            name,
            category,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn layout(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Layout)
    }

    #[inline]
    pub fn encode(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Encode)
    }

    #[inline]
    pub fn export(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Export)
    }

    #[inline]
    pub fn edit(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Edit)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn category(&self) -> TimerCategory {
        self.category
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Stop the timer and return the elapsed milliseconds without reporting
    #[inline]
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed_ms();
        std::mem::forget(self);
        elapsed
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        tracing::trace!(
            target: "perf",
            name = self.name,
            category = self.category.as_str(),
            elapsed_ms = self.elapsed_ms(),
            "timer completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_perf_timer_stop() {
        let timer = PerfTimer::export("export_sheet");
        sleep(Duration::from_millis(5));
        let elapsed = timer.stop();
        assert!(elapsed >= 4.0, "elapsed should be at least 4ms, got {}", elapsed);
    }

    #[test]
    fn test_timer_categories() {
        assert_eq!(PerfTimer::layout("a").category(), TimerCategory::Layout);
        assert_eq!(PerfTimer::encode("b").category(), TimerCategory::Encode);
        assert_eq!(PerfTimer::edit("c").category(), TimerCategory::Edit);
        assert_eq!(PerfTimer::new("d").name(), "d");
        assert_eq!(TimerCategory::Export.as_str(), "export");
    }
}
