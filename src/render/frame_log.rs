use std::collections::VecDeque;

/// Span of frame times, in milliseconds, after which a frame rate is reported.
pub const REPORT_INTERVAL_MS: f64 = 1000.0;

/// Hard cap on retained frame times, for clocks that stall.
pub const MAX_FRAME_TIMES: usize = 1024;

/// Frame-time collector behind the renderer's fps logging.
///
/// A disabled log never stores anything. An enabled log reports once its samples span
/// [`REPORT_INTERVAL_MS`] and then keeps only the latest timestamp.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    enabled: bool,
    times: VecDeque<f64>,
    last_fps: Option<f64>,
}

impl FrameLog {
    /// Create a log; `enabled = false` makes every [`record`](Self::record) a no-op.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            times: VecDeque::new(),
            last_fps: None,
        }
    }

    /// Whether frame times are collected.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Collected frame times since the last report, oldest first.
    pub fn times(&self) -> &VecDeque<f64> {
        &self.times
    }

    /// Most recently reported frame rate.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    /// Record a frame completed at `now_ms`. Returns the frame rate when one is reported.
    pub fn record(&mut self, now_ms: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }

        if self.times.len() >= MAX_FRAME_TIMES {
            self.times.pop_front();
        }
        self.times.push_back(now_ms);

        let span = self.times.front().map_or(0.0, |first| now_ms - first);
        if self.times.len() < 2 || span < REPORT_INTERVAL_MS {
            return None;
        }

        let fps = (self.times.len() - 1) as f64 * 1000.0 / span;
        tracing::info!(fps = fps, frames = self.times.len() - 1, span_ms = span, "frame rate");
        self.last_fps = Some(fps);
        self.times.clear();
        self.times.push_back(now_ms);
        Some(fps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_log.rs"]
mod tests;
