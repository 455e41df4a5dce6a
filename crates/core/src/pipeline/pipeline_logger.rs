use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting observer for capture loop events.
///
/// Keeps the loop free of any particular output mechanism; the CLI logs
/// through the `log` crate while tests discard everything.
pub trait PipelineLogger {
    /// Called once per processed frame with the running count.
    fn frame_done(&mut self, processed: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces found in a frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-loop summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame_done(&mut self, _processed: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count and sum for one stage or metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStat {
    pub count: usize,
    pub total: f64,
}

impl RunningStat {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Logger that aggregates per-stage timing and metrics and reports a
/// summary when the loop ends.
///
/// Only running totals are kept, so memory stays flat however long a live
/// camera runs. Progress lines are throttled to every `throttle_frames`
/// frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, RunningStat>,
    metrics: HashMap<String, RunningStat>,
    start_time: Instant,
    total_frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Capture summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, stat) in stages {
            let total_ms = stat.total;
            let avg_ms = stat.mean();
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, stat) in metrics {
            lines.push(format!("  {name}: avg {:.1}", stat.mean()));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timing_stat(&self, stage: &str) -> Option<RunningStat> {
        self.timings.get(stage).copied()
    }

    pub fn metric_stat(&self, name: &str) -> Option<RunningStat> {
        self.metrics.get(name).copied()
    }
}

/// Looks up by `&str` first so steady-state frames allocate nothing.
fn record(stats: &mut HashMap<String, RunningStat>, key: &str, value: f64) {
    match stats.get_mut(key) {
        Some(stat) => stat.record(value),
        None => stats.entry(key.to_string()).or_default().record(value),
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame_done(&mut self, processed: usize) {
        self.total_frames = processed;
        if processed % self.throttle_frames == 0 {
            log::info!("Processed {processed} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
