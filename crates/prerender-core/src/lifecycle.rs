//! Render lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases of a page render, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// Request received, processing started.
    Start,
    /// Document template read from disk.
    TemplateLoaded,
    /// Every data dependency of the tree resolved.
    PrefetchComplete,
    /// Markup pass finished.
    MarkupComplete,
    /// Final response assembled.
    ResponseReady,
}

impl RenderPhase {
    /// Mark name used in the timing context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::TemplateLoaded => "template_loaded",
            Self::PrefetchComplete => "prefetch_complete",
            Self::MarkupComplete => "markup_complete",
            Self::ResponseReady => "response_ready",
        }
    }
}

impl std::fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Record that a lifecycle phase was reached.
    pub fn mark_phase(&mut self, phase: RenderPhase) {
        self.mark(phase.as_str());
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from request start to a named mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Time from request start to a lifecycle phase.
    pub fn phase(&self, phase: RenderPhase) -> Option<Duration> {
        self.since_start(phase.as_str())
    }

    /// Duration between two recorded phases.
    pub fn between(&self, from: RenderPhase, to: RenderPhase) -> Option<Duration> {
        let from = self.marks.get(from.as_str())?;
        let to = self.marks.get(to.as_str())?;
        Some(to.saturating_duration_since(*from))
    }

    /// All recorded marks as `(name, offset)` pairs, ordered by offset.
    pub fn marks(&self) -> Vec<(String, Duration)> {
        let mut marks: Vec<(String, Duration)> = self
            .marks
            .iter()
            .map(|(name, t)| (name.clone(), t.duration_since(self.start)))
            .collect();
        marks.sort_by_key(|(_, offset)| *offset);
        marks
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}
