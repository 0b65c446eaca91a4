use crate::dashboard::error::{Anomaly, AnomalyKind};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const APPLY_WARNING_THRESHOLD: Duration = Duration::from_millis(8);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagnosticsSnapshot {
    pub applies: u64,
    pub last_apply: Option<Duration>,
    pub slowest_apply: Duration,
    pub slow_applies: u64,
    pub last_mutation_count: usize,
    pub anomalies: BTreeMap<AnomalyKind, u64>,
}

impl DiagnosticsSnapshot {
    pub fn anomaly_count(&self, kind: AnomalyKind) -> u64 {
        self.anomalies.get(&kind).copied().unwrap_or(0)
    }
}

/// Counters kept by the snapshot engine.
pub struct Diagnostics {
    applies: u64,
    last_apply: Option<Duration>,
    slowest_apply: Duration,
    slow_applies: u64,
    last_mutation_count: usize,
    anomalies: BTreeMap<AnomalyKind, u64>,
    warning_threshold: Duration,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::new_with_threshold(APPLY_WARNING_THRESHOLD)
    }

    pub fn new_with_threshold(warning_threshold: Duration) -> Self {
        Self {
            applies: 0,
            last_apply: None,
            slowest_apply: Duration::ZERO,
            slow_applies: 0,
            last_mutation_count: 0,
            anomalies: BTreeMap::new(),
            warning_threshold,
        }
    }

    /// Record a finished apply that started at `started`.
    pub fn record_apply(&mut self, started: Instant, mutation_count: usize) {
        let elapsed = started.elapsed();
        self.applies += 1;
        self.last_apply = Some(elapsed);
        self.last_mutation_count = mutation_count;
        if elapsed > self.slowest_apply {
            self.slowest_apply = elapsed;
        }
        if elapsed >= self.warning_threshold {
            self.slow_applies += 1;
            tracing::warn!(
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                mutation_count,
                "slow dashboard apply"
            );
        }
    }

    pub fn record_anomaly(&mut self, anomaly: &Anomaly) {
        *self.anomalies.entry(anomaly.kind()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            applies: self.applies,
            last_apply: self.last_apply,
            slowest_apply: self.slowest_apply,
            slow_applies: self.slow_applies,
            last_mutation_count: self.last_mutation_count,
            anomalies: self.anomalies.clone(),
        }
    }

    pub fn warning_threshold(&self) -> Duration {
        self.warning_threshold
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
