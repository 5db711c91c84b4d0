use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use lazy_static::lazy_static;
use parking_lot::Mutex;

pub const VOTES_ACCEPTED: &str = "votes_accepted";
pub const VOTES_REJECTED: &str = "votes_rejected";
pub const BLOCKS_MINED: &str = "blocks_mined";
pub const ELECTIONS_CREATED: &str = "elections_created";
pub const CHAIN_VERIFICATIONS: &str = "chain_verifications";
pub const MINING_LAST_ATTEMPTS: &str = "mining_last_attempts";

/// Metrics registry (simple, Prometheus-style)
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    counters: Arc<Mutex<BTreeMap<String, u64>>>,
    gauges: Arc<Mutex<BTreeMap<String, f64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&self, name: &str) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    pub fn set_gauge(&self, name: &str, val: f64) {
        self.gauges.lock().insert(name.to_string(), val);
    }

    pub fn snapshot(&self) -> (BTreeMap<String, u64>, BTreeMap<String, f64>) {
        (self.counters.lock().clone(), self.gauges.lock().clone())
    }

    /// Render in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let (counters, gauges) = self.snapshot();
        let mut out = String::new();
        for (name, v) in counters {
            let _ = writeln!(out, "# TYPE ballotchain_{name} counter");
            let _ = writeln!(out, "ballotchain_{name} {v}");
        }
        for (name, v) in gauges {
            let _ = writeln!(out, "# TYPE ballotchain_{name} gauge");
            let _ = writeln!(out, "ballotchain_{name} {v}");
        }
        out
    }
}

lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_counters_and_gauges() {
        let m = MetricsRegistry::new();
        m.inc_counter(BLOCKS_MINED);
        m.inc_counter(BLOCKS_MINED);
        m.set_gauge(MINING_LAST_ATTEMPTS, 42.0);
        assert_eq!(m.counter(BLOCKS_MINED), 2);
        let text = m.render();
        assert!(text.contains("ballotchain_blocks_mined 2"));
        assert!(text.contains("ballotchain_mining_last_attempts 42"));
    }
}
