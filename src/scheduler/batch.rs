//! Per-tick batch composition.

use serde::Serialize;

/// How many of each signal one tick emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    pub traces: u32,
    pub logs: u32,
    pub synthetics: u32,
}

impl BatchPlan {
    /// Split an events-per-second rate 60/30/10, each share floored.
    pub fn for_rate(events_per_second: u32) -> Self {
        let eps = u64::from(events_per_second);
        Self {
            traces: (eps * 6 / 10) as u32,
            logs: (eps * 3 / 10) as u32,
            synthetics: (eps / 10) as u32,
        }
    }

    pub fn total(&self) -> u32 {
        self.traces + self.logs + self.synthetics
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
