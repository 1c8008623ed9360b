use std::collections::BTreeMap;

/// Cumulative scheduler ticks for one core (or the aggregate line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub total: u64,
    pub idle: u64,
}

/// Point-in-time read of the kernel CPU counters. The aggregate entry is
/// kept apart from the per-core map; an unreadable or malformed source
/// yields the default (all-zero, coreless) snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CpuSnapshot {
    pub aggregate: CpuTimes,
    pub cores: BTreeMap<u32, CpuTimes>,
}

/// One process as read from procfs. `name` may contain arbitrary
/// characters, including parentheses and whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub state: char,
    /// utime + stime, in scheduler ticks.
    pub ticks: u64,
    pub rss_kb: u64,
    pub uid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub available_kb: u64,
    pub swap_total_kb: u64,
    pub swap_free_kb: u64,
}

impl MemorySnapshot {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }

    pub fn used_percent(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        (self.used_kb() as f64 / self.total_kb as f64) * 100.0
    }

    pub fn swap_used_kb(&self) -> u64 {
        self.swap_total_kb.saturating_sub(self.swap_free_kb)
    }

    pub fn swap_used_percent(&self) -> f64 {
        if self.swap_total_kb == 0 {
            return 0.0;
        }
        (self.swap_used_kb() as f64 / self.swap_total_kb as f64) * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// A process snapshot plus the percentages derived for the current cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedProcess {
    pub process: ProcessSnapshot,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}
