use std::collections::HashMap;

use super::snapshot::{CpuTimes, DerivedProcess, ProcessSnapshot};

/// pid -> cumulative ticks, as observed in one cycle.
pub type TickMap = HashMap<u32, u64>;

/// CPU usage percentage between two snapshots of the same counter.
/// A non-positive total delta (equal snapshots, counter reset, first
/// sample) reads as 0.
pub fn cpu_percent(curr: CpuTimes, prev: CpuTimes) -> f64 {
    let total_delta = curr.total as i64 - prev.total as i64;
    if total_delta <= 0 {
        return 0.0;
    }
    let idle_delta = curr.idle as i64 - prev.idle as i64;
    ((total_delta - idle_delta) as f64 / total_delta as f64) * 100.0
}

/// Per-process CPU percentage for one cycle. Every row in a cycle is
/// normalized by the same aggregate total delta, scaled by the logical
/// core count. The result can legitimately exceed 100 for a process
/// using more than one core's worth of time; it is not clamped here.
pub fn process_cpu_percent(ticks_delta: u64, aggregate_total_delta: u64, logical_cores: usize) -> f64 {
    let denom = aggregate_total_delta.max(1) as f64;
    (ticks_delta as f64 / denom) * 100.0 * logical_cores as f64
}

/// Pairs the current process snapshots with the previous cycle's tick
/// map and returns the derived rows plus the replacement tick map. A
/// pid with no previous entry derives cpu_percent = 0 for exactly this
/// cycle.
pub fn derive(
    procs: Vec<ProcessSnapshot>,
    prev_ticks: &TickMap,
    aggregate_total_delta: u64,
    logical_cores: usize,
    mem_total_kb: u64,
) -> (Vec<DerivedProcess>, TickMap) {
    let mut next_ticks = TickMap::with_capacity(procs.len());
    let mut derived = Vec::with_capacity(procs.len());
    for process in procs {
        next_ticks.insert(process.pid, process.ticks);
        let cpu_percent = match prev_ticks.get(&process.pid) {
            Some(&prev) => process_cpu_percent(
                process.ticks.saturating_sub(prev),
                aggregate_total_delta,
                logical_cores,
            ),
            None => 0.0,
        };
        let mem_percent = if mem_total_kb > 0 {
            (process.rss_kb as f64 / mem_total_kb as f64) * 100.0
        } else {
            0.0
        };
        derived.push(DerivedProcess {
            process,
            cpu_percent,
            mem_percent,
        });
    }
    (derived, next_ticks)
}
