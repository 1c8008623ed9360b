use std::fs;
use std::path::PathBuf;

use super::snapshot::{CpuSnapshot, CpuTimes, LoadAverage, MemorySnapshot, ProcessSnapshot};

/// Best-effort reader of procfs counters. Every sample is a one-shot
/// read: no handles are held across cycles and a vanished or unreadable
/// source degrades to an absent/zero value, never an error. The root is
/// parameterizable so tests can run against fixture trees.
pub struct Sampler {
    proc_root: PathBuf,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Self::at_root("/proc")
    }

    pub fn at_root(root: impl Into<PathBuf>) -> Self {
        Sampler {
            proc_root: root.into(),
        }
    }

    /// Numeric entries of the procfs root. Enumeration order is whatever
    /// the filesystem reports; it is not sorted here.
    pub fn pids(&self) -> Vec<u32> {
        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return Vec::new();
        };
        entries
            .flatten()
            .filter_map(|e| e.file_name().to_str().and_then(|s| s.parse().ok()))
            .collect()
    }

    pub fn sample_cpu(&self) -> CpuSnapshot {
        fs::read_to_string(self.proc_root.join("stat"))
            .ok()
            .and_then(|content| parse_cpu_snapshot(&content))
            .unwrap_or_default()
    }

    /// Reads `<root>/<pid>/stat` and `<root>/<pid>/status`. `None` means
    /// the process could not be fully observed (usually: it exited
    /// between listing and read), which callers treat as routine.
    pub fn sample_process(&self, pid: u32) -> Option<ProcessSnapshot> {
        let dir = self.proc_root.join(pid.to_string());
        let stat = fs::read_to_string(dir.join("stat")).ok()?;

        // The comm field may itself contain parentheses and whitespace,
        // so the name runs from the first '(' to the LAST ')'.
        let open = stat.find('(')?;
        let close = stat.rfind(')')?;
        let name = stat.get(open + 1..close)?.to_string();

        let fields: Vec<&str> = stat.get(close + 1..)?.split_whitespace().collect();
        let state = fields.first()?.chars().next()?;
        let utime: u64 = fields.get(11)?.parse().ok()?;
        let stime: u64 = fields.get(12)?.parse().ok()?;

        let status = fs::read_to_string(dir.join("status")).ok()?;
        let mut uid = None;
        let mut rss_kb = 0;
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("Uid:") {
                uid = rest.split_whitespace().next().and_then(|v| v.parse().ok());
            } else if let Some(rest) = line.strip_prefix("VmRSS:") {
                rss_kb = rest
                    .split_whitespace()
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
            }
        }

        Some(ProcessSnapshot {
            pid,
            name,
            state,
            ticks: utime + stime,
            rss_kb,
            uid: uid?,
        })
    }

    pub fn sample_memory(&self) -> MemorySnapshot {
        let Ok(content) = fs::read_to_string(self.proc_root.join("meminfo")) else {
            return MemorySnapshot::default();
        };
        let mut mem = MemorySnapshot::default();
        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("MemTotal:") {
                mem.total_kb = first_number(rest);
            } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
                mem.available_kb = first_number(rest);
            } else if let Some(rest) = line.strip_prefix("SwapTotal:") {
                mem.swap_total_kb = first_number(rest);
            } else if let Some(rest) = line.strip_prefix("SwapFree:") {
                mem.swap_free_kb = first_number(rest);
            }
        }
        mem
    }

    pub fn sample_uptime(&self) -> f64 {
        fs::read_to_string(self.proc_root.join("uptime"))
            .ok()
            .and_then(|content| {
                content
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(0.0)
    }

    pub fn sample_load_average(&self) -> LoadAverage {
        fs::read_to_string(self.proc_root.join("loadavg"))
            .ok()
            .and_then(|content| {
                let mut parts = content.split_whitespace();
                Some(LoadAverage {
                    one: parts.next()?.parse().ok()?,
                    five: parts.next()?.parse().ok()?,
                    fifteen: parts.next()?.parse().ok()?,
                })
            })
            .unwrap_or_default()
    }
}

/// Parses the cpu block of `/proc/stat`. Any malformed numeric field
/// invalidates the whole snapshot (`None`), so a torn read never leaks a
/// partial core map into the delta computation.
pub fn parse_cpu_snapshot(content: &str) -> Option<CpuSnapshot> {
    let mut snap = CpuSnapshot::default();
    for line in content.lines() {
        if !line.starts_with("cpu") {
            break;
        }
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        let mut values = Vec::with_capacity(10);
        for field in fields {
            values.push(field.parse::<u64>().ok()?);
        }
        if values.len() < 8 {
            return None;
        }
        // Kernel accounting folds guest time into user/nice; subtract it
        // back out before summing so guests are not counted twice.
        if values.len() >= 10 {
            values[0] = values[0].saturating_sub(values[8]);
            values[1] = values[1].saturating_sub(values[9]);
        }
        let times = CpuTimes {
            total: values[..8].iter().sum(),
            idle: values[3] + values[4],
        };
        if name == "cpu" {
            snap.aggregate = times;
        } else {
            let core: u32 = name.strip_prefix("cpu")?.parse().ok()?;
            snap.cores.insert(core, times);
        }
    }
    Some(snap)
}

fn first_number(s: &str) -> u64 {
    s.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
