use std::cmp::Ordering;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, ScrollStep};
use crate::config::{Config, parse_key};
use crate::system::delta::{self, TickMap};
use crate::system::sampler::Sampler;
use crate::system::snapshot::{CpuSnapshot, DerivedProcess, LoadAverage, MemorySnapshot};
use crate::system::users::IdentityCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Mem,
    Pid,
    Time,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "cpu",
            SortKey::Mem => "mem",
            SortKey::Pid => "pid",
            SortKey::Time => "time",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mem" => SortKey::Mem,
            "pid" => SortKey::Pid,
            "time" => SortKey::Time,
            _ => SortKey::Cpu,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub sort_cpu: KeyCode,
    pub sort_mem: KeyCode,
    pub sort_pid: KeyCode,
    pub sort_time: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            sort_cpu: parse_key(&kb.sort_cpu).unwrap_or(KeyCode::Char('c')),
            sort_mem: parse_key(&kb.sort_mem).unwrap_or(KeyCode::Char('m')),
            sort_pid: parse_key(&kb.sort_pid).unwrap_or(KeyCode::Char('p')),
            sort_time: parse_key(&kb.sort_time).unwrap_or(KeyCode::Char('t')),
        }
    }

    pub fn quit_label(&self) -> String {
        match self.quit {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            _ => "?".to_string(),
        }
    }
}

/// Application state: the view model (sort key, scroll offset) plus the
/// previous-cycle CPU snapshot and tick map that the refresh cycle
/// replaces wholesale. Nothing here is shared: one instance, one thread.
pub struct App {
    pub running: bool,
    pub sort_key: SortKey,
    pub scroll_offset: usize,
    /// Derived rows for the current cycle, already sorted.
    pub processes: Vec<DerivedProcess>,
    pub global_cpu_percent: f64,
    /// (core id, usage percent) sorted by core id.
    pub core_percents: Vec<(u32, f64)>,
    pub memory: MemorySnapshot,
    pub uptime_secs: f64,
    pub load: LoadAverage,
    pub users: IdentityCache,
    pub logical_cores: usize,
    pub keybinds: ResolvedKeybinds,
    sampler: Sampler,
    prev_cpu: CpuSnapshot,
    prev_ticks: TickMap,
    /// Process-row budget of the last render; doubles as the page size.
    row_budget: usize,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_sampler(config, Sampler::new())
    }

    pub fn with_sampler(config: Config, sampler: Sampler) -> Self {
        let logical_cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut app = App {
            running: true,
            sort_key: SortKey::from_str_config(&config.general.default_sort),
            scroll_offset: 0,
            processes: Vec::new(),
            global_cpu_percent: 0.0,
            core_percents: Vec::new(),
            memory: MemorySnapshot::default(),
            uptime_secs: 0.0,
            load: LoadAverage::default(),
            users: IdentityCache::new(),
            logical_cores,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            sampler,
            prev_cpu: CpuSnapshot::default(),
            prev_ticks: TickMap::new(),
            row_budget: 0,
        };
        // Seed the previous snapshot so the first displayed cycle computes
        // deltas over a real interval instead of the whole uptime.
        app.prev_cpu = app.sampler.sample_cpu();
        app.refresh_data();
        app
    }

    /// One sample -> derive -> sort cycle. The previous snapshot and tick
    /// map are replaced wholesale at the end.
    pub fn refresh_data(&mut self) {
        #[cfg(feature = "perf-tracing")]
        let _span = tracing::debug_span!("app.refresh_data").entered();

        let curr_cpu = self.sampler.sample_cpu();
        self.global_cpu_percent = delta::cpu_percent(curr_cpu.aggregate, self.prev_cpu.aggregate);
        self.core_percents = curr_cpu
            .cores
            .iter()
            .map(|(&id, &times)| {
                let prev = self.prev_cpu.cores.get(&id).copied().unwrap_or_default();
                (id, delta::cpu_percent(times, prev))
            })
            .collect();

        self.memory = self.sampler.sample_memory();
        self.uptime_secs = self.sampler.sample_uptime();
        self.load = self.sampler.sample_load_average();

        let aggregate_total_delta = curr_cpu
            .aggregate
            .total
            .saturating_sub(self.prev_cpu.aggregate.total);
        let sampled: Vec<_> = self
            .sampler
            .pids()
            .into_iter()
            .filter_map(|pid| self.sampler.sample_process(pid))
            .collect();
        let (mut derived, next_ticks) = delta::derive(
            sampled,
            &self.prev_ticks,
            aggregate_total_delta,
            self.logical_cores,
            self.memory.total_kb,
        );
        sort_processes(&mut derived, self.sort_key);
        self.processes = derived;

        self.prev_cpu = curr_cpu;
        self.prev_ticks = next_ticks;
        self.clamp_scroll();
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        // Navigation keys are hardwired (not configurable)
        match key.code {
            KeyCode::Up => return Action::Scroll(ScrollStep::LineUp),
            KeyCode::Down => return Action::Scroll(ScrollStep::LineDown),
            KeyCode::PageUp => return Action::Scroll(ScrollStep::PageUp),
            KeyCode::PageDown => return Action::Scroll(ScrollStep::PageDown),
            KeyCode::Home => return Action::Scroll(ScrollStep::Home),
            KeyCode::End => return Action::Scroll(ScrollStep::End),
            _ => {}
        }

        let kb = &self.keybinds;
        if key.code == kb.quit {
            return Action::Quit;
        }
        if key.code == kb.sort_cpu {
            return Action::SortBy(SortKey::Cpu);
        }
        if key.code == kb.sort_mem {
            return Action::SortBy(SortKey::Mem);
        }
        if key.code == kb.sort_pid {
            return Action::SortBy(SortKey::Pid);
        }
        if key.code == kb.sort_time {
            return Action::SortBy(SortKey::Time);
        }

        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SortBy(key) => {
                self.sort_key = key;
                self.scroll_offset = 0;
                sort_processes(&mut self.processes, key);
            }
            Action::Scroll(step) => self.scroll(step),
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }

    fn scroll(&mut self, step: ScrollStep) {
        let page = self.row_budget.max(1);
        let max = self.processes.len().saturating_sub(1);
        self.scroll_offset = match step {
            ScrollStep::LineUp => self.scroll_offset.saturating_sub(1),
            ScrollStep::LineDown => self.scroll_offset.saturating_add(1),
            ScrollStep::PageUp => self.scroll_offset.saturating_sub(page),
            ScrollStep::PageDown => self.scroll_offset.saturating_add(page),
            ScrollStep::Home => 0,
            ScrollStep::End => max,
        }
        .min(max);
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self
            .scroll_offset
            .min(self.processes.len().saturating_sub(1));
    }

    /// Recorded by the renderer each draw; resize changes this, never the
    /// view state itself.
    pub fn set_row_budget(&mut self, budget: usize) {
        self.row_budget = budget;
    }

    pub fn row_budget(&self) -> usize {
        self.row_budget
    }

    pub fn visible_processes(&self) -> &[DerivedProcess] {
        let start = self.scroll_offset.min(self.processes.len());
        let end = (start + self.row_budget).min(self.processes.len());
        &self.processes[start..end]
    }
}

/// Sort is stable, so ties keep the underlying enumeration order (which
/// itself is whatever the procfs directory walk produced).
pub fn sort_processes(procs: &mut [DerivedProcess], key: SortKey) {
    match key {
        SortKey::Cpu => procs.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Mem => procs.sort_by(|a, b| b.process.rss_kb.cmp(&a.process.rss_kb)),
        SortKey::Pid => procs.sort_by(|a, b| a.process.pid.cmp(&b.process.pid)),
        SortKey::Time => procs.sort_by(|a, b| b.process.ticks.cmp(&a.process.ticks)),
    }
}
