use proctop::app::{App, SortKey, sort_processes};
use proctop::config::Config;
use proctop::system::sampler::Sampler;
use proctop::system::snapshot::{DerivedProcess, LoadAverage, MemorySnapshot, ProcessSnapshot};
use proctop::ui;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_row(pid: u32, name: &str, cpu: f64, rss_kb: u64, ticks: u64) -> DerivedProcess {
    DerivedProcess {
        process: ProcessSnapshot {
            pid,
            name: name.to_string(),
            state: 'S',
            ticks,
            rss_kb,
            // Deliberately unmapped so the user column is the decimal
            // fallback on any host.
            uid: 4_294_967_294,
        },
        cpu_percent: cpu,
        mem_percent: (rss_kb as f64 / 1_024_000.0) * 100.0,
    }
}

fn make_app() -> App {
    // Nonexistent root keeps construction hermetic; the view state is
    // filled in by hand below.
    let mut app = App::with_sampler(Config::default(), Sampler::at_root("/nonexistent"));
    app.global_cpu_percent = 42.0;
    app.core_percents = vec![(0, 30.0), (1, 85.0)];
    app.memory = MemorySnapshot {
        total_kb: 1_024_000,
        available_kb: 512_000,
        swap_total_kb: 204_800,
        swap_free_kb: 102_400,
    };
    app.uptime_secs = 90_061.0;
    app.load = LoadAverage {
        one: 0.52,
        five: 0.48,
        fifteen: 0.30,
    };
    app.processes = vec![
        make_row(1, "init", 0.5, 1_000, 10),
        make_row(4242, "payload-service", 66.0, 51_200, 6_100),
    ];
    sort_processes(&mut app.processes, app.sort_key);
    app
}

#[test]
fn degenerate_terminal_shows_only_the_advisory() {
    let mut app = make_app();
    let out = render_to_string(20, 5, |frame| ui::draw(frame, &mut app));
    assert!(out.contains("Terminal too small!"));
    assert!(!out.contains("PID"));
    // No process rows means no paging either.
    assert_eq!(app.row_budget(), 0);
}

#[test]
fn dashboard_renders_every_region() {
    let mut app = make_app();
    let out = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));

    assert!(out.contains("AVG"));
    assert!(out.contains("CPU0"));
    assert!(out.contains("CPU1"));
    assert!(out.contains("Uptime: 1d 01:01:01"));
    assert!(out.contains("Load: 0.52 0.48 0.30"));
    // Values are right-aligned to a shared width across both rows.
    assert!(out.contains("Mem:  500.0M/1000.0M"));
    assert!(out.contains("Swp:  100.0M/ 200.0M"));
    assert!(out.contains("PID"));
    assert!(out.contains("USER"));
    assert!(out.contains("NAME"));
    assert!(out.contains("payload-service"));
    assert!(out.contains("4294967294"));
    assert!(out.contains("1:01"));
    assert!(out.contains("Tasks: 2 | Sort: cpu"));
    assert!(out.contains("q=Quit"));
}

#[test]
fn sort_marker_follows_the_active_column() {
    let mut app = make_app();
    let out = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));
    assert!(out.contains("%CPU\u{25be}"));
    assert!(!out.contains("%MEM\u{25be}"));

    app.sort_key = SortKey::Mem;
    let out = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));
    assert!(out.contains("%MEM\u{25be}"));
    assert!(!out.contains("%CPU\u{25be}"));
}

#[test]
fn cpu_sort_puts_the_hot_process_first() {
    let mut app = make_app();
    let out = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));
    let hot = out.find("payload-service").unwrap();
    let idle = out.find("init").unwrap();
    assert!(hot < idle);
}

#[test]
fn row_budget_tracks_the_table_region() {
    let mut app = make_app();
    let _ = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));
    // 24 rows minus summary (5), header (3), footer (2).
    assert_eq!(app.row_budget(), 14);
}

#[test]
fn scrolled_view_hides_earlier_rows() {
    let mut app = make_app();
    app.processes = (0..30)
        .map(|i| make_row(i, &format!("proc{i}"), 0.0, 0, 0))
        .collect();
    sort_processes(&mut app.processes, SortKey::Pid);
    app.sort_key = SortKey::Pid;
    app.scroll_offset = 20;
    let out = render_to_string(80, 24, |frame| ui::draw(frame, &mut app));
    assert!(!out.contains("proc19 "));
    assert!(out.contains("proc20"));
    assert!(out.contains("proc29"));
}
