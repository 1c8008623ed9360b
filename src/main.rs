use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use proctop::app::App;
use proctop::config::{self, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::ui;

#[derive(Parser)]
#[command(name = "proctop", about = "Terminal dashboard over Linux procfs")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Initial sort column: cpu, mem, pid, time
    #[arg(long)]
    sort: Option<String>,

    /// Run headless performance capture without interactive terminal.
    #[arg(long, default_value_t = false)]
    perf_capture: bool,

    /// Number of capture iterations for perf mode.
    #[arg(long, default_value_t = 120)]
    perf_iterations: usize,

    /// Headless terminal width for perf mode.
    #[arg(long, default_value_t = 160)]
    perf_width: u16,

    /// Headless terminal height for perf mode.
    #[arg(long, default_value_t = 50)]
    perf_height: u16,

    /// Perf tracing output file (JSON lines).
    #[arg(long, default_value = "target/perf/perf_spans.jsonl")]
    perf_output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if cli.perf_capture {
        return run_perf_capture(config, &cli);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: config::Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(config);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    app.refresh_data();
                    should_draw = true;
                }
                Event::Resize => {
                    // Flush stale cells so the next draw repaints everything.
                    terminal.clear()?;
                    should_draw = true;
                }
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &mut app))?;
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }

    config
}

fn run_perf_capture(config: config::Config, cli: &Cli) -> Result<()> {
    #[cfg(not(feature = "perf-tracing"))]
    {
        let _ = (config, cli);
        Err(eyre!(
            "--perf-capture requires the `perf-tracing` feature; run with `cargo run --features perf-tracing -- --perf-capture`"
        ))
    }

    #[cfg(feature = "perf-tracing")]
    {
        if cli.perf_iterations == 0 {
            return Err(eyre!("--perf-iterations must be greater than 0"));
        }
        if cli.perf_width == 0 || cli.perf_height == 0 {
            return Err(eyre!(
                "--perf-width and --perf-height must be greater than 0"
            ));
        }

        if cli.perf_output.exists() {
            std::fs::remove_file(&cli.perf_output)?;
        }
        proctop::perf::init_tracing_json(&cli.perf_output)?;

        let mut app = App::new(config);
        let backend = ratatui::backend::TestBackend::new(cli.perf_width, cli.perf_height);
        let mut terminal = ratatui::Terminal::new(backend)?;
        let mut process_counts = Vec::with_capacity(cli.perf_iterations);

        for _ in 0..cli.perf_iterations {
            app.refresh_data();
            process_counts.push(app.processes.len());
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }

        proctop::perf::write_capture_summary(
            &cli.perf_output,
            cli.perf_iterations,
            cli.perf_width,
            cli.perf_height,
            &process_counts,
        )?;

        println!("Perf capture written:");
        println!(" - docs/perf_capture.json");
        println!(" - {}", cli.perf_output.display());
        Ok(())
    }
}
