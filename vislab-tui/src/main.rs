//! VisLab TUI entry point: load a series, run the analysis, explore it.

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vislab_core::VisibilityKind;
use vislab_runner::{load_series, run_analysis, AnalysisConfig, LoadOptions};
use vislab_tui::{handle_key, ui, App};

#[derive(Parser)]
#[command(name = "vislab-tui", about = "Interactive visibility-graph explorer")]
struct Args {
    /// CSV file with a closing-price column.
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window length.
    #[arg(long)]
    lookback: Option<usize>,

    /// Visibility criterion: natural or horizontal.
    #[arg(long)]
    kind: Option<VisibilityKind>,

    /// Close column name (auto-detected when omitted).
    #[arg(long)]
    column: Option<String>,

    /// Use a seeded random walk when the file is missing.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Write tracing output to this file (the terminal is taken by the UI).
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_file_logging(path)?;
    }

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(path) = &args.data {
        config.data.path = Some(path.clone());
    }
    if let Some(column) = &args.column {
        config.data.column = Some(column.clone());
    }
    if let Some(lb) = args.lookback {
        config.graph.lookback = lb;
    }
    if let Some(kind) = args.kind {
        config.graph.kind = kind;
    }
    config.validate()?;

    // Load and analyse before touching the terminal so errors print normally.
    let loaded = load_series(&LoadOptions {
        path: config.data.path.clone(),
        csv: config.csv_options()?,
        synthetic: args.synthetic,
        ..Default::default()
    })?;
    let result = run_analysis(&loaded, &config)?;
    info!(symbol = %result.symbol, bars = result.bar_count(), "starting tui");
    let mut app = App::new(result);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop at ~20 FPS.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
