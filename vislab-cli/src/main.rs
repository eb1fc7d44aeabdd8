//! VisLab CLI: visibility-graph analysis of a closing-price series.
//!
//! Commands:
//! - `backtest`: path lengths, signals and profit factors, with artifacts
//! - `adjacency`: adjacency matrix and visibility plot of a short slice
//! - `extremes`: windows with the highest and lowest statistic
//! - `sweep`: profit factors over a range of lookbacks

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use vislab_core::graph::average_shortest_path_length;
use vislab_core::{Direction, PathLengthCalculator, VisibilityGraph, VisibilityKind};
use vislab_runner::plot::{
    render_heatmap_svg, render_overlay_svg, render_visibility_svg, HeatmapStyle, LineMode,
    PlotOptions, VisibilityPlot,
};
use vislab_runner::{
    find_extremes, load_series, run_analysis, save_artifacts, write_svg, AnalysisConfig,
    AnalysisResult, ExportOptions, ExtremeWindow, LoadOptions, LoadedSeries, LookbackSweep,
};

#[derive(Parser)]
#[command(
    name = "vislab",
    about = "VisLab CLI: visibility-graph path-length signals for FX series"
)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a series.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// CSV file with a closing-price column.
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Close column name (auto-detected when omitted).
    #[arg(long)]
    column: Option<String>,

    /// Use a seeded random walk when the file is missing.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute path lengths and backtest the long, short and combined legs.
    Backtest {
        #[command(flatten)]
        data: DataArgs,

        /// Window length.
        #[arg(long)]
        lookback: Option<usize>,

        /// Visibility criterion: natural or horizontal.
        #[arg(long)]
        kind: Option<VisibilityKind>,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also write series.parquet.
        #[arg(long, default_value_t = false)]
        parquet: bool,

        /// Skip SVG plots.
        #[arg(long, default_value_t = false)]
        no_plots: bool,
    },
    /// Print the adjacency matrix of the first closes and plot it.
    Adjacency {
        #[command(flatten)]
        data: DataArgs,

        /// Number of closes to use.
        #[arg(long, default_value_t = 90)]
        limit: usize,

        /// Use the negated series.
        #[arg(long, default_value_t = false)]
        negate: bool,

        /// Visibility criterion: natural or horizontal.
        #[arg(long, default_value = "natural")]
        kind: VisibilityKind,

        /// Draw horizontal lines at both endpoint heights instead of diagonals.
        #[arg(long, default_value_t = false)]
        horizontal_lines: bool,

        /// Place points at their timestamps instead of their index.
        #[arg(long, default_value_t = false)]
        time_positions: bool,

        /// SVG output path.
        #[arg(long, default_value = "visibility.svg")]
        svg: PathBuf,
    },
    /// Find and plot the windows with the highest and lowest statistic.
    Extremes {
        #[command(flatten)]
        data: DataArgs,

        /// Window length.
        #[arg(long)]
        lookback: Option<usize>,

        /// Output directory for the SVG plots.
        #[arg(long, default_value = "plots")]
        output_dir: PathBuf,
    },
    /// Profit factors for every lookback in a range.
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        /// Smallest lookback.
        #[arg(long)]
        min: Option<usize>,

        /// Largest lookback.
        #[arg(long)]
        max: Option<usize>,

        /// Visibility criterion: natural or horizontal.
        #[arg(long)]
        kind: Option<VisibilityKind>,

        /// Evaluate lookbacks one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Output directory for heatmap.svg and sweep.csv.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Backtest {
            data,
            lookback,
            kind,
            output_dir,
            parquet,
            no_plots,
        } => run_backtest_cmd(&data, lookback, kind, output_dir, parquet, no_plots),
        Commands::Adjacency {
            data,
            limit,
            negate,
            kind,
            horizontal_lines,
            time_positions,
            svg,
        } => run_adjacency_cmd(
            &data,
            limit,
            negate,
            kind,
            horizontal_lines,
            time_positions,
            &svg,
        ),
        Commands::Extremes {
            data,
            lookback,
            output_dir,
        } => run_extremes_cmd(&data, lookback, &output_dir),
        Commands::Sweep {
            data,
            min,
            max,
            kind,
            sequential,
            output_dir,
        } => run_sweep_cmd(&data, min, max, kind, sequential, output_dir),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &DataArgs) -> Result<AnalysisConfig> {
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
    Ok(config)
}

fn load(config: &AnalysisConfig, synthetic: bool) -> Result<LoadedSeries> {
    let opts = LoadOptions {
        path: config.data.path.clone(),
        csv: config.csv_options()?,
        synthetic,
        ..Default::default()
    };
    Ok(load_series(&opts)?)
}

fn run_backtest_cmd(
    args: &DataArgs,
    lookback: Option<usize>,
    kind: Option<VisibilityKind>,
    output_dir: Option<PathBuf>,
    parquet: bool,
    no_plots: bool,
) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(lb) = lookback {
        config.graph.lookback = lb;
    }
    if let Some(kind) = kind {
        config.graph.kind = kind;
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    config.output.parquet |= parquet;
    config.output.plots &= !no_plots;
    config.validate()?;

    let loaded = load(&config, args.synthetic)?;
    let result = run_analysis(&loaded, &config)?;
    print_summary(&result);

    let run_dir = save_artifacts(
        &result,
        &config.output.dir,
        ExportOptions {
            parquet: config.output.parquet,
            plots: config.output.plots,
        },
    )?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn run_adjacency_cmd(
    args: &DataArgs,
    limit: usize,
    negate: bool,
    kind: VisibilityKind,
    horizontal_lines: bool,
    time_positions: bool,
    svg_path: &Path,
) -> Result<()> {
    let mut config = load_config(args)?;
    config.data.limit = Some(limit);
    config.validate()?;
    let loaded = load(&config, args.synthetic)?;

    let direction = if negate {
        Direction::Negative
    } else {
        Direction::Positive
    };
    // The plot shows the oriented values so lines of sight join the points
    // they were computed from.
    let values = direction.orient(&loaded.series.closes);
    let times = if time_positions {
        Some(
            loaded
                .series
                .time_positions()
                .context("--time-positions needs a data file with timestamps")?,
        )
    } else {
        None
    };
    let graph = VisibilityGraph::build_at(kind, &values, times.as_deref())?;
    let matrix = graph.adjacency_matrix();

    println!("{matrix}");
    println!();
    println!("Nodes:          {}", graph.node_count());
    println!("Edges:          {}", graph.edge_count());
    if let Some(max_degree) = graph.degrees().into_iter().max() {
        println!("Max degree:     {max_degree}");
    }
    match average_shortest_path_length(&graph) {
        Some(avg) => println!("Avg Path:       {avg:.6}"),
        None => println!("Avg Path:       undefined (disconnected)"),
    }

    let mode = if horizontal_lines {
        LineMode::Horizontal
    } else {
        LineMode::Diagonal
    };
    let plot = VisibilityPlot::new(&matrix, &values, times.as_deref(), mode)?;
    let title = format!(
        "{} {} visibility ({}, {} closes)",
        loaded.series.symbol,
        kind.label(),
        direction.label(),
        values.len()
    );
    write_svg(svg_path, &render_visibility_svg(&plot, &PlotOptions::titled(title)))?;
    println!("Plot saved to: {}", svg_path.display());
    Ok(())
}

fn run_extremes_cmd(args: &DataArgs, lookback: Option<usize>, output_dir: &Path) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(lb) = lookback {
        config.graph.lookback = lb;
    }
    config.validate()?;
    let loaded = load(&config, args.synthetic)?;
    let closes = &loaded.series.closes;
    let symbol = &loaded.series.symbol;

    let pl = PathLengthCalculator::new(config.graph.lookback)?
        .with_kind(config.graph.kind)
        .with_parallelism(config.graph.parallel)
        .compute(closes)?;
    let extremes = find_extremes(&pl.positive, pl.lookback, closes)
        .context("series is shorter than the lookback: no complete window")?;

    for (label, window) in [("max", &extremes.max), ("min", &extremes.min)] {
        print_extreme(label, window);
        let plot = VisibilityPlot::from_values(config.graph.kind, &window.closes, LineMode::Diagonal);
        let title = format!(
            "{symbol} {label} path length {:.4} (bars {}..={})",
            window.value, window.start, window.index
        );
        let path = output_dir.join(format!("{label}_window.svg"));
        write_svg(&path, &render_visibility_svg(&plot, &PlotOptions::titled(title)))?;
    }

    let overlay = render_overlay_svg(
        closes,
        &pl.positive,
        &pl.negative,
        &PlotOptions::titled(format!("{symbol} log close vs path length")),
    );
    write_svg(&output_dir.join("overlay.svg"), &overlay)?;
    println!("Plots saved to: {}", output_dir.display());
    Ok(())
}

fn run_sweep_cmd(
    args: &DataArgs,
    min: Option<usize>,
    max: Option<usize>,
    kind: Option<VisibilityKind>,
    sequential: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(min) = min {
        config.sweep.min_lookback = min;
    }
    if let Some(max) = max {
        config.sweep.max_lookback = max;
    }
    if let Some(kind) = kind {
        config.graph.kind = kind;
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    config.validate()?;
    let loaded = load(&config, args.synthetic)?;

    let result = LookbackSweep::new(config.sweep.min_lookback..=config.sweep.max_lookback)
        .with_kind(config.graph.kind)
        .with_parallelism(!sequential)
        .run(&loaded.series.symbol, &loaded.series.closes)?;

    println!();
    print!("{}", result.format_table());
    if let Some(best) = result.best(vislab_core::signals::Leg::Combined) {
        println!();
        println!(
            "Best combined PF {:.4} at lookback {}",
            best.combined_pf, best.lookback
        );
    }

    let dir = &config.output.dir;
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    std::fs::write(dir.join("sweep.csv"), result.to_csv()?)?;
    write_svg(
        &dir.join("heatmap.svg"),
        &render_heatmap_svg(&result.heatmap(), &HeatmapStyle::default()),
    )?;
    info!(points = result.len(), "sweep written");
    println!("Sweep saved to: {}", dir.display());
    Ok(())
}

fn fmt_pf(pf: f64) -> String {
    if pf.is_infinite() {
        "inf".to_string()
    } else {
        format!("{pf:.4}")
    }
}

fn print_extreme(label: &str, window: &ExtremeWindow) {
    println!(
        "{label:<4} path length {:.6} at bar {} (window {}..={})",
        window.value, window.index, window.start, window.index
    );
}

fn print_summary(result: &AnalysisResult) {
    let rep = &result.report;
    println!();
    println!("=== Visibility Graph Backtest ===");
    println!("Symbol:         {}", result.symbol);
    if let Some(ts) = &result.timestamps {
        if let (Some(first), Some(last)) = (ts.first(), ts.last()) {
            println!("Period:         {first} to {last}");
        }
    }
    println!(
        "Bars:           {} ({} warmup)",
        result.bar_count(),
        result.warmup_bars()
    );
    println!(
        "Graph:          {} (lookback {})",
        result.path_lengths.kind.label(),
        result.lookback()
    );
    println!(
        "Exposure:       {} long / {} short / {} flat",
        rep.exposure.long_bars, rep.exposure.short_bars, rep.exposure.flat_bars
    );
    println!();
    println!("Long PF:        {}", fmt_pf(rep.long.profit_factor));
    println!("Short PF:       {}", fmt_pf(rep.short.profit_factor));
    println!("Combined PF:    {}", fmt_pf(rep.combined.profit_factor));
    if result.synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
