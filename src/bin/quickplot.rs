use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quickplot::models::DEFAULT_SIZE;
use quickplot::{DataFrame, Output, PlotRequest, StyleOptions, StyleValue, ThemeName, quickplot};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quickplot",
    version,
    about = "Render scatter, line, bar and histogram charts from CSV files"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a chart from a CSV file (SVG to stdout unless --out is given).
    Plot(PlotArgs),
    /// Print a theme's configuration overrides as JSON.
    Theme {
        /// modern, dark or pastel (anything else resolves to modern)
        name: String,
    },
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// CSV file with a header row.
    csv: PathBuf,
    /// Column for the x axis (the values for hist).
    #[arg(long)]
    x: Option<String>,
    /// Column for the y axis.
    #[arg(long)]
    y: Option<String>,
    /// scatter, line, bar or hist.
    #[arg(short, long, default_value = "scatter")]
    kind: String,
    /// modern, dark or pastel.
    #[arg(short, long, default_value = "modern")]
    theme: String,
    /// Rendering backend; only "plotters" exists.
    #[arg(long, default_value = "plotters")]
    backend: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    xlabel: Option<String>,
    #[arg(long)]
    ylabel: Option<String>,
    /// Never draw a legend.
    #[arg(long, default_value_t = false)]
    no_legend: bool,
    /// Leave gridlines off.
    #[arg(long, default_value_t = false)]
    no_grid: bool,
    /// Style option passed to the draw call, e.g. --opt label="Series A" --opt bins=20
    #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_opt)]
    opts: Vec<(String, StyleValue)>,
    /// Write the chart here (.svg or .png) instead of printing SVG.
    #[arg(short, long)]
    out: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_SIZE.0)]
    width: u32,
    #[arg(long, default_value_t = DEFAULT_SIZE.1)]
    height: u32,
}

fn parse_opt(s: &str) -> std::result::Result<(String, StyleValue), String> {
    StyleOptions::parse_pair(s).ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
        Command::Theme { name } => cmd_theme(&name),
    }
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let df = DataFrame::from_csv_path(&args.csv)
        .with_context(|| format!("reading {}", args.csv.display()))?;

    let mut req = PlotRequest::new(args.kind)
        .theme(args.theme)
        .backend(args.backend)
        .legend(!args.no_legend)
        .grid(!args.no_grid)
        .size(args.width, args.height);
    req.x = args.x;
    req.y = args.y;
    req.title = args.title;
    req.xlabel = args.xlabel;
    req.ylabel = args.ylabel;
    req.style = args.opts.into_iter().collect();
    if let Some(path) = &args.out {
        req.output = Output::File(path.clone());
    }

    let ax = quickplot(&df, &req).context("plotting failed")?;

    match &args.out {
        Some(path) => eprintln!("Wrote chart to {}", path.display()),
        None => {
            let svg = ax.svg().unwrap_or_default();
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_theme(name: &str) -> Result<()> {
    let theme = ThemeName::resolve(name);
    let json = serde_json::to_string_pretty(&theme.overrides())
        .context("serializing theme overrides")?;
    println!("{json}");
    Ok(())
}
