//! swingscan CLI: scan a universe, inspect one symbol, dump the default config.
//!
//! Commands:
//! - `scan`: evaluate every universe ticker and write the run artifacts
//! - `analyze`: snapshot, gate verdict, score breakdown and levels for one symbol
//! - `config`: print the default configuration as TOML

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use swingscan_core::{
    check_eligibility, compute_snapshot, evaluate, levels, score, RejectionKind, ScanConfig,
};
use swingscan_runner::{
    run_scan, scan_universe, trim_to_lookback, BarSource, CsvDirSource, ScanReport,
    SyntheticSource, Universe,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swingscan",
    about = "swingscan: oversold-bounce swing-trade scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a universe and write report_<date>.json and shortlist.csv.
    Scan {
        /// Path to a TOML config file. Defaults to built-in settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Universe TOML file with a [sectors] table.
        #[arg(long, default_value = "config/universe.toml")]
        universe: PathBuf,

        /// Scan these symbols instead of the universe file.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Directory of <SYMBOL>.csv files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Use deterministic synthetic bars instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Last synthetic trading day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        /// Override the shortlist length.
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Show the full analysis of one symbol.
    Analyze {
        /// Ticker to analyze.
        symbol: String,

        /// Path to a TOML config file. Defaults to built-in settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of <SYMBOL>.csv files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Use deterministic synthetic bars instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Last synthetic trading day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
    /// Print the default configuration as TOML.
    Config,
}

/// Logs go to stderr so stdout stays clean for reports and `config` output.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            universe,
            symbols,
            data_dir,
            synthetic,
            end,
            output_dir,
            top_n,
        } => run_scan_cmd(
            config, universe, symbols, data_dir, synthetic, end, output_dir, top_n,
        ),
        Commands::Analyze {
            symbol,
            config,
            data_dir,
            synthetic,
            end,
        } => run_analyze(&symbol, config.as_deref(), data_dir, synthetic, end),
        Commands::Config => {
            print!("{}", ScanConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn make_source(
    config: &ScanConfig,
    data_dir: PathBuf,
    synthetic: bool,
    end: Option<String>,
) -> Result<Box<dyn BarSource>> {
    if !synthetic {
        if end.is_some() {
            bail!("--end only applies with --synthetic");
        }
        return Ok(Box::new(CsvDirSource::new(data_dir)));
    }

    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    // Generate past the lookback; trimming sets the window.
    Ok(Box::new(SyntheticSource::new(
        end_date,
        config.lookback_days.saturating_add(30),
    )))
}

#[allow(clippy::too_many_arguments)]
fn run_scan_cmd(
    config_path: Option<PathBuf>,
    universe_path: PathBuf,
    symbols: Vec<String>,
    data_dir: PathBuf,
    synthetic: bool,
    end: Option<String>,
    output_dir: PathBuf,
    top_n: Option<usize>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(n) = top_n {
        config.top_n = n;
    }

    let source = make_source(&config, data_dir, synthetic, end)?;
    let report = if symbols.is_empty() {
        let universe = Universe::from_file(&universe_path)
            .with_context(|| format!("loading universe {}", universe_path.display()))?;
        scan_universe(source.as_ref(), &universe, &config)?
    } else {
        run_scan(source.as_ref(), &Universe::from_symbols(&symbols).tickers(), &config)?
    };

    print!("{}", report.summary_text());

    let paths = report.write_artifacts(&output_dir)?;
    info!(
        report = %paths.report.display(),
        shortlist = %paths.shortlist.display(),
        "artifacts written"
    );
    println!("Artifacts saved to: {}", output_dir.display());

    if synthetic {
        println!("Note: results are based on synthetic data.");
    }
    warn_on_rejections(&report);

    Ok(())
}

fn warn_on_rejections(report: &ScanReport) {
    let data_problems = report
        .rejections
        .iter()
        .filter(|r| {
            matches!(
                r.kind,
                RejectionKind::MalformedInput | RejectionKind::DataUnavailable
            )
        })
        .count();
    if data_problems > 0 {
        eprintln!("{data_problems} symbol(s) skipped for missing or malformed data (see log)");
    }
}

fn run_analyze(
    symbol: &str,
    config_path: Option<&Path>,
    data_dir: PathBuf,
    synthetic: bool,
    end: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let source = make_source(&config, data_dir, synthetic, end)?;
    let symbol = symbol.trim().to_uppercase();

    let bars = trim_to_lookback(source.fetch(&symbol)?, config.lookback_days);
    let snapshot = compute_snapshot(&bars, &config.indicators)?;

    println!("== {symbol} ({} bars, as of {}) ==", bars.len(), snapshot.date);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    match check_eligibility(&snapshot, &config.signal_thresholds) {
        Ok(()) => println!("Gates: passed"),
        Err(rejection) => println!("Gates: eliminated ({rejection})"),
    }

    let result = score(&snapshot, &config.scoring);
    let b = &result.breakdown;
    println!(
        "Score: {:.2} {} {} ({})",
        result.score,
        result.strength.glyph(),
        result.strength.label(),
        result.signal.label()
    );
    println!(
        "  rsi {}  stochastic {}  ema {}  macd {}  volume {}  volatility {}  adx {}",
        b.rsi, b.stochastic, b.ema, b.macd, b.volume, b.volatility, b.adx
    );

    let lv = levels(&snapshot, &config.targets);
    println!(
        "Levels: entry {:.2}-{:.2}  stop {:.2} (-{:.2}%)",
        lv.entry_optimal, lv.entry_max, lv.stop_loss, lv.risk_pct
    );
    println!(
        "  targets {:.2} / {:.2} / {:.2}  R/R {:.2} / {:.2} / {:.2}",
        lv.target_1, lv.target_2, lv.target_3, lv.rr_ratio_1, lv.rr_ratio_2, lv.rr_ratio_3
    );
    if !lv.targets_ordered() {
        println!("  note: Keltner caps put the targets out of order");
    }

    match evaluate(&snapshot, &config) {
        Ok(_) => println!("Verdict: candidate"),
        Err(rejection) => println!("Verdict: rejected ({rejection})"),
    }

    Ok(())
}
