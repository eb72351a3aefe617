//! PriceWalk CLI — predict and transitions commands.
//!
//! Commands:
//! - `predict` — simulate future values from a CSV price series
//! - `transitions` — print the estimated transition model for a CSV series

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pricewalk_core::data::{CsvSource, SeriesSource};
use pricewalk_core::export::{prediction_to_csv, prediction_to_json};
use pricewalk_core::{
    EstimatorMode, Prediction, Predictor, PredictorConfig, State, TransitionReport,
};

#[derive(Parser)]
#[command(
    name = "pricewalk",
    about = "PriceWalk CLI — Markov-chain short-horizon price walk"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate future values following the lookback window.
    Predict {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Future steps to simulate.
        #[arg(long)]
        horizon: Option<usize>,

        /// Price units per INCREASE/DECREASE step.
        #[arg(long)]
        step_size: Option<f64>,

        /// Seed window length.
        #[arg(long)]
        window_len: Option<usize>,

        /// Master seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of simulated trajectories (the mean is reported).
        #[arg(long)]
        paths: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write output here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print transition counts and probabilities.
    Transitions {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with a Date column and a Close (or value) column.
    #[arg(long)]
    input: PathBuf,

    /// Value column to read instead of Close / Adj Close / value.
    #[arg(long)]
    column: Option<String>,

    /// Instrument label used in output and seed derivation.
    #[arg(long, default_value = "SERIES")]
    symbol: String,

    /// Last date of the lookback window (YYYY-MM-DD). Defaults to the last date in the file.
    #[arg(long)]
    cutoff: Option<String>,
}

#[derive(Args)]
struct ModelArgs {
    /// TOML config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calendar days before the cutoff fed to the model.
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Transition estimation rule.
    #[arg(long, value_enum)]
    mode: Option<Mode>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Ordinal,
    Pairwise,
}

impl From<Mode> for EstimatorMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Ordinal => EstimatorMode::Ordinal,
            Mode::Pairwise => EstimatorMode::Pairwise,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Predict {
            input,
            model,
            horizon,
            step_size,
            window_len,
            seed,
            paths,
            format,
            output,
        } => {
            let mut config = load_config(&model)?;
            config.horizon = horizon.unwrap_or(config.horizon);
            config.step_size = step_size.unwrap_or(config.step_size);
            config.window_len = window_len.unwrap_or(config.window_len);
            config.paths = paths.unwrap_or(config.paths);
            config.seed = seed.or(config.seed);
            run_predict(&input, config, format, output.as_deref())
        }
        Commands::Transitions { input, model } => {
            let config = load_config(&model)?;
            run_transitions(&input, config)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(model: &ModelArgs) -> Result<PredictorConfig> {
    let mut config = match &model.config {
        Some(path) => PredictorConfig::from_file(path)?,
        None => PredictorConfig::default(),
    };
    config.lookback_days = model.lookback_days.unwrap_or(config.lookback_days);
    if let Some(mode) = model.mode {
        config.estimator = mode.into();
    }
    Ok(config)
}

fn open_source(input: &InputArgs) -> CsvSource {
    let source = CsvSource::new(&input.input);
    match &input.column {
        Some(column) => source.with_value_column(column),
        None => source,
    }
}

/// Explicit `--cutoff`, or the last date present in the file.
fn resolve_cutoff(input: &InputArgs, source: &CsvSource) -> Result<NaiveDate> {
    if let Some(raw) = &input.cutoff {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --cutoff '{raw}' (expected YYYY-MM-DD)"));
    }
    let series = source.load()?;
    series
        .last()
        .map(|o| o.date)
        .with_context(|| format!("{} contains no observations", source.path().display()))
}

fn run_predict(
    input: &InputArgs,
    config: PredictorConfig,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let predictor = Predictor::new(config)?;
    let source = open_source(input);
    let cutoff = resolve_cutoff(input, &source)?;
    tracing::info!(source = source.name(), symbol = %input.symbol, %cutoff, "running prediction");

    let prediction = predictor.predict_from_source(&source, &input.symbol, cutoff)?;

    let rendered = match format {
        Format::Text => render_prediction(&prediction),
        Format::Json => prediction_to_json(&prediction)?,
        Format::Csv => prediction_to_csv(&prediction)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Prediction saved to: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_transitions(input: &InputArgs, config: PredictorConfig) -> Result<()> {
    let predictor = Predictor::new(config)?;
    let source = open_source(input);
    let cutoff = resolve_cutoff(input, &source)?;

    let series = predictor.load(&source, &input.symbol, cutoff)?;
    let report = predictor.transitions(&series)?;
    print!("{}", render_transitions(&input.symbol, series.len(), &report));
    Ok(())
}

fn render_transitions(symbol: &str, observations: usize, report: &TransitionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n=== Transitions: {symbol} ===\n"));
    out.push_str(&format!("Observations:   {observations}\n"));
    out.push_str(&format!("Transitions:    {}\n", report.transitions));
    out.push_str(&format!("Mode:           {:?}\n\n", report.mode));

    out.push_str(&format!("{:<10} {:>8} {:>12}\n", "Bucket", "Count", "Probability"));
    out.push_str(&format!("{}\n", "-".repeat(32)));
    for state in State::ALL {
        out.push_str(&format!(
            "{:<10} {:>8} {:>12.4}\n",
            state.as_str(),
            report.counts.get(state),
            report.probabilities.get(state)
        ));
    }

    if let Some(matrix) = &report.matrix {
        out.push_str("\n--- Pairwise matrix (from → to) ---\n");
        out.push_str(&format!("{:<10}", "from/to"));
        for to in State::ALL {
            out.push_str(&format!(" {:>9}", to.as_str()));
        }
        out.push('\n');
        for from in State::ALL {
            out.push_str(&format!("{:<10}", from.as_str()));
            for to in State::ALL {
                out.push_str(&format!(" {:>9}", matrix.count(from, to)));
            }
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

fn render_prediction(prediction: &Prediction) -> String {
    let mut out = render_transitions(
        &prediction.symbol,
        prediction.observed.len(),
        &prediction.transitions,
    );
    out.push_str("=== Prediction ===\n");
    out.push_str(&format!("Seed:           {}\n", prediction.master_seed));
    out.push_str(&format!("Paths:          {}\n", prediction.paths.len()));
    out.push_str(&format!("Step size:      {}\n", prediction.config.step_size));
    if let Some(last) = prediction.observed.last() {
        out.push_str(&format!("Last observed:  {} {:.2}\n", last.date, last.value));
    }
    out.push('\n');
    out.push_str(&format!("{:<12} {:>12}\n", "Date", "Value"));
    out.push_str(&format!("{}\n", "-".repeat(25)));
    for o in &prediction.predicted {
        out.push_str(&format!("{:<12} {:>12.2}\n", o.date.to_string(), o.value));
    }
    out.push('\n');
    out
}
