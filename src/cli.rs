//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{validate_indicator, validate_indicator_config};
use crate::domain::error::FintaError;
use crate::domain::indicator::bollinger::DEFAULT_STD;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{self, Indicator, MovingAverage};
use crate::domain::schema::validate_schema;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "finta", about = "Technical indicators over OHLCV tables")]
pub struct Cli {
    /// INI file with indicator defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct FrameArgs {
    /// Input CSV with open, high, low, close and optional volume columns
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output CSV (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Column that partitions the table into independent series
    #[arg(long)]
    pub identifier: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simple moving average
    Sma {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Simple moving median
    Smm {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Moving standard deviation
    Msd {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Exponential moving average
    Ema {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Relative strength index
    Rsi {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Typical price, (high + low + close) / 3
    TypicalPrice {
        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Cumulative volume-weighted average price
    Vwap {
        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Bollinger Bands
    Bbands {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(short, long)]
        period: Option<usize>,
        /// Band width in standard deviations
        #[arg(long)]
        std: Option<f64>,
        /// Middle band: sma, ema or smm
        #[arg(long)]
        ma: Option<String>,
    },
    /// Moving average convergence divergence
    Macd {
        #[command(flatten)]
        frame: FrameArgs,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
        #[arg(long)]
        signal: Option<usize>,
    },
    /// Check that a CSV has the OHLC(V) shape
    Validate {
        #[arg(short, long)]
        input: PathBuf,
        /// Also require a volume column
        #[arg(long)]
        volume: bool,
    },
}

impl Command {
    fn frame_args(&self) -> Option<&FrameArgs> {
        match self {
            Command::Sma { frame, .. }
            | Command::Smm { frame, .. }
            | Command::Msd { frame, .. }
            | Command::Ema { frame, .. }
            | Command::Rsi { frame, .. }
            | Command::TypicalPrice { frame }
            | Command::Vwap { frame }
            | Command::Bbands { frame, .. }
            | Command::Macd { frame, .. } => Some(frame),
            Command::Validate { .. } => None,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match try_run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn try_run(cli: &Cli) -> Result<(), FintaError> {
    if let Command::Validate { input, volume } = &cli.command {
        return run_validate(input, *volume);
    }

    let config = load_config(cli.config.as_deref())?;
    validate_indicator_config(&config)?;

    let Some(indicator) = build_indicator(&cli.command, &config)? else {
        return Ok(());
    };
    let Some(args) = cli.command.frame_args() else {
        return Ok(());
    };
    let identifier = resolve_identifier(args.identifier.as_deref(), &config);
    execute(args, &indicator, identifier.as_deref())
}

/// An absent path yields an empty config, so every lookup falls back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, FintaError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|e| FintaError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn config_usize(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(0)
}

fn period_or(flag: Option<usize>, config: &dyn ConfigPort, section: &str, default: usize) -> usize {
    flag.unwrap_or_else(|| config_usize(config, section, "period", default))
}

/// Resolve indicator parameters: flag, then config file, then default.
/// `Validate` carries no indicator and yields `None`.
pub fn build_indicator(
    command: &Command,
    config: &dyn ConfigPort,
) -> Result<Option<Indicator>, FintaError> {
    let indicator = match command {
        Command::Sma { period, .. } => {
            Indicator::Sma(period_or(*period, config, "sma", indicator::DEFAULT_PERIOD))
        }
        Command::Smm { period, .. } => {
            Indicator::Smm(period_or(*period, config, "smm", indicator::DEFAULT_PERIOD))
        }
        Command::Msd { period, .. } => {
            Indicator::Msd(period_or(*period, config, "msd", indicator::DEFAULT_PERIOD))
        }
        Command::Ema { period, .. } => {
            Indicator::Ema(period_or(*period, config, "ema", indicator::DEFAULT_PERIOD))
        }
        Command::Rsi { period, .. } => Indicator::Rsi(period_or(
            *period,
            config,
            "rsi",
            indicator::rsi::DEFAULT_PERIOD,
        )),
        Command::TypicalPrice { .. } => Indicator::TypicalPrice,
        Command::Vwap { .. } => Indicator::Vwap,
        Command::Bbands {
            period, std, ma, ..
        } => {
            let std = std.unwrap_or_else(|| config.get_double("bbands", "std", DEFAULT_STD));
            if !(std.is_finite() && std >= 0.0) {
                return Err(FintaError::ConfigInvalid {
                    section: "bbands".into(),
                    key: "std".into(),
                    reason: "std must be non-negative".into(),
                });
            }
            let ma = match ma.clone().or_else(|| config.get_string("bbands", "ma")) {
                Some(raw) => {
                    raw.parse::<MovingAverage>()
                        .map_err(|reason| FintaError::ConfigInvalid {
                            section: "bbands".into(),
                            key: "ma".into(),
                            reason,
                        })?
                }
                None => MovingAverage::default(),
            };
            Indicator::Bollinger {
                period: period_or(*period, config, "bbands", indicator::DEFAULT_PERIOD),
                std,
                ma,
            }
        }
        Command::Macd {
            fast, slow, signal, ..
        } => Indicator::Macd {
            fast: fast.unwrap_or_else(|| config_usize(config, "macd", "fast", DEFAULT_FAST)),
            slow: slow.unwrap_or_else(|| config_usize(config, "macd", "slow", DEFAULT_SLOW)),
            signal: signal
                .unwrap_or_else(|| config_usize(config, "macd", "signal", DEFAULT_SIGNAL)),
        },
        Command::Validate { .. } => return Ok(None),
    };
    validate_indicator(&indicator)?;
    Ok(Some(indicator))
}

pub fn resolve_identifier(flag: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| config.get_string("data", "identifier_column"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load the input CSV, run `indicator` and write the collected result.
pub fn execute(
    args: &FrameArgs,
    indicator: &Indicator,
    identifier: Option<&str>,
) -> Result<(), FintaError> {
    let adapter = CsvAdapter::default();
    let frame = adapter.load(&args.input)?;
    let input_rows = frame.height();
    let result = indicator.apply(frame, identifier)?.collect()?;

    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            adapter.write(&result, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            adapter.write(&result, &mut out)?;
        }
    }

    info!(
        indicator = %indicator,
        identifier = identifier.unwrap_or("-"),
        rows = input_rows,
        columns = result.width(),
        "indicator computed"
    );
    Ok(())
}

fn run_validate(input: &Path, include_volume: bool) -> Result<(), FintaError> {
    let frame = CsvAdapter::default().load(input)?;
    validate_schema(&frame.schema(), include_volume)?;
    println!(
        "{}: valid {} table ({} rows)",
        input.display(),
        if include_volume { "OHLCV" } else { "OHLC" },
        frame.height()
    );
    Ok(())
}
