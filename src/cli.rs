//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::TradesigError;
use crate::domain::overlay::{Overlays, StopLoss, StopMode, TakeProfit};
use crate::domain::predicate_parser;
use crate::domain::strategy::{self, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tradesig", about = "Trading strategy signal evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a strategy over historical bars and emit signals
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Show data range for a symbol, or list available symbols
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            data,
            symbol,
            start,
            end,
            output,
        } => run_evaluate(
            &config,
            &data,
            &symbol,
            start.as_deref(),
            end.as_deref(),
            output.as_ref(),
        ),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Info { data, symbol } => run_info(&data, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn parse_cli_date(value: &str, flag: &str) -> Result<NaiveDate, ExitCode> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        eprintln!("error: invalid --{flag} date '{value}' (expected YYYY-MM-DD)");
        ExitCode::from(2)
    })
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, ExitCode> {
    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());
    let description = adapter
        .get_string("strategy", "description")
        .unwrap_or_default();

    let buy_str = adapter.get_string("strategy", "buy").unwrap_or_default();
    let sell_str = adapter.get_string("strategy", "sell").unwrap_or_default();

    let buy = match predicate_parser::parse(&buy_str) {
        Ok(p) => p,
        Err(e) => {
            eprintln!(
                "error: failed to parse buy predicate:\n{}",
                e.display_with_context(&buy_str)
            );
            return Err(ExitCode::from(4));
        }
    };
    let sell = match predicate_parser::parse(&sell_str) {
        Ok(p) => p,
        Err(e) => {
            eprintln!(
                "error: failed to parse sell predicate:\n{}",
                e.display_with_context(&sell_str)
            );
            return Err(ExitCode::from(4));
        }
    };

    let overlays = match build_overlays(adapter) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(ExitCode::from(&e));
        }
    };

    Ok(Strategy {
        name,
        description,
        buy,
        sell,
        overlays,
    })
}

pub fn build_overlays(adapter: &dyn ConfigPort) -> Result<Overlays, TradesigError> {
    let stop_loss = match adapter.get_string("risk", "stop_loss_pct") {
        Some(_) => {
            let mode_str = adapter
                .get_string("risk", "stop_loss_mode")
                .unwrap_or_else(|| "normal".to_string());
            let mode = match mode_str.to_lowercase().as_str() {
                "normal" => StopMode::Normal,
                "trailing" => StopMode::Trailing,
                other => {
                    return Err(TradesigError::ConfigInvalid {
                        section: "risk".into(),
                        key: "stop_loss_mode".into(),
                        reason: format!("unknown mode '{other}' (expected normal or trailing)"),
                    });
                }
            };
            Some(StopLoss {
                // Non-numeric values fall through as NaN and are substituted
                // with the default during normalization.
                percent: adapter.get_double("risk", "stop_loss_pct", f64::NAN),
                mode,
            })
        }
        None => None,
    };

    let take_profit = adapter
        .get_string("risk", "take_profit_pct")
        .map(|_| TakeProfit {
            percent: adapter.get_double("risk", "take_profit_pct", f64::NAN),
        });

    Ok(Overlays {
        stop_loss,
        take_profit,
    })
}

fn run_evaluate(
    config_path: &PathBuf,
    data_path: &PathBuf,
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading strategy from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strat = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };
    eprintln!("Evaluating strategy: {}", strat.name);

    let data_port = CsvAdapter::new(data_path.clone());

    let start_date = match start {
        Some(s) => match parse_cli_date(s, "start") {
            Ok(d) => d,
            Err(code) => return code,
        },
        None => NaiveDate::MIN,
    };
    let end_date = match end {
        Some(s) => match parse_cli_date(s, "end") {
            Ok(d) => d,
            Err(code) => return code,
        },
        None => NaiveDate::MAX,
    };

    let bars = match data_port.fetch_bars(symbol, start_date, end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if bars.is_empty() {
        let e = TradesigError::NoData {
            symbol: symbol.to_string(),
        };
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Processing: {} bars", bars.len());

    let signals = strategy::evaluate_strategy(&strat, &bars);

    for sub in &signals.substitutions {
        eprintln!(
            "warning: invalid {} {} replaced with default {}",
            sub.parameter, sub.supplied, sub.substituted
        );
    }

    let mut buy_count = 0;
    let mut sell_count = 0;
    for (i, bar) in bars.iter().enumerate() {
        if signals.buy[i] {
            buy_count += 1;
            println!("{} {:.2} BUY", bar.date, bar.close);
        }
        if signals.sell[i] {
            sell_count += 1;
            println!("{} {:.2} SELL", bar.date, bar.close);
        }
    }
    eprintln!("{buy_count} buy signals, {sell_count} sell signals");

    if let Some(output) = output_path {
        let mut content = String::from("date,close,buy,sell\n");
        for (i, bar) in bars.iter().enumerate() {
            content.push_str(&format!(
                "{},{},{},{}\n",
                bar.date, bar.close, signals.buy[i], signals.sell[i]
            ));
        }
        if let Err(e) = fs::write(output, &content) {
            eprintln!("error: failed to write {}: {}", output.display(), e);
            return ExitCode::from(1);
        }
        eprintln!("Signals written to: {}", output.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    eprintln!("Validating strategy: {}", strategy_path.display());
    let adapter = match load_config(strategy_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for key in ["buy", "sell"] {
        if adapter
            .get_string("strategy", key)
            .filter(|s| !s.trim().is_empty())
            .is_none()
        {
            let e = TradesigError::ConfigMissing {
                section: "strategy".into(),
                key: key.into(),
            };
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let strat = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("\nBuy predicate:");
    eprintln!("  {}", strat.buy);
    eprintln!("\nSell predicate:");
    eprintln!("  {}", strat.sell);

    let (normalized, substitutions) = strat.overlays.normalized();
    for sub in &substitutions {
        eprintln!(
            "warning: invalid {} {} will be replaced with default {}",
            sub.parameter, sub.supplied, sub.substituted
        );
    }
    if let Some(stop) = &normalized.stop_loss {
        let mode = match stop.mode {
            StopMode::Normal => "normal",
            StopMode::Trailing => "trailing",
        };
        eprintln!("\nStop loss: {:.1}% ({mode})", stop.percent);
    }
    if let Some(take) = &normalized.take_profit {
        eprintln!("Take profit: {:.1}%", take.percent);
    }

    eprintln!("\nStrategy configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(data_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let data_port = CsvAdapter::new(data_path.clone());

    match symbol {
        Some(symbol) => match data_port.data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{symbol}: {count} bars, {min_date} to {max_date}");
                ExitCode::SUCCESS
            }
            Ok(None) => {
                eprintln!("{symbol}: no data found");
                ExitCode::from(5)
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
        None => match data_port.list_symbols() {
            Ok(symbols) => {
                if symbols.is_empty() {
                    eprintln!("No symbols found in {}", data_path.display());
                } else {
                    for symbol in &symbols {
                        println!("{symbol}");
                    }
                    eprintln!("{} symbols found", symbols.len());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
    }
}
