//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_news_adapter::JsonNewsAdapter;
use crate::adapters::quote_adapter::{FileQuote, FixedQuote};
use crate::domain::analysis::{
    run_analysis, AnalysisReport, AnalysisSettings, DEFAULT_HISTORY_LOOKBACK, DEFAULT_NEWS_LIMIT,
    DEFAULT_SYMBOL,
};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::conversion::{FALLBACK_USD_INR, TROY_OUNCES_PER_KG};
use crate::domain::correlation::{CorrelationFeed, DEFAULT_CORRELATION_LOOKBACK};
use crate::domain::error::SilvertraderError;
use crate::domain::indicator::IndicatorWindows;
use crate::domain::prompt::render_prompt;
use crate::domain::quote_chain::QuoteChain;
use crate::ports::config_port::ConfigPort;
use crate::ports::news_port::NewsPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(name = "silvertrader", about = "Silver market signals and paper-trading ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the market snapshot
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the recommendation prompt for the current snapshot
    Prompt {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web API
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze { config, json } => run_analyze(&config, json),
        Command::Prompt { config } => run_prompt(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

fn fail(err: &SilvertraderError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, SilvertraderError> {
    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_analysis_config(&adapter)?;
    Ok(adapter)
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int("market", key, default as i64)).unwrap_or(default)
}

pub fn build_analysis_settings(config: &dyn ConfigPort) -> AnalysisSettings {
    let defaults = IndicatorWindows::default();
    let correlation_feeds = config
        .keys("correlations")
        .into_iter()
        .filter(|k| k != "lookback")
        .filter_map(|name| {
            config
                .get_string("correlations", &name)
                .map(|symbol| CorrelationFeed::new(&name, symbol.trim()))
        })
        .collect();

    AnalysisSettings {
        symbol: config
            .get_string("market", "symbol")
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
        history_lookback: window(config, "history_lookback", DEFAULT_HISTORY_LOOKBACK),
        unit_multiplier: config.get_double("market", "unit_multiplier", TROY_OUNCES_PER_KG),
        windows: IndicatorWindows {
            short: window(config, "short_window", defaults.short),
            long: window(config, "long_window", defaults.long),
            rsi: window(config, "rsi_period", defaults.rsi),
        },
        correlation_feeds,
        correlation_lookback: usize::try_from(config.get_int(
            "correlations",
            "lookback",
            DEFAULT_CORRELATION_LOOKBACK as i64,
        ))
        .unwrap_or(DEFAULT_CORRELATION_LOOKBACK),
        estimate_markup_pct: config
            .get_string("retail", "estimate_markup_pct")
            .and_then(|v| v.trim().parse::<f64>().ok()),
        news_limit: usize::try_from(config.get_int("news", "limit", DEFAULT_NEWS_LIMIT as i64))
            .unwrap_or(DEFAULT_NEWS_LIMIT),
    }
}

pub fn build_retail_chain(config: &dyn ConfigPort) -> QuoteChain {
    let mut chain = QuoteChain::new("retail", config.get_double("retail", "fallback_price", 0.0));
    if let Some(path) = config.get_string("retail", "quote_file") {
        chain = chain.with_source(Box::new(FileQuote::new("retail_file", PathBuf::from(path))));
    }
    chain
}

pub fn build_fx_chain(config: &dyn ConfigPort) -> QuoteChain {
    let mut chain = QuoteChain::new("fx", config.get_double("fx", "fallback_rate", FALLBACK_USD_INR));
    if let Some(path) = config.get_string("fx", "rate_file") {
        chain = chain.with_source(Box::new(FileQuote::new("fx_file", PathBuf::from(path))));
    }
    if let Some(rate) = config
        .get_string("fx", "rate")
        .and_then(|v| v.trim().parse::<f64>().ok())
    {
        chain = chain.with_source(Box::new(FixedQuote::new("fx_config", rate)));
    }
    chain
}

pub fn build_history(config: &dyn ConfigPort) -> CsvAdapter {
    CsvAdapter::new(PathBuf::from(
        config.get_string("data", "csv_dir").unwrap_or_default(),
    ))
}

pub fn build_news(config: &dyn ConfigPort) -> Option<JsonNewsAdapter> {
    config
        .get_string("news", "file")
        .map(|path| JsonNewsAdapter::new(PathBuf::from(path)))
}

fn analyze_from_config(config_path: &PathBuf) -> Result<AnalysisReport, SilvertraderError> {
    let config = load_config(config_path)?;
    let settings = build_analysis_settings(&config);
    let history = build_history(&config);
    let news = build_news(&config);
    run_analysis(
        &history,
        &build_retail_chain(&config),
        &build_fx_chain(&config),
        news.as_ref().map(|n| n as &dyn NewsPort),
        &settings,
    )
}

fn run_analyze(config_path: &PathBuf, json: bool) -> ExitCode {
    let report = match analyze_from_config(config_path) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if json {
        return match serde_json::to_string_pretty(&report) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to encode report: {e}");
                ExitCode::from(1)
            }
        };
    }

    let snap = &report.snapshot;
    let tech = snap.technical();
    let premium = snap.premium();
    let stats = snap.stats();
    println!("{} as of {} ({} points)", snap.symbol(), snap.as_of(), snap.points());
    println!("  Retail price:   {:.2} ({})", snap.current_price(), report.retail_source);
    println!(
        "  Spot converted: {:.2} (FX {:.2}, {})",
        premium.spot_converted,
        snap.conversion().currency_rate,
        report.fx_source
    );
    println!(
        "  Premium:        {:.2} ({:.2}%)",
        premium.premium_absolute, premium.premium_percent
    );
    println!("  Trend:          {}", tech.trend);
    println!("  RSI:            {:.2}", tech.rsi);
    println!("  SMA short/long: {:.2} / {:.2}", tech.short_ma, tech.long_ma);
    println!("  Support/resist: {:.2} / {:.2}", tech.support, tech.resistance);
    println!(
        "  Change 7/full:  {:.2}% / {:.2}%",
        stats.change_7, stats.change_full
    );
    for (name, change) in snap.correlations() {
        println!("  {name}: {change:.2}%");
    }
    println!("  News items:     {}", snap.news_count());
    ExitCode::SUCCESS
}

fn run_prompt(config_path: &PathBuf) -> ExitCode {
    match analyze_from_config(config_path) {
        Ok(report) => {
            print!("{}", render_prompt(&report.snapshot, &report.news));
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_config(config_path) {
        Ok(config) => {
            let settings = build_analysis_settings(&config);
            println!(
                "Config OK: symbol {}, {} correlation feed(s)",
                settings.symbol,
                settings.correlation_feeds.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{serve, AppState};
        use crate::domain::ledger::SharedLedger;
        use std::sync::Arc;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return fail(&e),
        };
        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());

        let state = AppState {
            ledger: SharedLedger::new(),
            history: Arc::new(build_history(&config)),
            news: build_news(&config)
                .map(|n| Arc::new(n) as Arc<dyn NewsPort + Send + Sync>),
            retail_chain: build_retail_chain(&config),
            fx_chain: build_fx_chain(&config),
            settings: build_analysis_settings(&config),
        };

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(&SilvertraderError::Io(e)),
        };
        match runtime.block_on(serve(state, &listen)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&e),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
