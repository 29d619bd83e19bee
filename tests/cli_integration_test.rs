//! CLI integration tests for config loading and command orchestration.
//!
//! Tests cover:
//! - Config loading and validation with real INI files on disk
//! - Building settings, quote chains and adapters from config
//! - Full analysis over CSV/text/JSON fixtures in a temp directory
//! - Exit codes of the analyze and validate commands

use clap::Parser;
use silvertrader::cli::{self, Cli};
use silvertrader::domain::analysis::run_analysis;
use silvertrader::domain::indicator::Trend;
use silvertrader::ports::news_port::NewsPort;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Fixture directory with 30 rising silver closes, 5 gold closes,
/// a retail quote file and a news file.
fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut silver = String::from("date,open,high,low,close,volume\n");
    for day in 1..=30 {
        let close = 28.0 + day as f64 * 0.1;
        silver.push_str(&format!("2024-06-{day:02},{close},{close},{close},{close},100\n"));
    }
    // blank close dropped by the normalizer
    silver.push_str("2024-07-01,31.0,31.0,31.0,,100\n");
    fs::write(dir.path().join("SI=F.csv"), silver).unwrap();
    fs::write(
        dir.path().join("GC=F.csv"),
        "date,close\n2024-06-26,2000\n2024-06-27,2005\n2024-06-28,2010\n2024-06-29,2015\n2024-06-30,2020\n",
    )
    .unwrap();
    fs::write(dir.path().join("retail.txt"), "1,16,000").unwrap();
    fs::write(
        dir.path().join("news.json"),
        r#"[{"title": "Silver imports rise", "source": "Mint"}, {"title": "", "source": "Spam"}]"#,
    )
    .unwrap();
    dir
}

fn ini_for(dir: &Path) -> String {
    format!(
        r#"
[market]
symbol = SI=F
history_lookback = 30

[retail]
fallback_price = 100000
quote_file = {dir}/retail.txt

[fx]
fallback_rate = 83.0

[data]
csv_dir = {dir}

[correlations]
lookback = 5
gold_change = GC=F

[news]
file = {dir}/news.json
limit = 5
"#,
        dir = dir.display()
    )
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_validates() {
        let dir = fixture_dir();
        let file = write_temp_ini(&ini_for(dir.path()));
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();
        let settings = cli::build_analysis_settings(&config);
        assert_eq!(settings.symbol, "SI=F");
        assert_eq!(settings.correlation_feeds.len(), 1);
        assert_eq!(settings.news_limit, 5);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let file = write_temp_ini("[retail]\nfallback_price = -5\n[data]\ncsv_dir = /tmp\n");
        let err = cli::load_config(&file.path().to_path_buf()).unwrap_err();
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = cli::load_config(&"/nonexistent/silvertrader.ini".into()).unwrap_err();
        assert_eq!(err.kind(), "config_parse");
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn analysis_from_config_and_fixtures() {
        let dir = fixture_dir();
        let file = write_temp_ini(&ini_for(dir.path()));
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();

        let history = cli::build_history(&config);
        let news = cli::build_news(&config);
        let report = run_analysis(
            &history,
            &cli::build_retail_chain(&config),
            &cli::build_fx_chain(&config),
            news.as_ref().map(|n| n as &dyn NewsPort),
            &cli::build_analysis_settings(&config),
        )
        .unwrap();

        let snap = &report.snapshot;
        assert_eq!(report.retail_source, "retail_file");
        assert_eq!(report.fx_source, "fallback");
        assert_eq!(snap.current_price(), 116_000.0);
        // the lookback window is the last 30 rows, one of which has no close
        assert_eq!(snap.points(), 29);
        assert_eq!(snap.technical().trend, Trend::Bullish);
        assert!((snap.correlations()["gold_change"] - 1.0).abs() < 1e-9);
        assert_eq!(report.news.len(), 1);
        assert_eq!(snap.news_count(), 1);
    }

    #[test]
    fn missing_quote_file_falls_back() {
        let dir = fixture_dir();
        fs::remove_file(dir.path().join("retail.txt")).unwrap();
        let file = write_temp_ini(&ini_for(dir.path()));
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();

        let quote = cli::build_retail_chain(&config).resolve();
        assert_eq!(quote.value, 100_000.0);
        assert!(quote.is_fallback());
    }
}

mod commands {
    use super::*;

    fn run(args: &[&str]) -> ExitCode {
        cli::run(Cli::parse_from(args))
    }

    #[test]
    fn validate_succeeds_on_valid_config() {
        let dir = fixture_dir();
        let file = write_temp_ini(&ini_for(dir.path()));
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&["silvertrader", "validate", "--config", path]), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_maps_config_errors_to_exit_code_two() {
        let file = write_temp_ini("[retail]\nfallback_price = 1\n");
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&["silvertrader", "validate", "--config", path]), ExitCode::from(2));
    }

    #[test]
    fn analyze_json_succeeds() {
        let dir = fixture_dir();
        let file = write_temp_ini(&ini_for(dir.path()));
        let path = file.path().to_str().unwrap();
        assert_eq!(
            run(&["silvertrader", "analyze", "--config", path, "--json"]),
            ExitCode::SUCCESS
        );
        assert_eq!(run(&["silvertrader", "prompt", "--config", path]), ExitCode::SUCCESS);
    }

    #[test]
    fn analyze_without_history_exits_with_snapshot_code() {
        let dir = TempDir::new().unwrap();
        let file = write_temp_ini(&format!(
            "[retail]\nfallback_price = 1\n[data]\ncsv_dir = {}\n",
            dir.path().display()
        ));
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&["silvertrader", "analyze", "--config", path]), ExitCode::from(5));
    }
}
