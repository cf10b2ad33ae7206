use anyhow::{bail, Context};

use stocklens::config::ConfigManager;
use stocklens::data::{CsvConnector, FormatNormalizer, SeriesCleaner};
use stocklens::indicators::IndicatorEngine;
use stocklens::render::{AnalysisReport, JsonChartRenderer, Renderer, TableRenderer, TextRenderer};
use stocklens::signals::SignalEngine;
use stocklens::types::SourceFormat;

struct Args {
    path: String,
    format: SourceFormat,
    config: Option<String>,
    symbol: String,
    output: Output,
}

enum Output {
    Text,
    Table,
    Json,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut format = SourceFormat::International;
    let mut config = None;
    let mut symbol = None;
    let mut output = Output::Text;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                let value = args.next().context("--format needs a value")?;
                format = match value.as_str() {
                    "indian" => SourceFormat::Indian,
                    "international" => SourceFormat::International,
                    other => bail!("unknown format {} (expected indian|international)", other),
                };
            }
            "--config" => config = Some(args.next().context("--config needs a value")?),
            "--symbol" => symbol = Some(args.next().context("--symbol needs a value")?),
            "--output" => {
                let value = args.next().context("--output needs a value")?;
                output = match value.as_str() {
                    "text" => Output::Text,
                    "table" => Output::Table,
                    "json" => Output::Json,
                    other => bail!("unknown output {} (expected text|table|json)", other),
                };
            }
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("unexpected argument: {}", other),
        }
    }

    let path = path.context(
        "usage: stocklens <prices.csv> [--format indian|international] \
         [--config cfg.toml] [--symbol NAME] [--output text|table|json]",
    )?;
    let symbol = symbol.unwrap_or_else(|| {
        std::path::Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone())
    });

    Ok(Args {
        path,
        format,
        config,
        symbol,
        output,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let manager = ConfigManager::new();
    if let Some(config_path) = &args.config {
        manager.load_from_file(config_path)?;
    }
    let cfg = manager.get();

    let df = CsvConnector::load(&args.path)?;
    let candidate = FormatNormalizer::normalize(&df, args.format)?;
    let (series, clean) = SeriesCleaner::clean(candidate)?;

    let indicators = IndicatorEngine::compute(&series, &cfg.indicators);
    let summary = SignalEngine::evaluate(&series, &indicators, &cfg);

    let report = AnalysisReport {
        symbol: &args.symbol,
        series: &series,
        indicators: &indicators,
        summary: &summary,
        clean: &clean,
    };

    let rendered = match args.output {
        Output::Text => TextRenderer {
            signal_cfg: cfg.signals.clone(),
        }
        .render(&report)?,
        Output::Table => TableRenderer { tail: 20 }.render(&report)?,
        Output::Json => JsonChartRenderer.render(&report)?,
    };

    print!("{}", rendered);
    Ok(())
}
