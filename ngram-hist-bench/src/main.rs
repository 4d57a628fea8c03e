use std::time::Instant;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use ngram_hist_core::{BuildParams, Corpus, Strategy, build};

mod config;
mod report;

use config::{Block, Config};
use report::{Reporter, StrategyReport, Trial};

/// Runs `trials` timed builds of one strategy and prints each of them.
fn measure<W: std::io::Write>(
	reporter: &Reporter<W>,
	strategy: Strategy,
	corpus: &Corpus,
	block: Block,
	config: &Config,
) -> Result<StrategyReport> {
	reporter.begin_strategy(strategy);
	let params = BuildParams::new(config.ngram_size, block.passes, block.workers);

	let mut trials = Vec::with_capacity(config.trials);
	for index in 0..config.trials {
		let start = Instant::now();
		let output = build(strategy, corpus, &params)?;
		let trial = Trial::new(start.elapsed(), &output);
		reporter.trial(index, &trial);
		trials.push(trial);
	}

	Ok(StrategyReport::new(strategy, block, trials))
}

/// Benchmark entry point.
///
/// For every block (worker count, or pass count in `size` mode) the
/// sequential baseline is measured first, then each parallel strategy,
/// whose speedup against the baseline goes to the results log.
///
/// # Notes
/// - Settings come from the environment, optionally through a `.env` file.
/// - Invalid settings abort before any histogram is built.
fn main() -> Result<()> {
	dotenv::dotenv().ok();
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let config = Config::from_env().context("Invalid benchmark configuration")?;
	info!(
		"n = {}, {} passes, {} trials, corpus {}",
		config.ngram_size,
		config.passes,
		config.trials,
		config.corpus_dir.display()
	);

	let corpus = Corpus::new(&config.corpus_dir);
	let mut reporter = Reporter::create(&config.log_file, config.mode, config.ngram_size, config.report_json.clone())?;

	for block in config.blocks() {
		reporter.begin_block(block)?;

		let baseline = measure(&reporter, Strategy::Sequential, &corpus, block, &config)?;
		let reference = baseline.trials.first().cloned();
		reporter.strategy_done(baseline.clone())?;

		for strategy in Strategy::PARALLEL {
			let mut report = measure(&reporter, strategy, &corpus, block, &config)?;
			report.compare(&baseline);

			if let Some(reference) = &reference {
				if report.trials.iter().any(|trial| !trial.same_counts(reference)) {
					warn!("{} counted different n-grams than the sequential baseline", strategy);
				}
			}
			reporter.strategy_done(report)?;
		}

		reporter.end_block()?;
	}

	reporter.finish(&config)?;
	info!("Results written to {}", config.log_file.display());
	Ok(())
}
