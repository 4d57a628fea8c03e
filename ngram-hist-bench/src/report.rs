use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use ngram_hist_core::{BuildOutput, Strategy};

use crate::config::{Block, Config, Mode};

/// Measurements of one timed run.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Trial {
	pub seconds: f64,
	pub letters_total: u64,
	pub letters_distinct: usize,
	pub words_total: u64,
	pub words_distinct: usize,
	pub unreadable: usize,
}

impl Trial {
	pub fn new(elapsed: Duration, output: &BuildOutput) -> Self {
		let histograms = &output.histograms;
		Self {
			seconds: elapsed.as_secs_f64(),
			letters_total: histograms.letters.total(),
			letters_distinct: histograms.letters.distinct(),
			words_total: histograms.words.total(),
			words_distinct: histograms.words.distinct(),
			unreadable: output.unreadable.len(),
		}
	}

	/// True if both runs counted the same n-grams.
	pub fn same_counts(&self, other: &Self) -> bool {
		self.letters_total == other.letters_total
			&& self.letters_distinct == other.letters_distinct
			&& self.words_total == other.words_total
			&& self.words_distinct == other.words_distinct
	}
}

/// All trials of one strategy within one block.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StrategyReport {
	pub strategy: Strategy,
	pub workers: usize,
	pub passes: usize,
	pub trials: Vec<Trial>,
	pub mean_seconds: f64,
	/// Mean sequential time divided by the mean time of this strategy.
	pub speedup: Option<f64>,
}

impl StrategyReport {
	pub fn new(strategy: Strategy, block: Block, trials: Vec<Trial>) -> Self {
		let mean_seconds = mean(trials.iter().map(|trial| trial.seconds));
		Self { strategy, workers: block.workers, passes: block.passes, trials, mean_seconds, speedup: None }
	}

	/// Sets the speedup against `baseline`, the sequential report of the same block.
	pub fn compare(&mut self, baseline: &StrategyReport) {
		if self.mean_seconds > 0.0 {
			self.speedup = Some(baseline.mean_seconds / self.mean_seconds);
		}
	}
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
	let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
	if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Content of the JSON report.
#[derive(Serialize)]
struct JsonReport<'a> {
	config: &'a Config,
	reports: &'a [StrategyReport],
}

/// Strategy heading used in the console and the results log.
pub fn heading(strategy: Strategy) -> &'static str {
	match strategy {
		Strategy::Sequential => "SEQUENTIAL",
		Strategy::LoadAll => "PARALLEL v1",
		Strategy::Inline => "PARALLEL v2",
		Strategy::PerWorker => "PARALLEL v3",
	}
}

/// Name of the n-grams in console output.
pub fn ngram_label(n: usize) -> String {
	match n {
		2 => "bigram".to_owned(),
		3 => "trigram".to_owned(),
		n => format!("{}-gram", n),
	}
}

/// Writes results to the console, the results log, and optionally a JSON report.
///
/// # Log format
/// ```text
/// NUM THREADS 4
/// PARALLEL v1: Speedup : 1.8
/// PARALLEL v2: Speedup : 3.1
/// PARALLEL v3: Speedup : 2.9
///
/// ```
pub struct Reporter<W: Write> {
	log: W,
	mode: Mode,
	item: String,
	json_path: Option<PathBuf>,
	reports: Vec<StrategyReport>,
}

impl Reporter<BufWriter<File>> {
	/// Creates the reporter, truncating the log file.
	pub fn create(log_path: &Path, mode: Mode, ngram_size: usize, json_path: Option<PathBuf>) -> Result<Self> {
		let file = File::create(log_path)
			.with_context(|| format!("Impossible to create the log file {}", log_path.display()))?;
		Ok(Self::new(BufWriter::new(file), mode, ngram_size, json_path))
	}
}

impl<W: Write> Reporter<W> {
	pub fn new(log: W, mode: Mode, ngram_size: usize, json_path: Option<PathBuf>) -> Self {
		Self { log, mode, item: ngram_label(ngram_size), json_path, reports: Vec::new() }
	}

	/// Starts a block: console banner and log header.
	pub fn begin_block(&mut self, block: Block) -> Result<()> {
		match self.mode {
			Mode::Threads => {
				println!("----------- Num used threads {}", block.workers);
				writeln!(self.log, "NUM THREADS {}", block.workers)?;
			}
			Mode::Size => {
				println!("----------- Corpus passes {} ({} threads)", block.passes, block.workers);
				writeln!(self.log, "TEXT ITER {}", block.passes)?;
			}
		}
		Ok(())
	}

	pub fn begin_strategy(&self, strategy: Strategy) {
		println!("{}", heading(strategy));
	}

	/// Prints one trial: time, totals and distinct counts.
	pub fn trial(&self, index: usize, trial: &Trial) {
		println!(
			"Test {} -->   Execution time : {:.6} ,   Total letters {} count : {} ,   Total words {} count : {}",
			index, trial.seconds, self.item, trial.letters_total, self.item, trial.words_total
		);
		println!(
			"Total of different letters {} : {} ,  Total of different words {} : {}",
			self.item, trial.letters_distinct, self.item, trial.words_distinct
		);
	}

	/// Prints the mean time, and the speedup of a parallel strategy into the log too.
	pub fn strategy_done(&mut self, report: StrategyReport) -> Result<()> {
		println!("Mean {} execution time : {:.6}", report.strategy.label(), report.mean_seconds);
		if let Some(speedup) = report.speedup {
			println!("Speedup : {:.4}", speedup);
			writeln!(self.log, "{}: Speedup : {}", heading(report.strategy), speedup)?;
		}
		self.reports.push(report);
		Ok(())
	}

	/// Ends a block with a blank line in the log.
	pub fn end_block(&mut self) -> Result<()> {
		writeln!(self.log)?;
		self.log.flush()?;
		Ok(())
	}

	/// Flushes the log and writes the JSON report if one was requested.
	pub fn finish(mut self, config: &Config) -> Result<W> {
		self.log.flush()?;
		if let Some(path) = &self.json_path {
			let file = File::create(path)
				.with_context(|| format!("Impossible to create the JSON report {}", path.display()))?;
			let report = JsonReport { config, reports: &self.reports };
			serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
			info!("JSON report written to {}", path.display());
		}
		Ok(self.log)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ngram_hist_core::Histograms;

	fn config() -> Config {
		Config::from_lookup(|name| match name {
			"TEXT_ITER" | "TEST_ITER" => Some("1".to_owned()),
			"NGRAM_SIZE" => Some("2".to_owned()),
			_ => None,
		})
		.unwrap()
	}

	fn trial(seconds: f64) -> Trial {
		Trial {
			seconds,
			letters_total: 10,
			letters_distinct: 4,
			words_total: 3,
			words_distinct: 3,
			unreadable: 0,
		}
	}

	#[test]
	fn labels() {
		assert_eq!(ngram_label(2), "bigram");
		assert_eq!(ngram_label(3), "trigram");
		assert_eq!(ngram_label(5), "5-gram");
	}

	#[test]
	fn trial_reads_the_histograms() {
		let mut histograms = Histograms::new();
		histograms.letters.add("ab");
		histograms.letters.add("ab");
		histograms.words.add("the cat");
		let output = BuildOutput { histograms, unreadable: vec![PathBuf::from("3.txt")] };

		let trial = Trial::new(Duration::from_millis(1500), &output);
		assert_eq!(trial.seconds, 1.5);
		assert_eq!((trial.letters_total, trial.letters_distinct), (2, 1));
		assert_eq!((trial.words_total, trial.words_distinct), (1, 1));
		assert_eq!(trial.unreadable, 1);
	}

	#[test]
	fn speedup_is_baseline_mean_over_strategy_mean() {
		let block = Block { workers: 4, passes: 1 };
		let baseline = StrategyReport::new(Strategy::Sequential, block, vec![trial(2.0), trial(4.0)]);
		assert_eq!(baseline.mean_seconds, 3.0);

		let mut parallel = StrategyReport::new(Strategy::Inline, block, vec![trial(1.0), trial(2.0)]);
		parallel.compare(&baseline);
		assert_eq!(parallel.speedup, Some(2.0));
		assert!(parallel.trials[0].same_counts(&baseline.trials[0]));
	}

	#[test]
	fn log_records_speedups_and_block_separators() {
		let block = Block { workers: 2, passes: 1 };
		let mut reporter = Reporter::new(Vec::new(), Mode::Threads, 2, None);
		let baseline = StrategyReport::new(Strategy::Sequential, block, vec![trial(2.0)]);

		reporter.begin_block(block).unwrap();
		let mut v1 = StrategyReport::new(Strategy::LoadAll, block, vec![trial(1.0)]);
		v1.compare(&baseline);
		reporter.strategy_done(baseline).unwrap();
		reporter.strategy_done(v1).unwrap();
		reporter.end_block().unwrap();
		assert_eq!(reporter.reports.len(), 2);

		let log = String::from_utf8(reporter.finish(&config()).unwrap()).unwrap();
		assert_eq!(log, "NUM THREADS 2\nPARALLEL v1: Speedup : 2\n\n");
	}

	#[test]
	fn json_report_holds_config_and_reports() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.json");
		let block = Block { workers: 1, passes: 1 };

		let mut reporter = Reporter::new(Vec::new(), Mode::Threads, 3, Some(path.clone()));
		reporter.strategy_done(StrategyReport::new(Strategy::Sequential, block, vec![trial(0.5)])).unwrap();
		reporter.finish(&config()).unwrap();

		let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(json["config"]["ngram_size"], 2);
		assert_eq!(json["reports"][0]["strategy"], "sequential");
		assert_eq!(json["reports"][0]["trials"][0]["letters_total"], 10);
	}
}
