//! Histogram builders.
//!
//! Four strategies build the same letter and word histograms:
//! - `Sequential`: one thread, read then extract
//! - `LoadAll` (parallel v1): one loader reads every document first, then
//!   the loaded list is processed by all workers
//! - `Inline` (parallel v2): each worker reads and immediately processes
//!   the documents it claims
//! - `PerWorker` (parallel v3): each worker reads the documents it claims
//!   into a private list, then processes that list
//!
//! Parallel strategies accumulate into private histograms and merge them
//! once per worker into the shared result.

use std::fmt;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::{HistogramError, Result};
use crate::histogram::Histograms;

mod inline;
mod load_all;
mod per_worker;
mod pool;
mod sequential;

pub use inline::inline;
pub use load_all::load_all;
pub use per_worker::per_worker;
pub use sequential::sequential;

/// Execution structure used to build the histograms.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	Sequential,
	LoadAll,
	Inline,
	PerWorker,
}

impl Strategy {
	pub const ALL: [Strategy; 4] = [Strategy::Sequential, Strategy::LoadAll, Strategy::Inline, Strategy::PerWorker];

	/// Strategies compared against the sequential baseline.
	pub const PARALLEL: [Strategy; 3] = [Strategy::LoadAll, Strategy::Inline, Strategy::PerWorker];

	/// Label used in reports and logs.
	pub fn label(&self) -> &'static str {
		match self {
			Strategy::Sequential => "sequential",
			Strategy::LoadAll => "parallel v1",
			Strategy::Inline => "parallel v2",
			Strategy::PerWorker => "parallel v3",
		}
	}

	pub fn is_parallel(&self) -> bool {
		*self != Strategy::Sequential
	}
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl std::str::FromStr for Strategy {
	type Err = String;

	/// Accepts `sequential`, `v1`/`load_all`, `v2`/`inline`, `v3`/`per_worker`.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"sequential" | "seq" => Ok(Strategy::Sequential),
			"v1" | "load_all" | "parallel v1" => Ok(Strategy::LoadAll),
			"v2" | "inline" | "parallel v2" => Ok(Strategy::Inline),
			"v3" | "per_worker" | "parallel v3" => Ok(Strategy::PerWorker),
			other => Err(format!("Unknown strategy '{}'", other)),
		}
	}
}

/// Parameters of one builder invocation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildParams {
	/// Size of the letter and word n-grams (>= 1).
	pub ngram_size: usize,

	/// Number of full traversals of the corpus.
	pub passes: usize,

	/// Number of worker threads. Ignored by the sequential builder.
	pub workers: usize,
}

impl BuildParams {
	pub fn new(ngram_size: usize, passes: usize, workers: usize) -> Self {
		Self { ngram_size, passes, workers }
	}

	/// Checks the parameters before any work starts.
	///
	/// # Errors
	/// Returns an error if `ngram_size` is 0, or if `workers` is 0
	/// when `parallel` is set.
	pub fn validate(&self, parallel: bool) -> Result<()> {
		if self.ngram_size == 0 {
			return Err(HistogramError::InvalidNgramSize(self.ngram_size));
		}
		if parallel && self.workers == 0 {
			return Err(HistogramError::NoWorkers);
		}
		Ok(())
	}
}

/// Result of a builder run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOutput {
	/// Letter and word histograms.
	pub histograms: Histograms,

	/// Every document that could not be read, once per failed read.
	///
	/// These documents contributed nothing to the histograms.
	pub unreadable: Vec<PathBuf>,
}

/// Builds the letter and word histograms of `corpus` with the given strategy.
///
/// # Errors
/// Returns an error if the parameters are invalid or the corpus directory
/// cannot be listed. Unreadable documents are skipped, not reported as errors.
pub fn build(strategy: Strategy, corpus: &Corpus, params: &BuildParams) -> Result<BuildOutput> {
	debug!(
		"Building {} histograms (n = {}, passes = {}, workers = {}) from {}",
		strategy,
		params.ngram_size,
		params.passes,
		params.workers,
		corpus.root().display()
	);
	let output = match strategy {
		Strategy::Sequential => sequential(corpus, params),
		Strategy::LoadAll => load_all(corpus, params),
		Strategy::Inline => inline(corpus, params),
		Strategy::PerWorker => per_worker(corpus, params),
	}?;
	debug!(
		"{} done: {} letter / {} word n-grams, {} unreadable",
		strategy,
		output.histograms.letters.total(),
		output.histograms.words.total(),
		output.unreadable.len()
	);
	Ok(output)
}

/// Reads a document, or records it as unreadable and warns.
fn read_or_skip(corpus: &Corpus, path: PathBuf, unreadable: &mut Vec<PathBuf>) -> Option<String> {
	match corpus.read(&path) {
		Ok(text) => Some(text),
		Err(e) => {
			warn!("Impossible to open the file: {}: {}", path.display(), e);
			unreadable.push(path);
			None
		}
	}
}
