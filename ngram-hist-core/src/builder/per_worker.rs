use super::pool::{SharedHistograms, WorkQueue, run_workers};
use super::{BuildOutput, BuildParams, read_or_skip};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::extract::add_ngrams;
use crate::histogram::Histograms;

/// Each worker loads its documents into a private list, then extracts (parallel v3).
///
/// # Behavior
/// - Same partitioning as [`inline`](super::inline): indexed documents of
///   every pass are claimed one at a time.
/// - Claimed documents are only read and appended to the worker's own list.
/// - Once no unit is left, the worker extracts from its list into a private
///   pair and merges it once into the shared result.
///
/// # Errors
/// Returns an error if the parameters are invalid or the corpus cannot be counted.
pub fn per_worker(corpus: &Corpus, params: &BuildParams) -> Result<BuildOutput> {
	params.validate(true)?;
	if params.passes == 0 {
		return Ok(BuildOutput::default());
	}

	let count = corpus.count()?;
	let queue = WorkQueue::new(count * params.passes);
	let shared = SharedHistograms::default();

	let unreadable = run_workers(params.workers, |_| {
		let mut texts = Vec::new();
		let mut unreadable = Vec::new();
		while let Some(unit) = queue.next() {
			let path = corpus.indexed_path(unit % count);
			if let Some(text) = read_or_skip(corpus, path, &mut unreadable) {
				texts.push(text);
			}
		}

		let mut local = Histograms::new();
		for text in &texts {
			add_ngrams(&mut local, text, params.ngram_size);
		}
		shared.merge(local);
		unreadable
	});

	Ok(BuildOutput { histograms: shared.into_histograms(), unreadable })
}
