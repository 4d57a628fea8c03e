use super::pool::{SharedHistograms, WorkQueue, run_workers};
use super::{BuildOutput, BuildParams, read_or_skip};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::extract::add_ngrams;
use crate::histogram::Histograms;

/// Reads and extracts each document in the same unit of work (parallel v2).
///
/// # Behavior
/// - Documents are addressed by index (`<index>.txt`); the range
///   `[0, count)` of every pass is claimed one index at a time.
/// - A worker reads its document and immediately extracts into a private pair.
/// - Each worker merges its private pair once, after all passes.
///
/// # Errors
/// Returns an error if the parameters are invalid or the corpus cannot be counted.
pub fn inline(corpus: &Corpus, params: &BuildParams) -> Result<BuildOutput> {
	params.validate(true)?;
	if params.passes == 0 {
		return Ok(BuildOutput::default());
	}

	let count = corpus.count()?;
	let queue = WorkQueue::new(count * params.passes);
	let shared = SharedHistograms::default();

	let unreadable = run_workers(params.workers, |_| {
		let mut local = Histograms::new();
		let mut unreadable = Vec::new();
		while let Some(unit) = queue.next() {
			let path = corpus.indexed_path(unit % count);
			if let Some(text) = read_or_skip(corpus, path, &mut unreadable) {
				add_ngrams(&mut local, &text, params.ngram_size);
			}
		}
		shared.merge(local);
		unreadable
	});

	Ok(BuildOutput { histograms: shared.into_histograms(), unreadable })
}
