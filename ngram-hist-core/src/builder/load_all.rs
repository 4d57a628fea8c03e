use std::path::PathBuf;
use std::sync::OnceLock;

use log::debug;

use super::pool::{SharedHistograms, WorkQueue, run_workers};
use super::{BuildOutput, BuildParams, read_or_skip};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::extract::add_ngrams;
use crate::histogram::Histograms;

/// Documents loaded by the single loader of [`load_all`].
#[derive(Debug, Default)]
struct Loaded {
	texts: Vec<String>,
	unreadable: Vec<PathBuf>,
}

/// Loads every document first, then extracts in parallel (parallel v1).
///
/// # Behavior
/// - The first worker to arrive loads the documents of every pass
///   (directory iteration order) into one shared list. The other workers
///   block until the list is published.
/// - The list is then read-only; its entries are claimed one at a time by
///   all workers, each extracting into a private pair.
/// - Each worker merges its private pair once into the shared result.
///
/// # Notes
/// - Loading is serial: only one worker ever reads documents.
///
/// # Errors
/// Returns an error if the parameters are invalid or the corpus cannot be listed.
pub fn load_all(corpus: &Corpus, params: &BuildParams) -> Result<BuildOutput> {
	params.validate(true)?;
	if params.passes == 0 {
		return Ok(BuildOutput::default());
	}

	let paths = corpus.discover()?;
	let loaded: OnceLock<Loaded> = OnceLock::new();
	let shared = SharedHistograms::default();
	let queue: OnceLock<WorkQueue> = OnceLock::new();

	run_workers(params.workers, |worker| {
		let documents = loaded.get_or_init(|| {
			debug!("Worker {} loads {} documents x {} passes", worker, paths.len(), params.passes);
			let mut batch = Loaded::default();
			for _ in 0..params.passes {
				for path in &paths {
					if let Some(text) = read_or_skip(corpus, path.clone(), &mut batch.unreadable) {
						batch.texts.push(text);
					}
				}
			}
			batch
		});
		let queue = queue.get_or_init(|| WorkQueue::new(documents.texts.len()));

		let mut local = Histograms::new();
		while let Some(i) = queue.next() {
			add_ngrams(&mut local, &documents.texts[i], params.ngram_size);
		}
		shared.merge(local);
		Vec::new()
	});

	let unreadable = loaded.into_inner().map(|loaded| loaded.unreadable).unwrap_or_default();
	Ok(BuildOutput { histograms: shared.into_histograms(), unreadable })
}
