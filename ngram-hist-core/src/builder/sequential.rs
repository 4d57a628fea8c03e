use super::{BuildOutput, BuildParams, read_or_skip};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::extract::add_ngrams;

/// Builds the histograms on the calling thread.
///
/// For each pass the corpus directory is listed again and every document
/// is read then extracted straight into the result. This is the baseline
/// the parallel strategies are measured against.
///
/// # Errors
/// Returns an error if `ngram_size` is 0 or the corpus cannot be listed.
pub fn sequential(corpus: &Corpus, params: &BuildParams) -> Result<BuildOutput> {
	params.validate(false)?;

	let mut output = BuildOutput::default();
	for _ in 0..params.passes {
		for path in corpus.discover()? {
			if let Some(text) = read_or_skip(corpus, path, &mut output.unreadable) {
				add_ngrams(&mut output.histograms, &text, params.ngram_size);
			}
		}
	}
	Ok(output)
}
