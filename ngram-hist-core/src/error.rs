use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a builder before any histogram work is done.
///
/// A single unreadable document is never reported through this type:
/// builders skip it and list it in [`BuildOutput::unreadable`](crate::BuildOutput).
#[derive(Debug, Error)]
pub enum HistogramError {
	/// The n-gram size must be at least 1.
	#[error("n-gram size must be >= 1, got {0}")]
	InvalidNgramSize(usize),

	/// A parallel builder needs at least one worker.
	#[error("worker count must be >= 1")]
	NoWorkers,

	/// The corpus directory itself could not be listed.
	#[error("cannot list corpus {}: {source}", .path.display())]
	Corpus {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, HistogramError>;
