use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{HistogramError, Result};

/// A directory of plain-text documents.
///
/// Two ways of addressing documents are supported:
/// - directory iteration: every file in the directory, in the order the
///   filesystem returns them (not stable across platforms or runs)
/// - indexed naming: documents are named `0.txt`, `1.txt`, ... `count-1.txt`
///
/// The corpus is never modified.
#[derive(Clone, Debug)]
pub struct Corpus {
	root: PathBuf,
}

impl Corpus {
	/// Creates a corpus rooted at `root`.
	///
	/// The directory is not checked here; listing it later fails
	/// with [`HistogramError::Corpus`] if it is missing.
	pub fn new<P: AsRef<Path>>(root: P) -> Self {
		Self { root: root.as_ref().to_path_buf() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Lists every file of the corpus in directory iteration order.
	///
	/// # Notes
	/// - Subdirectories are ignored.
	/// - An entry that cannot be inspected is skipped with a warning.
	///
	/// # Errors
	/// Returns an error if the directory itself cannot be read.
	pub fn discover(&self) -> Result<Vec<PathBuf>> {
		let mut documents = Vec::new();

		for entry in fs::read_dir(&self.root).map_err(|source| self.error(source))? {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					warn!("Impossible to open an entry of {}: {}", self.root.display(), e);
					continue;
				}
			};

			match entry.file_type() {
				Ok(file_type) if file_type.is_dir() => continue,
				Ok(_) => documents.push(entry.path()),
				Err(e) => warn!("Impossible to open the file: {}: {}", entry.path().display(), e),
			}
		}

		Ok(documents)
	}

	/// Counts the entries of the corpus directory.
	///
	/// Used by the indexed naming convention: documents are then expected
	/// at `0.txt` up to `count-1.txt`.
	pub fn count(&self) -> Result<usize> {
		let entries = fs::read_dir(&self.root).map_err(|source| self.error(source))?;
		Ok(entries.count())
	}

	/// Builds the path of the document with the given index.
	///
	/// Example: index `3` in `./Texts` → `./Texts/3.txt`
	pub fn indexed_path(&self, index: usize) -> PathBuf {
		self.root.join(format!("{}.txt", index))
	}

	/// Reads a whole document.
	///
	/// Invalid UTF-8 sequences are replaced rather than rejected,
	/// so only I/O failures make a document unreadable.
	pub fn read<P: AsRef<Path>>(&self, path: P) -> io::Result<String> {
		let bytes = fs::read(path)?;
		Ok(match String::from_utf8(bytes) {
			Ok(text) => text,
			Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
		})
	}

	fn error(&self, source: io::Error) -> HistogramError {
		HistogramError::Corpus { path: self.root.clone(), source }
	}
}
