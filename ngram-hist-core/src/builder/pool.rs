use std::panic;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::histogram::{Histogram, Histograms};

/// Hands out the units of work `0..len` one at a time.
///
/// Every unit is returned exactly once, to whichever worker asks first.
#[derive(Debug)]
pub(crate) struct WorkQueue {
	next: AtomicUsize,
	len: usize,
}

impl WorkQueue {
	pub(crate) fn new(len: usize) -> Self {
		Self { next: AtomicUsize::new(0), len }
	}

	/// Claims the next unit, or `None` once the range is exhausted.
	pub(crate) fn next(&self) -> Option<usize> {
		let unit = self.next.fetch_add(1, Ordering::Relaxed);
		(unit < self.len).then_some(unit)
	}
}

/// Output histograms shared by all workers of one builder run.
///
/// Letters and words have their own lock so two workers can merge
/// different histogram types at the same time.
#[derive(Debug, Default)]
pub(crate) struct SharedHistograms {
	letters: Mutex<Histogram>,
	words: Mutex<Histogram>,
}

impl SharedHistograms {
	/// Merges a worker's private pair. Each lock is held only for its own merge.
	pub(crate) fn merge(&self, local: Histograms) {
		self.letters
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.merge_owned(local.letters);
		self.words
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.merge_owned(local.words);
	}

	pub(crate) fn into_histograms(self) -> Histograms {
		Histograms {
			letters: self.letters.into_inner().unwrap_or_else(PoisonError::into_inner),
			words: self.words.into_inner().unwrap_or_else(PoisonError::into_inner),
		}
	}
}

/// Runs `job` on `workers` scoped threads and waits for all of them.
///
/// Each job receives its worker index and returns the documents it could
/// not read. The lists are concatenated in worker order.
///
/// A panic in a worker is propagated to the caller.
pub(crate) fn run_workers<F>(workers: usize, job: F) -> Vec<PathBuf>
where
	F: Fn(usize) -> Vec<PathBuf> + Sync,
{
	thread::scope(|scope| {
		let job = &job;
		let handles: Vec<_> = (0..workers)
			.map(|worker| scope.spawn(move || job(worker)))
			.collect();

		let mut unreadable = Vec::new();
		for handle in handles {
			match handle.join() {
				Ok(paths) => unreadable.extend(paths),
				Err(payload) => panic::resume_unwind(payload),
			}
		}
		unreadable
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn queue_hands_out_every_unit_once() {
		let queue = WorkQueue::new(1000);
		let claimed = Mutex::new(Vec::new());

		run_workers(8, |_| {
			let mut mine = Vec::new();
			while let Some(unit) = queue.next() {
				mine.push(unit);
			}
			claimed.lock().unwrap().extend(mine);
			Vec::new()
		});

		let claimed = claimed.into_inner().unwrap();
		assert_eq!(claimed.len(), 1000);
		let unique: HashSet<usize> = claimed.into_iter().collect();
		assert_eq!(unique, (0..1000).collect::<HashSet<_>>());
		assert_eq!(queue.next(), None);
	}

	#[test]
	fn empty_queue_yields_nothing() {
		assert_eq!(WorkQueue::new(0).next(), None);
	}

	#[test]
	fn shared_merge_sums_worker_results() {
		let shared = SharedHistograms::default();
		run_workers(4, |worker| {
			let mut local = Histograms::new();
			local.letters.add("ab");
			local.words.add(if worker % 2 == 0 { "even" } else { "odd" });
			shared.merge(local);
			Vec::new()
		});

		let result = shared.into_histograms();
		assert_eq!(result.letters.get("ab"), 4);
		assert_eq!(result.words.get("even"), 2);
		assert_eq!(result.words.get("odd"), 2);
	}

	#[test]
	fn unreadable_lists_are_collected() {
		let unreadable = run_workers(3, |worker| vec![PathBuf::from(format!("{}.txt", worker))]);
		assert_eq!(unreadable.len(), 3);
		assert_eq!(unreadable[0], PathBuf::from("0.txt"));
	}
}
