use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

/// Occurrence counts of n-grams.
///
/// A `Histogram` is used both as the private scratch space of a worker
/// and as the final shared result of a builder.
///
/// ## Responsibilities:
/// - Count occurrences of n-gram keys
/// - Merge with another histogram (counts are summed, keys are united)
/// - Report the total number of occurrences and the number of distinct keys
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - `total()` equals the number of `add` calls plus the totals of every merged histogram
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram {
	/// Example: { "th" => 42, "he" => 37 }
	counts: HashMap<String, u64>,
}

impl Histogram {
	/// Creates an empty histogram.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `key`.
	///
	/// The key is only allocated the first time it is seen.
	pub fn add(&mut self, key: &str) {
		if let Some(count) = self.counts.get_mut(key) {
			*count += 1;
		} else {
			self.counts.insert(key.to_owned(), 1);
		}
	}

	/// Records one occurrence of an already owned key.
	pub fn add_owned(&mut self, key: String) {
		*self.counts.entry(key).or_insert(0) += 1;
	}

	/// Returns the count of `key`, 0 if it was never seen.
	pub fn get(&self, key: &str) -> u64 {
		self.counts.get(key).copied().unwrap_or(0)
	}

	/// Iterates over `(key, count)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(key, count)| (key.as_str(), *count))
	}

	/// Number of distinct keys.
	pub fn distinct(&self) -> usize {
		self.counts.len()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Merges another histogram into this one.
	///
	/// Counts of matching keys are summed, missing keys are copied.
	/// The operation is commutative and associative, so the order in which
	/// workers merge does not change the result.
	pub fn merge(&mut self, other: &Self) {
		for (key, count) in &other.counts {
			if let Some(existing) = self.counts.get_mut(key) {
				*existing += *count;
			} else {
				self.counts.insert(key.clone(), *count);
			}
		}
	}

	/// Same as [`merge`](Self::merge) but consumes `other`, moving its keys.
	///
	/// Merging into an empty histogram takes over `other` wholesale.
	pub fn merge_owned(&mut self, other: Self) {
		if self.counts.is_empty() {
			self.counts = other.counts;
			return;
		}
		for (key, count) in other.counts {
			match self.counts.entry(key) {
				Entry::Occupied(mut entry) => *entry.get_mut() += count,
				Entry::Vacant(entry) => {
					entry.insert(count);
				}
			}
		}
	}

	/// Returns the `k` most frequent keys, highest count first.
	///
	/// Ties are ordered by key so the output is deterministic.
	pub fn most_common(&self, k: usize) -> Vec<(&str, u64)> {
		let mut entries: Vec<(&str, u64)> = self.iter().collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		entries.truncate(k);
		entries
	}
}

impl<'a> FromIterator<&'a str> for Histogram {
	fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
		let mut histogram = Self::new();
		for key in iter {
			histogram.add(key);
		}
		histogram
	}
}

/// The two histograms maintained by every builder run.
///
/// Letter and word n-grams are counted independently and are never mixed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Histograms {
	pub letters: Histogram,
	pub words: Histogram,
}

impl Histograms {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merges both histograms of `other` into this pair.
	pub fn merge(&mut self, other: &Self) {
		self.letters.merge(&other.letters);
		self.words.merge(&other.words);
	}

	/// Consuming version of [`merge`](Self::merge).
	pub fn merge_owned(&mut self, other: Self) {
		self.letters.merge_owned(other.letters);
		self.words.merge_owned(other.words);
	}

	pub fn is_empty(&self) -> bool {
		self.letters.is_empty() && self.words.is_empty()
	}
}
