//! N-gram extraction.
//!
//! Two kinds of n-grams are extracted from a text:
//! - letter n-grams: `n` consecutive alphabetic characters
//! - word n-grams: `n` consecutive whitespace-delimited tokens joined by a single space
//!
//! Both are lowercased. A text yields n-grams only when it is strictly
//! longer than `n` (characters for letters, tokens for words).

use crate::histogram::{Histogram, Histograms};

/// Counts the letter n-grams of `text` into `histogram`.
///
/// Every window of `n` characters made only of alphabetic characters is
/// lowercased and counted. Windows containing any other character are dropped.
///
/// # Notes
/// - Nothing is counted if `text` has `n` characters or fewer.
/// - Character based (UTF-8 safe), not byte based.
/// - Windows crossing a non-alphabetic character are skipped without
///   building their string.
pub fn add_letter_ngrams(histogram: &mut Histogram, text: &str, n: usize) {
	if n == 0 {
		return;
	}
	let chars: Vec<char> = text.chars().collect();
	if chars.len() <= n {
		return;
	}

	let mut key = String::with_capacity(n * 4);
	// Length of the alphabetic run ending at the current character
	let mut run = 0;
	for (i, c) in chars.iter().enumerate() {
		if !c.is_alphabetic() {
			run = 0;
			continue;
		}
		run += 1;
		if run >= n {
			key.clear();
			key.extend(chars[i + 1 - n..=i].iter().flat_map(|c| c.to_lowercase()));
			histogram.add(&key);
		}
	}
}

/// Counts the word n-grams of `text` into `histogram`.
///
/// The text is split on runs of whitespace. Each window of `n` tokens is
/// joined with single spaces, lowercased, and stripped of every character
/// that is neither alphabetic nor a space.
///
/// # Notes
/// - Nothing is counted if `text` has `n` tokens or fewer.
/// - Windows that only differ by punctuation or digits collapse onto the same key.
/// - A token without any letter leaves an empty slot between its spaces;
///   the window is still counted.
pub fn add_word_ngrams(histogram: &mut Histogram, text: &str, n: usize) {
	if n == 0 {
		return;
	}
	let tokens: Vec<&str> = text.split_whitespace().collect();
	if tokens.len() <= n {
		return;
	}

	let mut key = String::new();
	for window in tokens.windows(n) {
		key.clear();
		for (i, token) in window.iter().enumerate() {
			if i > 0 {
				key.push(' ');
			}
			key.extend(
				token
					.chars()
					.flat_map(|c| c.to_lowercase())
					.filter(|c| c.is_alphabetic()),
			);
		}
		histogram.add(&key);
	}
}

/// Updates both histograms of `histograms` from one document.
pub fn add_ngrams(histograms: &mut Histograms, text: &str, n: usize) {
	add_word_ngrams(&mut histograms.words, text, n);
	add_letter_ngrams(&mut histograms.letters, text, n);
}

/// Returns the letter n-gram histogram of `text`.
pub fn letter_ngrams(text: &str, n: usize) -> Histogram {
	let mut histogram = Histogram::new();
	add_letter_ngrams(&mut histogram, text, n);
	histogram
}

/// Returns the word n-gram histogram of `text`.
pub fn word_ngrams(text: &str, n: usize) -> Histogram {
	let mut histogram = Histogram::new();
	add_word_ngrams(&mut histogram, text, n);
	histogram
}

#[cfg(test)]
mod tests {
	use super::*;

	fn keys(pairs: &[(&str, u64)]) -> Histogram {
		let mut h = Histogram::new();
		for (key, count) in pairs {
			for _ in 0..*count {
				h.add(key);
			}
		}
		h
	}

	/// Reference implementation: build every window, then filter.
	fn naive_letters(text: &str, n: usize) -> Histogram {
		let chars: Vec<char> = text.chars().collect();
		let mut h = Histogram::new();
		if chars.len() <= n {
			return h;
		}
		for window in chars.windows(n) {
			if window.iter().all(|c| c.is_alphabetic()) {
				let key: String = window.iter().flat_map(|c| c.to_lowercase()).collect();
				h.add_owned(key);
			}
		}
		h
	}

	#[test]
	fn text_of_exactly_n_chars_yields_nothing() {
		assert!(letter_ngrams("ab", 2).is_empty());
		assert!(letter_ngrams("", 1).is_empty());
	}

	#[test]
	fn letter_windows_slide_one_char() {
		assert_eq!(letter_ngrams("abc", 2), keys(&[("ab", 1), ("bc", 1)]));
	}

	#[test]
	fn windows_with_non_letters_are_dropped() {
		assert!(letter_ngrams("a1c", 2).is_empty());
		assert_eq!(letter_ngrams("ab cd", 2), keys(&[("ab", 1), ("cd", 1)]));
		assert_eq!(letter_ngrams("abc-de", 3), keys(&[("abc", 1)]));
	}

	#[test]
	fn letters_are_case_folded() {
		assert_eq!(letter_ngrams("AbAb", 2), keys(&[("ab", 2), ("ba", 1)]));
	}

	#[test]
	fn unigrams_count_every_letter() {
		let h = letter_ngrams("Hello, World", 1);
		assert_eq!(h.get("l"), 3);
		assert_eq!(h.get("o"), 2);
		assert_eq!(h.total(), 10);
	}

	#[test]
	fn run_tracking_matches_naive_windows() {
		let text = "It was the best of times, it was the worst of times; \
			it was the age of wisdom... Ärger über Öl 1984!";
		for n in 1..=5 {
			assert_eq!(letter_ngrams(text, n), naive_letters(text, n), "n = {}", n);
		}
	}

	#[test]
	fn word_punctuation_is_stripped() {
		assert_eq!(word_ngrams("The cat, sat.", 2), keys(&[("the cat", 1), ("cat sat", 1)]));
	}

	#[test]
	fn word_count_equal_to_n_yields_nothing() {
		assert!(word_ngrams("the cat", 2).is_empty());
		assert!(word_ngrams("   ", 1).is_empty());
	}

	#[test]
	fn any_whitespace_run_separates_words() {
		let h = word_ngrams("one\t two\n\nthree   four", 2);
		assert_eq!(h, keys(&[("one two", 1), ("two three", 1), ("three four", 1)]));
	}

	#[test]
	fn windows_differing_by_punctuation_collapse() {
		let h = word_ngrams("Stop! stop. STOP stop", 2);
		assert_eq!(h, keys(&[("stop stop", 3)]));
	}

	#[test]
	fn punctuation_only_token_leaves_its_spaces() {
		let h = word_ngrams("a - b c", 3);
		assert_eq!(h, keys(&[("a  b", 1), (" b c", 1)]));
		assert_eq!(h.total(), 2);
	}

	#[test]
	fn pair_update_fills_both_histograms() {
		let mut pair = Histograms::new();
		add_ngrams(&mut pair, "The cat sat", 2);
		assert_eq!(pair.words.total(), 2);
		assert_eq!(pair.letters.get("at"), 2);
		assert_eq!(pair.letters.total(), 6);
	}
}
