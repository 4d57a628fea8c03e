use std::env;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Invalid or missing benchmark setting. Always fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("{0} is not set")]
	Missing(&'static str),

	#[error("{name} must be a positive integer, got '{value}'")]
	NotPositive { name: &'static str, value: String },

	#[error("{name} must be a comma separated list of positive integers, got '{value}'")]
	InvalidList { name: &'static str, value: String },

	#[error("BENCH_MODE must be 'threads' or 'size', got '{0}'")]
	InvalidMode(String),
}

/// What varies from one benchmark block to the next.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	/// One block per worker count, `TEXT_ITER` passes each.
	Threads,
	/// One block per pass count, at the largest worker count.
	Size,
}

/// One set of measurements: every strategy at the same worker and pass count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
	pub workers: usize,
	pub passes: usize,
}

/// Benchmark settings, read once at startup.
///
/// | variable | meaning | default |
/// |---|---|---|
/// | `TEXT_ITER` | corpus passes per run | required |
/// | `TEST_ITER` | timed trials per strategy | required |
/// | `NGRAM_SIZE` | n-gram size | required |
/// | `THREADS` | worker counts, `1,2,4` | 1, 2, 4, 6... up to the CPU count |
/// | `TEXT_SIZES` | pass counts for `size` mode | `1,2,4,6,8,10` |
/// | `BENCH_MODE` | `threads` or `size` | `threads` |
/// | `CORPUS_DIR` | corpus directory | `./Texts` |
/// | `LOG_FILE` | results log | `log.txt` |
/// | `REPORT_JSON` | optional JSON report | unset |
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Config {
	pub passes: usize,
	pub trials: usize,
	pub ngram_size: usize,
	pub threads: Vec<usize>,
	pub text_sizes: Vec<usize>,
	pub mode: Mode,
	pub corpus_dir: PathBuf,
	pub log_file: PathBuf,
	pub report_json: Option<PathBuf>,
}

impl Config {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Reads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let passes = required(&lookup, "TEXT_ITER")?;
		let trials = required(&lookup, "TEST_ITER")?;
		let ngram_size = required(&lookup, "NGRAM_SIZE")?;

		let threads = match lookup("THREADS") {
			Some(value) => parse_list("THREADS", &value)?,
			None => default_threads(num_cpus::get()),
		};
		let text_sizes = match lookup("TEXT_SIZES") {
			Some(value) => parse_list("TEXT_SIZES", &value)?,
			None => vec![1, 2, 4, 6, 8, 10],
		};
		let mode = match lookup("BENCH_MODE") {
			None => Mode::Threads,
			Some(value) => match value.trim().to_lowercase().as_str() {
				"threads" => Mode::Threads,
				"size" => Mode::Size,
				_ => return Err(ConfigError::InvalidMode(value)),
			},
		};

		Ok(Self {
			passes,
			trials,
			ngram_size,
			threads,
			text_sizes,
			mode,
			corpus_dir: lookup("CORPUS_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./Texts")),
			log_file: lookup("LOG_FILE").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("log.txt")),
			report_json: lookup("REPORT_JSON").filter(|s| !s.trim().is_empty()).map(PathBuf::from),
		})
	}

	/// The blocks to measure, in order.
	pub fn blocks(&self) -> Vec<Block> {
		match self.mode {
			Mode::Threads => self
				.threads
				.iter()
				.map(|&workers| Block { workers, passes: self.passes })
				.collect(),
			Mode::Size => {
				let workers = self.threads.iter().copied().max().unwrap_or(1);
				self.text_sizes.iter().map(|&passes| Block { workers, passes }).collect()
			}
		}
	}
}

fn required<F>(lookup: &F, name: &'static str) -> Result<usize, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let value = lookup(name).ok_or(ConfigError::Missing(name))?;
	parse_positive(name, &value)
}

fn parse_positive(name: &'static str, value: &str) -> Result<usize, ConfigError> {
	match value.trim().parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err(ConfigError::NotPositive { name, value: value.to_owned() }),
	}
}

fn parse_list(name: &'static str, value: &str) -> Result<Vec<usize>, ConfigError> {
	let invalid = || ConfigError::InvalidList { name, value: value.to_owned() };
	let list = value
		.split(',')
		.map(|item| parse_positive(name, item).map_err(|_| invalid()))
		.collect::<Result<Vec<_>, _>>()?;
	if list.is_empty() {
		return Err(invalid());
	}
	Ok(list)
}

/// `1, 2, 4, 6, ...` up to `cpus`.
fn default_threads(cpus: usize) -> Vec<usize> {
	std::iter::once(1).chain((2..=cpus).step_by(2)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
		let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		Config::from_lookup(|name| vars.get(name).cloned())
	}

	const REQUIRED: [(&str, &str); 3] = [("TEXT_ITER", "2"), ("TEST_ITER", "3"), ("NGRAM_SIZE", "2")];

	#[test]
	fn required_settings_and_defaults() {
		let config = config(&REQUIRED).unwrap();
		assert_eq!(config.passes, 2);
		assert_eq!(config.trials, 3);
		assert_eq!(config.ngram_size, 2);
		assert_eq!(config.mode, Mode::Threads);
		assert_eq!(config.corpus_dir, PathBuf::from("./Texts"));
		assert_eq!(config.log_file, PathBuf::from("log.txt"));
		assert_eq!(config.report_json, None);
		assert_eq!(config.threads[0], 1);
	}

	#[test]
	fn missing_setting_is_reported_by_name() {
		assert_eq!(config(&REQUIRED[..2]), Err(ConfigError::Missing("NGRAM_SIZE")));
	}

	#[test]
	fn zero_and_garbage_are_rejected() {
		let mut vars = REQUIRED.to_vec();
		vars[0] = ("TEXT_ITER", "0");
		assert!(matches!(config(&vars), Err(ConfigError::NotPositive { name: "TEXT_ITER", .. })));
		vars[0] = ("TEXT_ITER", "two");
		assert!(matches!(config(&vars), Err(ConfigError::NotPositive { name: "TEXT_ITER", .. })));
	}

	#[test]
	fn thread_list_is_parsed() {
		let mut vars = REQUIRED.to_vec();
		vars.push(("THREADS", "1, 2,8"));
		assert_eq!(config(&vars).unwrap().threads, vec![1, 2, 8]);

		vars.pop();
		vars.push(("THREADS", "1,,2"));
		assert!(matches!(config(&vars), Err(ConfigError::InvalidList { name: "THREADS", .. })));
	}

	#[test]
	fn default_schedule_follows_cpu_count() {
		assert_eq!(default_threads(1), vec![1]);
		assert_eq!(default_threads(2), vec![1, 2]);
		assert_eq!(default_threads(9), vec![1, 2, 4, 6, 8]);
	}

	#[test]
	fn blocks_follow_the_mode() {
		let mut vars = REQUIRED.to_vec();
		vars.push(("THREADS", "1,4,2"));
		let threads = config(&vars).unwrap();
		assert_eq!(
			threads.blocks(),
			vec![
				Block { workers: 1, passes: 2 },
				Block { workers: 4, passes: 2 },
				Block { workers: 2, passes: 2 }
			]
		);

		vars.push(("BENCH_MODE", "size"));
		vars.push(("TEXT_SIZES", "1,3"));
		let size = config(&vars).unwrap();
		assert_eq!(size.blocks(), vec![Block { workers: 4, passes: 1 }, Block { workers: 4, passes: 3 }]);
	}

	#[test]
	fn unknown_mode_is_rejected() {
		let mut vars = REQUIRED.to_vec();
		vars.push(("BENCH_MODE", "fast"));
		assert_eq!(config(&vars), Err(ConfigError::InvalidMode("fast".to_owned())));
	}
}
