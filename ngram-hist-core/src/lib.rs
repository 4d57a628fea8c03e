//! Letter and word n-gram histograms over a text corpus.
//!
//! This crate provides:
//! - Letter and word n-gram extraction
//! - A mergeable histogram accumulator
//! - Corpus access (directory iteration or `<index>.txt` naming)
//! - One sequential and three multi-threaded histogram builders
//!
//! All builders produce the same histograms for the same corpus;
//! they only differ in how loading and extraction are spread over workers.

/// Histogram builders (sequential and parallel strategies).
pub mod builder;

/// Corpus enumeration and document reading.
pub mod corpus;

/// Error type shared by the builders.
pub mod error;

/// Letter and word n-gram extraction.
pub mod extract;

/// N-gram occurrence counts and their merge.
pub mod histogram;

pub use builder::{BuildOutput, BuildParams, Strategy, build};
pub use corpus::Corpus;
pub use error::{HistogramError, Result};
pub use histogram::{Histogram, Histograms};
