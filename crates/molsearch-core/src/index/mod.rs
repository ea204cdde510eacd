//! Candidate normalization, index construction and substructure filtering.
//!
//! This module provides:
//! - Line normalization for pasted molecule lists
//! - The index builder, which registers candidates and tolerates bad entries
//! - The substructure filter applied on top of a built index

mod builder;
mod filter;
mod normalize;
#[cfg(test)]
mod test_engine;

pub use builder::{build_index, SearchIndex};
pub use filter::filter_by_substructure;
pub use normalize::{normalize_line, normalize_text};
