//! Data models for molsearch.
//!
//! `molecule` holds the pipeline's own types (candidates, registered entries,
//! search results); `compound` holds the records exchanged with the remote
//! compound registry.

mod compound;
mod molecule;

pub use compound::*;
pub use molecule::*;
