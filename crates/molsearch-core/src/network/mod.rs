//! Remote compound registry access.
//!
//! This module provides:
//! - An HTTP client wrapper with JSON decoding and registry error extraction
//! - The [`CompoundGateway`] trait the orchestrator fetches candidates through
//! - [`HttpGateway`], the reqwest-backed gateway implementation

mod client;
mod gateway;

pub use client::{extract_domain, HttpClient};
pub use gateway::{CompoundGateway, DynGateway, HttpGateway};
