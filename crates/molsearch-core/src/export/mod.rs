//! CSV export of search results.
//!
//! This module provides:
//! - [`CsvPayload`], the encoded artifact with its file name and MIME type
//! - [`DownloadSink`], the destination a payload is handed to

mod csv;
mod download;

pub use self::csv::{export_file_name, export_results, render_csv, CsvPayload};
pub use download::{DirectorySink, DownloadSink, MemorySink};
