//! CSV encoding of a result set.

use chrono::NaiveDate;
use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{MolSearchError, Result};
use crate::models::SearchResult;

/// An encoded export, ready to hand to a [`super::DownloadSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPayload {
    pub file_name: String,
    pub mime: String,
    /// UTF-8 text, BOM first.
    pub bytes: Vec<u8>,
}

impl CsvPayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode results as `regNumber,variant,smiles` rows.
///
/// Cells holding a comma, a double quote, `\n` or `\r` are quoted with
/// inner quotes doubled. Rows are separated by `\n` with no terminator after
/// the last one, and the text starts with a byte-order mark.
pub fn render_csv(results: &[SearchResult]) -> Result<Vec<u8>> {
    let mut bom = [0u8; 4];
    let mut buffer = ExportConfig::BOM.encode_utf8(&mut bom).as_bytes().to_vec();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut buffer);

    writer.write_record(ExportConfig::HEADER)?;
    for result in results {
        writer.write_record([
            result.reg_number.as_str(),
            result.variant.as_deref().unwrap_or(""),
            result.structure.as_str(),
        ])?;
    }
    writer.flush().map_err(|e| MolSearchError::Io {
        message: "Failed to flush CSV writer".into(),
        path: None,
        source: Some(e),
    })?;
    drop(writer);

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
    }
    Ok(buffer)
}

/// Download name for an export made on `date`: the bare ISO date.
pub fn export_file_name(date: NaiveDate) -> String {
    date.format(ExportConfig::FILE_NAME_FORMAT).to_string()
}

/// Encode `results` into a payload named after `date`.
pub fn export_results(results: &[SearchResult], date: NaiveDate) -> Result<CsvPayload> {
    let bytes = render_csv(results)?;
    let payload = CsvPayload {
        file_name: export_file_name(date),
        mime: ExportConfig::MIME.to_string(),
        bytes,
    };
    debug!(
        "Exported {} results to {} ({} bytes)",
        results.len(),
        payload.file_name,
        payload.len()
    );
    Ok(payload)
}
