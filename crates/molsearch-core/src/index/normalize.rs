//! Raw text line → candidate.

use crate::models::Candidate;

/// Delimiters in priority order; only the first one present in a line is used.
const DELIMITERS: [char; 3] = ['\t', ';', ' '];

/// Split one raw line into a structure and an optional identifier.
///
/// The line is trimmed, then split on the highest-priority delimiter it
/// contains (tab, then semicolon, then space). The first field is the
/// structure and the second the identifier; anything after a second
/// delimiter is dropped. Both fields are trimmed and an empty identifier
/// becomes `None`. Empty structures are returned as-is; filtering them is up
/// to the caller.
///
/// - `"CCO\tEthanol"` → `CCO` / `Ethanol`
/// - `"CCO; ethanol; extra"` → `CCO` / `ethanol`
/// - `"CCO"` → `CCO` / none
pub fn normalize_line(raw: &str) -> Candidate {
    let trimmed = raw.trim();

    match DELIMITERS.iter().find(|&&delimiter| trimmed.contains(delimiter)) {
        Some(&delimiter) => {
            let mut fields = trimmed.split(delimiter);
            let structure = fields.next().unwrap_or_default().trim();
            let identifier = fields.next().unwrap_or_default().trim();
            Candidate::new(
                structure,
                (!identifier.is_empty()).then(|| identifier.to_string()),
            )
        }
        None => Candidate::new(trimmed, None),
    }
}

/// Normalize every line of pasted text, dropping lines without a structure.
pub fn normalize_text(text: &str) -> Vec<Candidate> {
    text.lines()
        .map(normalize_line)
        .filter(Candidate::has_structure)
        .collect()
}
