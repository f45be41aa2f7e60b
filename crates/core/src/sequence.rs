//! Sequential human-readable codes (`COM-0001`, `BAL-001`, ...).
//!
//! The next code is derived from the maximum numeric suffix among existing
//! codes, not from how many codes exist, so deleted or skipped numbers are
//! never reused. Not safe under concurrent generation against the same store;
//! the surrounding layer must serialize calls (single-writer assumption).

/// Returns the next code for `prefix` (including its separator, e.g. `"COM-"`),
/// zero-padded to `width` digits.
///
/// Codes that do not match `prefix` followed by decimal digits are ignored.
/// Suffixes wider than `width` are still parsed, so the sequence keeps
/// growing past `10^width - 1` (the code just stops being zero-padded).
pub fn next_sequence_code<'a, I>(existing: I, prefix: &str, width: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|code| parse_suffix(code, prefix))
        .max()
        .unwrap_or(0);
    format!("{prefix}{:0width$}", max + 1)
}

fn parse_suffix(code: &str, prefix: &str) -> Option<u64> {
    let suffix = code.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
