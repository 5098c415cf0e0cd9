//! Reading integer keys from text.

use crate::types::InputError;

/// Parse whitespace-separated signed decimal integers.
///
/// Lines are counted from 1 for error reporting.  Empty input yields an
/// empty vector.
pub fn parse_keys(bytes: &[u8]) -> Result<Vec<i64>, InputError> {
    let mut keys = Vec::new();
    for (idx, line) in bytes.split(|&b| b == b'\n').enumerate() {
        let line_no = idx + 1;
        let text = std::str::from_utf8(line).map_err(|_| InputError::Encoding { line: line_no })?;
        for token in text.split_whitespace() {
            let key = token.parse::<i64>().map_err(|_| InputError::InvalidKey {
                line: line_no,
                token: token.to_string(),
            })?;
            keys.push(key);
        }
    }
    Ok(keys)
}
