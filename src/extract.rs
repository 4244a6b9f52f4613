//! Key Extractor: derives zero-or-one issue key from a branch name.
//!
//! An issue key is a maximal `PREFIX-DIGITS` token (e.g. `SCRUM-25`). The
//! prefix is either the configured project key (strict mode, exact and
//! case-sensitive) or any run of uppercase ASCII letters (permissive mode).
//! When a branch name carries several candidate keys, the leftmost one wins.
//! That tie-break is a compatibility rule for existing branch-naming
//! conventions, so the scan below makes it explicit instead of leaning on a
//! regex engine's default.

/// An issue key found in a branch name, with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    pub key: String,
    pub start: usize,
}

/// Find the leftmost issue key in `branch_name`.
///
/// With `project_key = Some(prefix)` only keys carrying exactly that prefix
/// match. With `None`, any uppercase-letter prefix is accepted. Returns `None`
/// when no key is present; that is a normal outcome, not an error.
pub fn find_issue_key(branch_name: &str, project_key: Option<&str>) -> Option<KeyMatch> {
    let bytes = branch_name.as_bytes();
    for start in 0..bytes.len() {
        if !is_word_boundary(bytes, start) {
            continue;
        }
        let key_end = match project_key {
            Some(prefix) => match_strict(bytes, start, prefix.as_bytes()),
            None => match_permissive(bytes, start),
        };
        if let Some(end) = key_end {
            return Some(KeyMatch {
                key: branch_name[start..end].to_string(),
                start,
            });
        }
    }
    None
}

/// A candidate may only begin where no word character precedes it, so that
/// `xSCRUM-25` does not yield `SCRUM-25`.
fn is_word_boundary(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !is_word_byte(bytes[pos - 1])
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Match `PREFIX-DIGITS` at `start` where `PREFIX` is the configured project
/// key, byte for byte. Returns the end offset of the key.
fn match_strict(bytes: &[u8], start: usize, prefix: &[u8]) -> Option<usize> {
    if prefix.is_empty() {
        return None;
    }
    let after_prefix = start.checked_add(prefix.len())?;
    if bytes.len() < after_prefix || &bytes[start..after_prefix] != prefix {
        return None;
    }
    match_dash_digits(bytes, after_prefix)
}

/// Match `PREFIX-DIGITS` at `start` where `PREFIX` is a maximal run of
/// uppercase ASCII letters. Returns the end offset of the key.
fn match_permissive(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos].is_ascii_uppercase() {
        pos += 1;
    }
    if pos == start {
        return None;
    }
    match_dash_digits(bytes, pos)
}

/// Match `-DIGITS` at `pos`, where the digit run is maximal and must end at a
/// word boundary (`SCRUM-25a` is not a key; `SCRUM-25-fix` ends cleanly).
fn match_dash_digits(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&b'-') {
        return None;
    }
    let digits_start = pos + 1;
    let mut end = digits_start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if end < bytes.len() && is_word_byte(bytes[end]) {
        return None;
    }
    Some(end)
}
