//! Input normalization and credential dataset checks

use regex::Regex;
use std::sync::OnceLock;

/// Trim surrounding whitespace and lowercase an identifier
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate a dataset identifier
///
/// Identifiers are compared case-sensitively against the normalized login
/// name, so a stored identifier that is not already normalized can never
/// match.
pub fn validate_identifier(identifier: &str) -> Result<(), String> {
    if identifier.is_empty() {
        return Err("Identifier is required".to_string());
    }

    if identifier != normalize_identifier(identifier) {
        return Err(format!(
            "Identifier {identifier:?} is not trimmed lowercase and will never match"
        ));
    }

    Ok(())
}

/// Validate a dataset hash: 64 lowercase hexadecimal characters
pub fn validate_hash(hash: &str) -> Result<(), String> {
    if hash.is_empty() {
        return Err("Hash is required".to_string());
    }

    static HASH_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        HASH_REGEX.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("Failed to compile hash regex"));

    if !regex.is_match(hash) {
        return Err("Hash must be 64 lowercase hexadecimal characters".to_string());
    }

    Ok(())
}
