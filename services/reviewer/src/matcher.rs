//! Credential matching
//!
//! A login name is normalized (trimmed, lowercased) and the secret is hashed
//! together with it as `identifier::secret`. The lowercase hex digest must
//! equal the hash of at least one dataset record carrying that identifier.
//! The secret itself is never normalized.

use sha2::{Digest, Sha256};

use crate::{
    credentials::CredentialTable, error::MatchError, models::CredentialRecord,
    validation::normalize_identifier,
};

/// Separator placed between identifier and secret before hashing
pub const SEPARATOR: &str = "::";

/// One-way digest producing lowercase hexadecimal output
pub trait OneWayDigest {
    fn hex_digest(&self, input: &str) -> String;
}

/// SHA-256 digest
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl OneWayDigest for Sha256Digest {
    fn hex_digest(&self, input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Tests identifier/secret pairs against a credential table
#[derive(Debug, Clone)]
pub struct CredentialMatcher<D = Sha256Digest> {
    table: CredentialTable,
    digest: Result<D, MatchError>,
}

impl CredentialMatcher<Sha256Digest> {
    /// Matcher backed by SHA-256
    ///
    /// SHA-256 is compiled into the binary, so this capability is always
    /// present. Environments that may lack a digest go through
    /// [`CredentialMatcher::try_new`] or [`CredentialMatcher::new`].
    pub fn sha256(table: CredentialTable) -> Self {
        Self::new(table, Ok(Sha256Digest))
    }
}

impl<D: OneWayDigest> CredentialMatcher<D> {
    /// Create a matcher from a table and a digest capability
    ///
    /// An `Err` capability still builds a matcher: inputs that are rejected
    /// before hashing keep returning `Ok(false)`, and only an attempt that
    /// needs the digest fails with [`MatchError::HashingUnavailable`].
    pub fn new(table: CredentialTable, digest: Result<D, MatchError>) -> Self {
        Self { table, digest }
    }

    /// Create a matcher only if the digest capability is present
    pub fn try_new(table: CredentialTable, digest: Option<D>) -> Result<Self, MatchError> {
        let digest = digest.ok_or(MatchError::HashingUnavailable)?;
        Ok(Self::new(table, Ok(digest)))
    }

    pub fn table(&self) -> &CredentialTable {
        &self.table
    }

    pub fn is_available(&self) -> bool {
        self.digest.is_ok()
    }

    /// Check a raw identifier/secret pair
    pub fn matches(&self, identifier_raw: &str, secret_raw: &str) -> Result<bool, MatchError> {
        let identifier = normalize_identifier(identifier_raw);
        if identifier.is_empty() || secret_raw.is_empty() || self.table.is_empty() {
            return Ok(false);
        }

        let candidates: Vec<&CredentialRecord> = self.table.candidates(&identifier).collect();
        if candidates.is_empty() {
            return Ok(false);
        }

        let hashed = self.salted_digest(&identifier, secret_raw)?;
        Ok(candidates.iter().any(|record| record.hash == hashed))
    }

    /// Produce the dataset record for a login name and secret
    ///
    /// Returns `None` for inputs that [`CredentialMatcher::matches`] always
    /// rejects (empty identifier or secret).
    pub fn hash_record(
        &self,
        identifier_raw: &str,
        secret_raw: &str,
    ) -> Result<Option<CredentialRecord>, MatchError> {
        let identifier = normalize_identifier(identifier_raw);
        if identifier.is_empty() || secret_raw.is_empty() {
            return Ok(None);
        }

        let hash = self.salted_digest(&identifier, secret_raw)?;
        Ok(Some(CredentialRecord { identifier, hash }))
    }

    fn salted_digest(&self, identifier: &str, secret: &str) -> Result<String, MatchError> {
        let digest = self.digest.as_ref().map_err(|e| *e)?;
        Ok(digest.hex_digest(&format!("{identifier}{SEPARATOR}{secret}")))
    }
}
