//! Credential dataset loading
//!
//! The dataset is an ordered JSON array of `{username, hash}` records shipped
//! alongside the pages. It is read once at startup and never changes
//! afterwards. A missing or unreadable dataset is tolerated and yields an
//! empty table, which disables every login.

use std::path::Path;

use tracing::{error, info, warn};

use crate::{
    error::CredentialError,
    models::CredentialRecord,
    validation::{validate_hash, validate_identifier},
};

/// Immutable table of credential records
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    records: Vec<CredentialRecord>,
}

impl CredentialTable {
    /// Build a table from records, warning about entries that can never match
    pub fn new(records: Vec<CredentialRecord>) -> Self {
        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = validate_identifier(&record.identifier) {
                warn!("Credential record {}: {}", index, reason);
            }
            if let Err(reason) = validate_hash(&record.hash) {
                warn!(
                    "Credential record {} ({}): {}",
                    index, record.identifier, reason
                );
            }
        }
        Self { records }
    }

    /// Parse a JSON array of records
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let records: Vec<CredentialRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Read and parse the dataset file
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;
        info!(
            "Loaded {} credential records from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Like [`CredentialTable::load`], but any failure yields an empty table
    pub fn load_or_empty(path: &Path) -> Self {
        let table = match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                Self::default()
            }
        };

        if table.is_empty() {
            error!("Reviewer credential data failed to load.");
        }
        table
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose identifier equals `identifier` exactly
    pub fn candidates<'a>(
        &'a self,
        identifier: &'a str,
    ) -> impl Iterator<Item = &'a CredentialRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.identifier == identifier)
    }
}

impl From<Vec<CredentialRecord>> for CredentialTable {
    fn from(records: Vec<CredentialRecord>) -> Self {
        Self::new(records)
    }
}
