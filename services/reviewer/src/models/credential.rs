//! Credential record model

use serde::{Deserialize, Serialize};

/// One entry of the shipped credential dataset
///
/// The dataset stores the identifier under `username`; `identifier` is
/// accepted as well. Several records may share an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "username", alias = "identifier")]
    pub identifier: String,
    /// Lowercase hex SHA-256 of `identifier::secret`
    pub hash: String,
}
